// Cross-cutting prompt fragments shared by every module that calls the model.
// Module-specific prompts live in a prompts.rs next to the caller.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Reminds the model that the caller replaces the whole document with its answer.
pub const FULL_DOCUMENT_INSTRUCTION: &str = "\
    CRITICAL: `updatedData` replaces the user's CV wholesale. \
    Echo EVERY field of the current CV, changed or not. \
    Never drop a section, never rename a key, never change an existing `id`. \
    A new experience or education entry needs a fresh, unique `id`.";
