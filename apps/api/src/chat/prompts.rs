// Prompt constants for chat-driven CV editing.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const CV_EDIT_SYSTEM: &str = "\
You are an expert recruiter and CV designer. \
The user edits their CV by typing natural-language commands. \
Apply the command to the CV JSON you are given and return the result. \
Write CV content and your confirmation in the user's language.";

/// CV edit prompt. Replace `{full_document_instruction}`, `{document_json}` and
/// `{instruction}` before sending.
pub const CV_EDIT_PROMPT_TEMPLATE: &str = r##"The user wants to change their CV with a natural-language command.

CURRENT CV DATA:
{document_json}

USER COMMAND (JSON string):
{instruction}

INSTRUCTIONS:
1. If the user asks to change a color, update theme.primaryColor (hex format, e.g. "#0a1a3f").
2. If the user asks to rephrase an experience description or the summary, rewrite ONLY that field so it reads professional and impactful.
3. If the user gives new information (name, email, phone, ...), overwrite the matching field.
4. Anything else: interpret it as best you can. You ALWAYS return the full CV, modified or not.

{full_document_instruction}

OUTPUT SCHEMA (return exactly this structure, no other keys):
{
  "updatedData": { ...the complete CV, same shape as CURRENT CV DATA... },
  "assistantResponse": "short message confirming what you did"
}

Return ONLY the JSON object — nothing else, no code fences."##;

/// Shown when the model's reply was usable but carried no confirmation text.
pub const DEFAULT_CONFIRMATION: &str = "J'ai mis à jour votre CV.";

/// Shown whenever an edit could not be applied.
pub const FAILURE_MESSAGE: &str =
    "Désolé, j'ai rencontré une erreur lors de la mise à jour de votre CV.";

/// First turn of every conversation.
pub const GREETING: &str = "Bonjour ! Je suis votre assistant Lumina. \
Dites-moi ce que vous voulez changer sur votre CV (couleur, texte, expériences) \
ou posez-moi une question.";
