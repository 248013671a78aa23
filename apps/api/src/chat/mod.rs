// Chat-driven document editing.
// Flow: session.submit → interpreter (model call) → merger (validate + commit).
// All model calls go through llm_client — no direct Anthropic calls here.

pub mod handlers;
pub mod interpreter;
pub mod merger;
pub mod prompts;
pub mod session;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Why a chat edit was not applied. Never leaves the chat module: the merger
/// turns every variant into an apology turn and keeps the previous document.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    #[error("Model reply rejected: {0}")]
    ValidationRejected(String),

    #[error("Failed to build prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}

pub use session::{ChatSession, IgnoreReason, SessionState, SubmitOutcome};
