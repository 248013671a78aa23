//! Axum route handlers for the chat API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::{IgnoreReason, SessionState, SubmitOutcome};
use crate::errors::AppError;
use crate::models::{CvDocument, Message};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub instruction: String,
}

/// Both variants are 200s: a dropped instruction is not an error.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChatResponse {
    Completed {
        message: Message,
        document: CvDocument,
        applied: bool,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl From<SubmitOutcome> for ChatResponse {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::Completed {
                reply,
                document,
                applied,
            } => ChatResponse::Completed {
                message: reply,
                document: Arc::unwrap_or_clone(document),
                applied,
            },
            SubmitOutcome::Ignored(reason) => ChatResponse::Ignored { reason },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub state: SessionState,
    pub messages: Vec<Message>,
}

/// POST /api/v1/workspaces/:id/chat
///
/// The submission runs on its own task: if the client goes away mid-request the
/// edit still completes and the history still gets its assistant turn.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let workspace = state.workspace(id)?;

    let outcome = tokio::spawn(async move {
        workspace
            .session
            .submit(&req.instruction, &workspace.store)
            .await
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Chat task failed: {e}")))?;

    Ok(Json(outcome.into()))
}

/// GET /api/v1/workspaces/:id/messages
pub async fn handle_get_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessagesResponse>, AppError> {
    let workspace = state.workspace(id)?;
    Ok(Json(MessagesResponse {
        state: workspace.session.state(),
        messages: workspace.session.messages(),
    }))
}
