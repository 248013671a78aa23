pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::chat::handlers as chat;
use crate::state::AppState;
use crate::workspace::handlers as workspace;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Workspaces
        .route(
            "/api/v1/workspaces",
            post(workspace::handle_create_workspace),
        )
        .route(
            "/api/v1/workspaces/:id",
            get(workspace::handle_get_workspace).delete(workspace::handle_delete_workspace),
        )
        .route(
            "/api/v1/workspaces/:id/document",
            put(workspace::handle_replace_document),
        )
        .route(
            "/api/v1/workspaces/:id/score",
            get(workspace::handle_get_score),
        )
        // Chat
        .route("/api/v1/workspaces/:id/chat", post(chat::handle_chat))
        .route(
            "/api/v1/workspaces/:id/messages",
            get(chat::handle_get_messages),
        )
        // Manual editor
        .route(
            "/api/v1/workspaces/:id/photo",
            post(workspace::handle_upload_photo),
        )
        .route(
            "/api/v1/workspaces/:id/personal-info",
            patch(workspace::handle_update_personal_info),
        )
        .route(
            "/api/v1/workspaces/:id/skills",
            put(workspace::handle_set_skills),
        )
        .route(
            "/api/v1/workspaces/:id/theme",
            put(workspace::handle_set_theme),
        )
        .route(
            "/api/v1/workspaces/:id/experiences",
            post(workspace::handle_add_experience),
        )
        .route(
            "/api/v1/workspaces/:id/experiences/:record_id",
            patch(workspace::handle_update_experience).delete(workspace::handle_remove_experience),
        )
        .route(
            "/api/v1/workspaces/:id/education",
            post(workspace::handle_add_education),
        )
        .route(
            "/api/v1/workspaces/:id/education/:record_id",
            patch(workspace::handle_update_education).delete(workspace::handle_remove_education),
        )
        .with_state(state)
}
