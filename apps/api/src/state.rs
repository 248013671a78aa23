use std::sync::Arc;

use uuid::Uuid;

use crate::errors::AppError;
use crate::workspace::{Workspace, WorkspaceRegistry};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub workspaces: WorkspaceRegistry,
}

impl AppState {
    pub fn workspace(&self, id: Uuid) -> Result<Arc<Workspace>, AppError> {
        self.workspaces
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Workspace {id} not found")))
    }
}
