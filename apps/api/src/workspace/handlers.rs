//! Axum route handlers for workspaces, the manual editor and photo upload.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::SessionState;
use crate::editor;
use crate::errors::AppError;
use crate::models::{CvDocument, Message};
use crate::photo::{attach_photo, PhotoUpload};
use crate::score::{compute_score, ScoreReport};
use crate::state::AppState;

const PHOTO_FIELD: &str = "photo";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateWorkspaceResponse {
    pub workspace_id: Uuid,
    pub document: CvDocument,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct WorkspaceView {
    pub workspace_id: Uuid,
    pub document: CvDocument,
    pub score: ScoreReport,
    pub state: SessionState,
    pub revision: u64,
}

#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillsUpdate {
    /// Comma-separated, as typed in the form.
    pub skills: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdate {
    pub primary_color: String,
    pub font_family: String,
}

#[derive(Debug, Serialize)]
pub struct RecordCreated {
    pub id: String,
    pub document: CvDocument,
}

fn owned(doc: Arc<CvDocument>) -> CvDocument {
    Arc::unwrap_or_clone(doc)
}

// ────────────────────────────────────────────────────────────────────────────
// Workspace lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/workspaces
///
/// Optional body: a complete CV. Without one the workspace starts from the sample.
pub async fn handle_create_workspace(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateWorkspaceResponse>), AppError> {
    let document = if body.iter().all(u8::is_ascii_whitespace) {
        CvDocument::sample()
    } else {
        serde_json::from_slice::<CvDocument>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid CV document: {e}")))?
    };
    document.validate()?;

    let workspace = state.workspaces.create(document);

    Ok((
        StatusCode::CREATED,
        Json(CreateWorkspaceResponse {
            workspace_id: workspace.id,
            document: owned(workspace.store.snapshot()),
            messages: workspace.session.messages(),
        }),
    ))
}

/// GET /api/v1/workspaces/:id
pub async fn handle_get_workspace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceView>, AppError> {
    let workspace = state.workspace(id)?;
    let document = workspace.store.snapshot();

    Ok(Json(WorkspaceView {
        workspace_id: id,
        score: compute_score(&document),
        document: owned(document),
        state: workspace.session.state(),
        revision: workspace.store.revision(),
    }))
}

/// DELETE /api/v1/workspaces/:id
///
/// Drops the document, the history and the session. An in-flight chat request
/// still completes, against a store nobody can read any more.
pub async fn handle_delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .workspaces
        .remove(id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| AppError::NotFound(format!("Workspace {id} not found")))
}

/// PUT /api/v1/workspaces/:id/document
///
/// Full replacement from the form. Ids removed earlier cannot come back.
pub async fn handle_replace_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(document): Json<CvDocument>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let published = workspace.store.update_with_retired(|current, retired| {
        document.validate_reply(current, retired)?;
        Ok::<_, AppError>(document)
    })?;

    Ok(Json(owned(published)))
}

/// GET /api/v1/workspaces/:id/score
pub async fn handle_get_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreReport>, AppError> {
    let workspace = state.workspace(id)?;
    Ok(Json(compute_score(&workspace.store.snapshot())))
}

// ────────────────────────────────────────────────────────────────────────────
// Manual editor
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/workspaces/:id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| editor::set_personal_field(doc, &req.field, &req.value))?;
    Ok(Json(owned(doc)))
}

/// PUT /api/v1/workspaces/:id/skills
pub async fn handle_set_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SkillsUpdate>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| Ok::<_, AppError>(editor::set_skills_from_csv(doc, &req.skills)))?;
    Ok(Json(owned(doc)))
}

/// PUT /api/v1/workspaces/:id/theme
pub async fn handle_set_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ThemeUpdate>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| editor::set_theme(doc, &req.primary_color, &req.font_family))?;
    Ok(Json(owned(doc)))
}

/// POST /api/v1/workspaces/:id/experiences
pub async fn handle_add_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecordCreated>), AppError> {
    let workspace = state.workspace(id)?;
    let mut new_id = String::new();
    let doc = workspace.store.update(|doc| {
        let (next, id) = editor::add_experience(doc);
        new_id = id;
        Ok::<_, AppError>(next)
    })?;
    Ok((
        StatusCode::CREATED,
        Json(RecordCreated {
            id: new_id,
            document: owned(doc),
        }),
    ))
}

/// PATCH /api/v1/workspaces/:id/experiences/:record_id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path((id, record_id)): Path<(Uuid, String)>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| editor::update_experience(doc, &record_id, &req.field, &req.value))?;
    Ok(Json(owned(doc)))
}

/// DELETE /api/v1/workspaces/:id/experiences/:record_id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path((id, record_id)): Path<(Uuid, String)>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| editor::remove_experience(doc, &record_id))?;
    Ok(Json(owned(doc)))
}

/// POST /api/v1/workspaces/:id/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<RecordCreated>), AppError> {
    let workspace = state.workspace(id)?;
    let mut new_id = String::new();
    let doc = workspace.store.update(|doc| {
        let (next, id) = editor::add_education(doc);
        new_id = id;
        Ok::<_, AppError>(next)
    })?;
    Ok((
        StatusCode::CREATED,
        Json(RecordCreated {
            id: new_id,
            document: owned(doc),
        }),
    ))
}

/// PATCH /api/v1/workspaces/:id/education/:record_id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path((id, record_id)): Path<(Uuid, String)>,
    Json(req): Json<FieldUpdate>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| editor::update_education(doc, &record_id, &req.field, &req.value))?;
    Ok(Json(owned(doc)))
}

/// DELETE /api/v1/workspaces/:id/education/:record_id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path((id, record_id)): Path<(Uuid, String)>,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;
    let doc = workspace
        .store
        .update(|doc| editor::remove_education(doc, &record_id))?;
    Ok(Json(owned(doc)))
}

// ────────────────────────────────────────────────────────────────────────────
// Photo
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/workspaces/:id/photo
///
/// Multipart body with an image in the `photo` field.
pub async fn handle_upload_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<CvDocument>, AppError> {
    let workspace = state.workspace(id)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        let doc = attach_photo(&workspace.store, &PhotoUpload { content_type, data })?;
        return Ok(Json(owned(doc)));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{PHOTO_FIELD}'"
    )))
}
