//! Folder handlers.

use axum::Json;
use axum::extract::State;

use pixvault_entity::FileNode;

use crate::dto::request::{CreateFolderRequest, validate};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_optional_uuid};
use crate::state::AppState;

/// POST /api/folders/create
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<FileNode>, ApiError> {
    auth.ensure_matches(req.user_id.as_deref())?;
    validate(&req)?;
    let parent_id = parse_optional_uuid(req.parent_id.as_deref())?;

    let folder = state
        .folder_service
        .create_folder(auth.context(), &req.name, parent_id)
        .await?;
    Ok(Json(folder))
}
