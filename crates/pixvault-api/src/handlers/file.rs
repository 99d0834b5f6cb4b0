//! File listing, upload, lifecycle, and purge handlers.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use pixvault_core::error::AppError;
use pixvault_core::traits::storage::ByteStream;
use pixvault_entity::{Crumb, FileNode, ViewCounts, ViewFilter};
use pixvault_service::{ProgressTracker, UploadControl, UploadRequest};
use pixvault_storage::RetrievalUrls;

use crate::dto::request::{ListFilesQuery, OwnerQuery};
use crate::dto::response::{EmptyTrashResponse, SuccessResponse, TrashResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_optional_uuid, parse_uuid};
use crate::state::AppState;

/// GET /api/files?userId&parentId&view
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileNode>>, ApiError> {
    auth.ensure_matches(query.user_id.as_deref())?;
    let parent_id = parse_optional_uuid(query.parent_id.as_deref())?;
    let view = match query.view.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ViewFilter>().map_err(AppError::validation)?),
    };

    let nodes = state
        .lifecycle_service
        .list(auth.context(), parent_id, view)
        .await?;
    Ok(Json(nodes))
}

/// GET /api/files/counts?userId&parentId
pub async fn view_counts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ViewCounts>, ApiError> {
    auth.ensure_matches(query.user_id.as_deref())?;
    let parent_id = parse_optional_uuid(query.parent_id.as_deref())?;

    let counts = state
        .lifecycle_service
        .counts(auth.context(), parent_id)
        .await?;
    Ok(Json(counts))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FileNode>, ApiError> {
    let id = parse_uuid(&id)?;
    let node = state.lifecycle_service.get(auth.context(), id).await?;
    Ok(Json(node))
}

/// GET /api/files/{id}/breadcrumbs
pub async fn breadcrumbs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Crumb>>, ApiError> {
    let id = parse_uuid(&id)?;
    let crumbs = state.navigator.breadcrumbs(&auth.owner_id, id).await?;
    Ok(Json(crumbs))
}

/// GET /api/files/{id}/urls
pub async fn retrieval_urls(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RetrievalUrls>, ApiError> {
    let id = parse_uuid(&id)?;
    let node = state.lifecycle_service.get(auth.context(), id).await?;
    let path = match (node.is_folder, node.path.as_deref()) {
        (false, Some(path)) => path,
        _ => return Err(AppError::invalid_target("Folders have no retrieval URLs").into()),
    };
    Ok(Json(state.urls.retrieval_urls(path)))
}

/// POST /api/files/upload (multipart: `file`, `userId`, `parentId`)
///
/// The upload runs on its own task holding a drop guard of the cancellation
/// token, so a client that disconnects mid-request aborts the upload and the
/// orchestrator still cleans up the partial blob.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<FileNode>, ApiError> {
    let limit = state.upload_service.max_upload_size();
    let mut user_id: Option<String> = None;
    let mut parent_id: Option<String> = None;
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "userId" => user_id = Some(field.text().await.map_err(multipart_error)?),
            "parentId" => parent_id = Some(field.text().await.map_err(multipart_error)?),
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(String::from);
                let data = read_capped(field, limit).await?;
                file = Some((file_name, content_type, data));
            }
            other => debug!(field = other, "Ignoring multipart field"),
        }
    }

    auth.ensure_matches(user_id.as_deref())?;
    let parent_id = parse_optional_uuid(parent_id.as_deref())?;
    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::validation("Missing file field"))?;

    let declared_size = data.len() as u64;
    let body: ByteStream = Box::pin(futures::stream::once(async move { Ok(data) }));
    let request = UploadRequest {
        file_name,
        parent_id,
        content_type,
        declared_size,
        body,
    };

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let control = UploadControl {
        progress: ProgressTracker::detached(),
        cancel,
    };
    let service = state.upload_service.clone();
    let ctx = auth.context().clone();
    let task = tokio::spawn(async move { service.upload(&ctx, request, control).await });

    let result = task
        .await
        .map_err(|e| AppError::internal(format!("Upload task failed: {e}")))?;
    guard.disarm();

    Ok(Json(result?))
}

/// PATCH /api/files/{id}/star
pub async fn toggle_star(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FileNode>, ApiError> {
    let id = parse_uuid(&id)?;
    let node = state
        .lifecycle_service
        .toggle_star(auth.context(), id)
        .await?;
    Ok(Json(node))
}

/// PATCH /api/files/{id}/trash
pub async fn toggle_trash(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TrashResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    let outcome = state
        .lifecycle_service
        .toggle_trash(auth.context(), id)
        .await?;
    Ok(Json(TrashResponse {
        is_trash: outcome.is_trash,
    }))
}

/// DELETE /api/files/{id}/delete
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = parse_uuid(&id)?;
    state.purge_service.purge(auth.context(), id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/files/empty-trash?userId
pub async fn empty_trash(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<EmptyTrashResponse>, ApiError> {
    auth.ensure_matches(query.user_id.as_deref())?;
    let report = state.purge_service.purge_all_trash(auth.context()).await?;
    Ok(Json(report.into()))
}

/// Buffer a multipart field, failing as soon as it grows past `limit`.
async fn read_capped(mut field: Field<'_>, limit: u64) -> Result<Bytes, AppError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if (buf.len() + chunk.len()) as u64 > limit {
            return Err(AppError::payload_too_large(format!(
                "File exceeds the {limit} byte upload limit"
            )));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(format!("Upload too large: {}", err.body_text()))
    } else {
        AppError::validation(format!("Multipart error: {}", err.body_text()))
    }
}
