//! Upload orchestrator.
//!
//! Checks run in a fixed order before any byte reaches the blob store:
//! declared size, parent folder, then content type. The record is inserted
//! only after the blob store has committed the bytes, so metadata never
//! points at missing storage.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::{Bytes, BytesMut};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pixvault_core::config::StorageConfig;
use pixvault_core::error::{AppError, ErrorKind};
use pixvault_core::result::AppResult;
use pixvault_core::traits::storage::{ByteStream, StorageProvider};
use pixvault_core::types::OwnerId;
use pixvault_database::NodeStore;
use pixvault_entity::{FileNode, MAX_NAME_LEN, NewFileNode};
use pixvault_storage::media::{SNIFF_LEN, is_generic_mime, sniff_image_mime};

use super::progress::ProgressTracker;
use crate::context::RequestContext;
use crate::hierarchy::HierarchyNavigator;

/// An incoming file.
pub struct UploadRequest {
    /// Client-supplied file name.
    pub file_name: String,
    /// Target folder, `None` for the root.
    pub parent_id: Option<Uuid>,
    /// Declared content type, if any.
    pub content_type: Option<String>,
    /// Declared size in bytes.
    pub declared_size: u64,
    /// The file contents.
    pub body: ByteStream,
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file_name", &self.file_name)
            .field("parent_id", &self.parent_id)
            .field("content_type", &self.content_type)
            .field("declared_size", &self.declared_size)
            .finish_non_exhaustive()
    }
}

/// Caller-side handles for an in-flight upload.
#[derive(Debug, Clone, Default)]
pub struct UploadControl {
    /// Receives percentage updates.
    pub progress: ProgressTracker,
    /// Aborts the upload when cancelled. No record is created afterwards.
    pub cancel: CancellationToken,
}

/// Validates uploads, commits them to the blob store, and records them.
#[derive(Debug, Clone)]
pub struct UploadService {
    store: Arc<dyn NodeStore>,
    storage: Arc<dyn StorageProvider>,
    navigator: HierarchyNavigator,
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        store: Arc<dyn NodeStore>,
        storage: Arc<dyn StorageProvider>,
        navigator: HierarchyNavigator,
        config: StorageConfig,
    ) -> Self {
        Self {
            store,
            storage,
            navigator,
            config,
        }
    }

    /// Configured size ceiling in bytes.
    pub fn max_upload_size(&self) -> u64 {
        self.config.max_upload_size_bytes
    }

    /// Upload one file and return its committed record.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
        control: UploadControl,
    ) -> AppResult<FileNode> {
        let owner = &ctx.owner_id;
        let limit = self.config.max_upload_size_bytes;

        if request.declared_size > limit {
            return Err(too_large(limit));
        }
        self.navigator
            .resolve_folder(owner, request.parent_id)
            .await?;
        let name = normalize_file_name(&request.file_name)?;

        let (head, body) = peek_head(request.body, SNIFF_LEN).await?;
        if head.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        let mime = self.resolve_mime(request.content_type.as_deref(), &head)?;

        if control.cancel.is_cancelled() {
            return Err(cancelled());
        }

        let node_id = Uuid::new_v4();
        let key = blob_key(&self.config.key_prefix, owner, node_id, &name);
        let exceeded = Arc::new(AtomicBool::new(false));
        let total = if request.declared_size > 0 {
            request.declared_size
        } else {
            limit
        };
        let metered = meter(body, limit, total, control.progress.clone(), exceeded.clone());

        debug!(owner_id = %owner, node_id = %node_id, key = %key, "Streaming upload to blob store");
        let put = self.storage.put_stream(&key, &mime, metered);
        let blob = tokio::select! {
            biased;
            _ = control.cancel.cancelled() => {
                self.discard(&key).await;
                return Err(cancelled());
            }
            result = put => match result {
                Ok(blob) => blob,
                Err(e) => {
                    self.discard(&key).await;
                    if exceeded.load(Ordering::SeqCst) {
                        return Err(too_large(limit));
                    }
                    return Err(e);
                }
            },
        };

        if control.cancel.is_cancelled() {
            self.discard(&key).await;
            return Err(cancelled());
        }

        let record = NewFileNode::file(
            node_id,
            owner.clone(),
            name,
            request.parent_id,
            blob.path,
            blob.url,
            mime,
            blob.size_bytes as i64,
        );
        let node = match self.store.insert(&record).await {
            Ok(node) => node,
            Err(e) => {
                self.discard(&key).await;
                return Err(e);
            }
        };
        control.progress.complete();

        info!(
            owner_id = %owner,
            node_id = %node.id,
            name = %node.name,
            bytes = node.size_bytes,
            "Upload committed"
        );
        Ok(node)
    }

    fn resolve_mime(&self, declared: Option<&str>, head: &[u8]) -> AppResult<String> {
        let declared = declared
            .map(|d| d.split(';').next().unwrap_or(d).trim().to_ascii_lowercase())
            .filter(|d| !is_generic_mime(d));
        let mime = match declared {
            Some(mime) => mime,
            None => sniff_image_mime(head)
                .ok_or_else(|| {
                    AppError::unsupported_media_type("Could not recognise the file as an image")
                })?
                .to_string(),
        };
        if !self.config.accepts_mime(&mime) {
            return Err(AppError::unsupported_media_type(format!(
                "Only {} files are accepted, got {mime}",
                self.config.allowed_mime_types.join(", ")
            )));
        }
        Ok(mime)
    }

    /// Best-effort removal of a blob written by an aborted upload.
    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            warn!(key, error = %e, "Failed to clean up aborted upload");
        }
    }
}

fn too_large(limit: u64) -> AppError {
    AppError::payload_too_large(format!("File exceeds the {limit} byte upload limit"))
}

fn cancelled() -> AppError {
    AppError::cancelled("Upload was cancelled")
}

/// Trim a client-supplied name and drop any directory part browsers send.
pub fn normalize_file_name(raw: &str) -> AppResult<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    if name.is_empty() {
        return Err(AppError::validation("File name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "File name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn key_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Storage key for a new blob: `{prefix}/{owner}/{node_id}/{name}`.
fn blob_key(prefix: &str, owner: &OwnerId, node_id: Uuid, name: &str) -> String {
    let mut name = key_segment(name);
    if name.is_empty() {
        name = "file".to_string();
    }
    let prefix = prefix.trim_matches('/');
    let owner = key_segment(owner.as_str());
    if prefix.is_empty() {
        format!("{owner}/{node_id}/{name}")
    } else {
        format!("{prefix}/{owner}/{node_id}/{name}")
    }
}

/// Read at least `want` bytes (or the whole body if shorter) and return them
/// along with a stream that replays them ahead of the rest.
async fn peek_head(mut body: ByteStream, want: usize) -> AppResult<(Bytes, ByteStream)> {
    let mut head = BytesMut::new();
    while head.len() < want {
        match body.next().await {
            Some(chunk) => {
                let chunk = chunk.map_err(|e| {
                    AppError::with_source(ErrorKind::Validation, "Failed to read upload body", e)
                })?;
                head.extend_from_slice(&chunk);
            }
            None => break,
        }
    }
    let head = head.freeze();
    let replay = stream::once(futures::future::ready(Ok::<Bytes, io::Error>(head.clone())));
    Ok((head, Box::pin(replay.chain(body))))
}

/// Count bytes as they flow, publish progress, and fail the stream once the
/// ceiling is crossed.
fn meter(
    body: ByteStream,
    limit: u64,
    total: u64,
    progress: ProgressTracker,
    exceeded: Arc<AtomicBool>,
) -> ByteStream {
    let mut transferred = 0u64;
    Box::pin(body.map(move |chunk| {
        let chunk = chunk?;
        transferred += chunk.len() as u64;
        if transferred > limit {
            exceeded.store(true, Ordering::SeqCst);
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "upload exceeds size limit",
            ));
        }
        progress.advance(transferred, total);
        Ok(chunk)
    }))
}
