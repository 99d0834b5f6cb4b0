//! File node entity model.
//!
//! A node is either a folder or a leaf file. Folders never carry blob
//! references; committed leaf files always carry both `path` and `file_url`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use pixvault_core::types::OwnerId;

/// MIME sentinel stored on folder rows so type dispatch degrades gracefully.
pub const FOLDER_MIME_TYPE: &str = "folder";

/// Longest accepted file or folder name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// A file or folder owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Unique node identifier.
    pub id: Uuid,
    /// The owning user.
    #[serde(rename = "userId")]
    pub owner_id: OwnerId,
    /// Display name.
    pub name: String,
    /// Parent folder (null for root-level nodes).
    pub parent_id: Option<Uuid>,
    /// Whether this node is a folder.
    pub is_folder: bool,
    /// Storage-layer key of the blob (leaf files only).
    pub path: Option<String>,
    /// Retrieval URL of the blob (leaf files only).
    pub file_url: Option<String>,
    /// MIME type, or [`FOLDER_MIME_TYPE`] for folders.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes (0 for folders).
    #[serde(rename = "size")]
    pub size_bytes: i64,
    /// Starred flag.
    pub is_starred: bool,
    /// Soft-delete flag.
    pub is_trash: bool,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FileNode {
    /// Materialize a new record, as a store does on insert.
    pub fn from_new(data: NewFileNode, now: DateTime<Utc>) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            name: data.name,
            parent_id: data.parent_id,
            is_folder: data.is_folder,
            path: data.path,
            file_url: data.file_url,
            mime_type: data.mime_type,
            size_bytes: data.size_bytes,
            is_starred: false,
            is_trash: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data required to insert a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFileNode {
    /// Identifier chosen by the caller (uploads key their blob by it).
    pub id: Uuid,
    /// The owning user.
    pub owner_id: OwnerId,
    /// Display name.
    pub name: String,
    /// Parent folder.
    pub parent_id: Option<Uuid>,
    /// Whether this node is a folder.
    pub is_folder: bool,
    /// Blob key.
    pub path: Option<String>,
    /// Blob URL.
    pub file_url: Option<String>,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
}

impl NewFileNode {
    /// A folder record: no blob, zero size, folder MIME sentinel.
    pub fn folder(owner_id: OwnerId, name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            parent_id,
            is_folder: true,
            path: None,
            file_url: None,
            mime_type: FOLDER_MIME_TYPE.to_string(),
            size_bytes: 0,
        }
    }

    /// A committed leaf file record.
    #[allow(clippy::too_many_arguments)]
    pub fn file(
        id: Uuid,
        owner_id: OwnerId,
        name: impl Into<String>,
        parent_id: Option<Uuid>,
        path: String,
        file_url: String,
        mime_type: impl Into<String>,
        size_bytes: i64,
    ) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
            parent_id,
            is_folder: false,
            path: Some(path),
            file_url: Some(file_url),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// Partial update applied by the entity store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePatch {
    /// New display name.
    pub name: Option<String>,
    /// New starred flag.
    pub is_starred: Option<bool>,
    /// New trash flag.
    pub is_trash: Option<bool>,
}

impl NodePatch {
    /// Patch that only sets the starred flag.
    pub fn starred(value: bool) -> Self {
        Self {
            is_starred: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only sets the trash flag.
    pub fn trash(value: bool) -> Self {
        Self {
            is_trash: Some(value),
            ..Self::default()
        }
    }

    /// Apply the patch in place.
    pub fn apply(&self, node: &mut FileNode, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(starred) = self.is_starred {
            node.is_starred = starred;
        }
        if let Some(trash) = self.is_trash {
            node.is_trash = trash;
        }
        node.updated_at = now;
    }
}
