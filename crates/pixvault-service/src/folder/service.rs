//! Folder creation under an owned parent or the root.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use pixvault_core::error::AppError;
use pixvault_core::result::AppResult;
use pixvault_database::NodeStore;
use pixvault_entity::{FileNode, MAX_NAME_LEN, NewFileNode};

use crate::context::RequestContext;
use crate::hierarchy::HierarchyNavigator;

/// Creates folders.
#[derive(Debug, Clone)]
pub struct FolderService {
    store: Arc<dyn NodeStore>,
    navigator: HierarchyNavigator,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn NodeStore>, navigator: HierarchyNavigator) -> Self {
        Self { store, navigator }
    }

    /// Create a folder named `name` under `parent_id` (root when `None`).
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<FileNode> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::validation(format!(
                "Folder name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        self.navigator
            .resolve_folder(&ctx.owner_id, parent_id)
            .await?;

        let folder = self
            .store
            .insert(&NewFileNode::folder(ctx.owner_id.clone(), name, parent_id))
            .await?;

        info!(
            owner_id = %ctx.owner_id,
            node_id = %folder.id,
            parent_id = ?parent_id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }
}
