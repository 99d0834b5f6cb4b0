//! Cascade delete engine.
//!
//! Leaves go first, blob before record, so a record never outlives a blob
//! that failed to delete. Folders of the subtree are removed together in
//! one store write once every leaf below them is gone.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use pixvault_core::error::{AppError, ErrorKind};
use pixvault_core::result::AppResult;
use pixvault_core::traits::storage::StorageProvider;
use pixvault_core::types::OwnerId;
use pixvault_database::NodeStore;
use pixvault_entity::FileNode;

use crate::context::RequestContext;
use crate::hierarchy::HierarchyNavigator;

/// Result of purging one trashed subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeReport {
    /// Records removed.
    pub removed_nodes: u64,
    /// Blobs removed.
    pub deleted_blobs: u64,
}

/// A trashed subtree that could not be purged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeFailure {
    /// Root of the subtree.
    pub id: Uuid,
    /// Name of the subtree root.
    pub name: String,
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

/// Result of emptying the trash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyTrashReport {
    /// Top-level trashed nodes fully purged.
    pub purged_roots: u64,
    /// Records removed across all subtrees.
    pub removed_nodes: u64,
    /// Blobs removed across all subtrees.
    pub deleted_blobs: u64,
    /// Subtrees that stopped on an error.
    pub failures: Vec<PurgeFailure>,
}

impl EmptyTrashReport {
    /// Whether every subtree was purged.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Permanently removes trashed nodes from both the blob store and the
/// entity store.
#[derive(Debug, Clone)]
pub struct PurgeService {
    store: Arc<dyn NodeStore>,
    storage: Arc<dyn StorageProvider>,
    navigator: HierarchyNavigator,
}

impl PurgeService {
    /// Creates a new purge service.
    pub fn new(
        store: Arc<dyn NodeStore>,
        storage: Arc<dyn StorageProvider>,
        navigator: HierarchyNavigator,
    ) -> Self {
        Self {
            store,
            storage,
            navigator,
        }
    }

    /// Permanently delete a trashed node and everything below it.
    pub async fn purge(&self, ctx: &RequestContext, id: Uuid) -> AppResult<PurgeReport> {
        let node = self.store.get(&ctx.owner_id, id).await?;
        if !node.is_trash {
            return Err(AppError::not_in_trash(format!(
                "'{}' must be moved to the trash before it can be deleted",
                node.name
            )));
        }
        let report = self.purge_subtree(&ctx.owner_id, node).await?;
        info!(
            owner_id = %ctx.owner_id,
            node_id = %id,
            removed = report.removed_nodes,
            blobs = report.deleted_blobs,
            "Purged node"
        );
        Ok(report)
    }

    /// Purge every top-level trashed node of the owner.
    ///
    /// A trashed node whose ancestor is also trashed is purged as part of
    /// that ancestor. A failing subtree is reported and the rest proceed.
    pub async fn purge_all_trash(&self, ctx: &RequestContext) -> AppResult<EmptyTrashReport> {
        let owner = &ctx.owner_id;
        let trashed = self.store.list_trashed(owner).await?;
        let trashed_ids: HashSet<Uuid> = trashed.iter().map(|n| n.id).collect();

        let mut report = EmptyTrashReport::default();
        let mut roots = Vec::new();
        for node in trashed {
            let covered = match node.parent_id {
                Some(parent) if trashed_ids.contains(&parent) => true,
                Some(_) => match self.navigator.ancestors(owner, &node).await {
                    Ok(chain) => chain.iter().any(|a| trashed_ids.contains(&a.id)),
                    Err(e) => {
                        warn!(owner_id = %owner, node_id = %node.id, error = %e, "Skipping trashed node with broken ancestry");
                        report.failures.push(PurgeFailure {
                            id: node.id,
                            name: node.name,
                            kind: e.kind,
                            message: e.message,
                        });
                        continue;
                    }
                },
                None => false,
            };
            if !covered {
                roots.push(node);
            }
        }

        for root in roots {
            let (id, name) = (root.id, root.name.clone());
            match self.purge_subtree(owner, root).await {
                Ok(done) => {
                    report.purged_roots += 1;
                    report.removed_nodes += done.removed_nodes;
                    report.deleted_blobs += done.deleted_blobs;
                }
                Err(e) => {
                    warn!(owner_id = %owner, node_id = %id, error = %e, "Failed to purge trashed subtree");
                    report.failures.push(PurgeFailure {
                        id,
                        name,
                        kind: e.kind,
                        message: e.message,
                    });
                }
            }
        }

        info!(
            owner_id = %owner,
            purged = report.purged_roots,
            removed = report.removed_nodes,
            failed = report.failures.len(),
            "Emptied trash"
        );
        Ok(report)
    }

    async fn purge_subtree(&self, owner: &OwnerId, root: FileNode) -> AppResult<PurgeReport> {
        let mut closure = Vec::new();
        if root.is_folder {
            closure = self.navigator.descendants(owner, root.id).await?;
        }
        closure.push(root);

        let (folders, leaves): (Vec<FileNode>, Vec<FileNode>) =
            closure.into_iter().partition(|n| n.is_folder);

        let mut report = PurgeReport::default();
        for leaf in leaves {
            if let Some(path) = &leaf.path {
                self.storage.delete(path).await.map_err(|e| {
                    error!(owner_id = %owner, node_id = %leaf.id, %path, error = %e, "Blob deletion failed");
                    AppError::storage_unavailable(format!(
                        "Could not delete stored data for '{}': {}",
                        leaf.name, e.message
                    ))
                })?;
                report.deleted_blobs += 1;
            }
            self.store.delete(owner, leaf.id).await?;
            report.removed_nodes += 1;
        }

        let folder_ids: Vec<Uuid> = folders.iter().map(|f| f.id).collect();
        report.removed_nodes += self.store.delete_many(owner, &folder_ids).await?;
        Ok(report)
    }
}
