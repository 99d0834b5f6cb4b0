//! Lifecycle state machine over the `is_starred` and `is_trash` flags.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use pixvault_core::result::AppResult;
use pixvault_database::NodeStore;
use pixvault_entity::{FileNode, NodePatch, ViewCounts, ViewFilter};

use crate::context::RequestContext;
use crate::hierarchy::HierarchyNavigator;

/// Result of a trash toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashOutcome {
    /// The toggled node.
    pub id: Uuid,
    /// The node's trash flag after the toggle.
    pub is_trash: bool,
    /// Rows written, the node itself plus any descendants.
    pub affected: u64,
    /// Set when a node was restored while one of its ancestors is still
    /// trashed. The node is then hidden from "all" listings of its parent
    /// until the ancestor is restored as well.
    pub trashed_ancestor: bool,
}

/// Governs starring, trashing, and restoring, and the listings that depend
/// on those flags.
#[derive(Debug, Clone)]
pub struct LifecycleService {
    store: Arc<dyn NodeStore>,
    navigator: HierarchyNavigator,
}

impl LifecycleService {
    /// Creates a new lifecycle service.
    pub fn new(store: Arc<dyn NodeStore>, navigator: HierarchyNavigator) -> Self {
        Self { store, navigator }
    }

    /// Fetch a single node.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<FileNode> {
        self.store.get(&ctx.owner_id, id).await
    }

    /// List a folder. Without a view, trashed children are listed too.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        parent_id: Option<Uuid>,
        view: Option<ViewFilter>,
    ) -> AppResult<Vec<FileNode>> {
        let nodes = self
            .navigator
            .list_children(&ctx.owner_id, parent_id)
            .await?;
        Ok(match view {
            Some(view) => view.apply(nodes),
            None => nodes,
        })
    }

    /// Per-view counts for a folder.
    pub async fn counts(&self, ctx: &RequestContext, parent_id: Option<Uuid>) -> AppResult<ViewCounts> {
        let nodes = self
            .navigator
            .list_children(&ctx.owner_id, parent_id)
            .await?;
        Ok(ViewCounts::from_nodes(&nodes))
    }

    /// Flip the starred flag. Applying it twice restores the original value.
    pub async fn toggle_star(&self, ctx: &RequestContext, id: Uuid) -> AppResult<FileNode> {
        let node = self.store.get(&ctx.owner_id, id).await?;
        let updated = self
            .store
            .update(&ctx.owner_id, id, &NodePatch::starred(!node.is_starred))
            .await?;

        info!(
            owner_id = %ctx.owner_id,
            node_id = %id,
            is_starred = updated.is_starred,
            "Toggled star"
        );
        Ok(updated)
    }

    /// Flip the trash flag, cascading to every descendant of a folder.
    ///
    /// The node and its whole subtree are written in one store call, so the
    /// subtree never shows a trashed parent above a live child.
    pub async fn toggle_trash(&self, ctx: &RequestContext, id: Uuid) -> AppResult<TrashOutcome> {
        let owner = &ctx.owner_id;
        let node = self.store.get(owner, id).await?;
        let target = !node.is_trash;

        let mut ids = vec![node.id];
        if node.is_folder {
            ids.extend(
                self.navigator
                    .descendants(owner, node.id)
                    .await?
                    .into_iter()
                    .map(|n| n.id),
            );
        }
        // Walked before the write so a corrupt chain fails with nothing flipped.
        let trashed_ancestor =
            !target && node.parent_id.is_some() && self.navigator.has_trashed_ancestor(owner, &node).await?;
        let affected = self.store.set_trash(owner, &ids, target).await?;

        if trashed_ancestor {
            warn!(
                owner_id = %owner,
                node_id = %id,
                "Restored node sits under a trashed ancestor"
            );
        }

        info!(
            owner_id = %owner,
            node_id = %id,
            is_trash = target,
            affected,
            "Toggled trash"
        );
        Ok(TrashOutcome {
            id,
            is_trash: target,
            affected,
            trashed_ancestor,
        })
    }
}
