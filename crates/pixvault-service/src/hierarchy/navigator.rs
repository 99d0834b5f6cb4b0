//! Parent/child resolution over the owner's node table.
//!
//! Descendant sets are computed breadth-first, one store round trip per
//! level, with a visited set so corrupt parent links surface as
//! `CorruptHierarchy` instead of looping.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use pixvault_core::error::{AppError, ErrorKind};
use pixvault_core::result::AppResult;
use pixvault_core::types::OwnerId;
use pixvault_database::NodeStore;
use pixvault_entity::{Crumb, FileNode};

use super::path::FolderPath;

/// Resolves hierarchy relationships for one owner at a time.
#[derive(Debug, Clone)]
pub struct HierarchyNavigator {
    store: Arc<dyn NodeStore>,
}

impl HierarchyNavigator {
    /// Creates a new navigator.
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self { store }
    }

    /// Resolve a parent reference. `None` is the root and always valid.
    ///
    /// A missing, foreign, or non-folder parent fails with `InvalidTarget`.
    pub async fn resolve_folder(
        &self,
        owner: &OwnerId,
        parent_id: Option<Uuid>,
    ) -> AppResult<Option<FileNode>> {
        let Some(id) = parent_id else {
            return Ok(None);
        };
        let node = match self.store.get(owner, id).await {
            Ok(node) => node,
            Err(e) if e.is(ErrorKind::NotFound) => {
                return Err(AppError::invalid_target(format!("Folder {id} not found")));
            }
            Err(e) => return Err(e),
        };
        if !node.is_folder {
            return Err(AppError::invalid_target(format!(
                "'{}' is not a folder",
                node.name
            )));
        }
        Ok(Some(node))
    }

    /// Direct children of a folder (or the root), trashed ones included.
    pub async fn list_children(
        &self,
        owner: &OwnerId,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<FileNode>> {
        self.resolve_folder(owner, parent_id).await?;
        self.store.list(owner, parent_id).await
    }

    /// Ancestors of `node`, nearest first.
    pub async fn ancestors(&self, owner: &OwnerId, node: &FileNode) -> AppResult<Vec<FileNode>> {
        let mut visited = HashSet::from([node.id]);
        let mut chain = Vec::new();
        let mut next = node.parent_id;

        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                error!(owner_id = %owner, node_id = %node.id, %parent_id, "Cycle in parent links");
                return Err(AppError::corrupt_hierarchy(format!(
                    "Cycle detected above node {}",
                    node.id
                )));
            }
            let parent = match self.store.get(owner, parent_id).await {
                Ok(parent) => parent,
                Err(e) if e.is(ErrorKind::NotFound) => {
                    return Err(AppError::corrupt_hierarchy(format!(
                        "Node {} references missing parent {parent_id}",
                        node.id
                    )));
                }
                Err(e) => return Err(e),
            };
            next = parent.parent_id;
            chain.push(parent);
        }
        Ok(chain)
    }

    /// Breadcrumb trail from the root down to and including `id`.
    pub async fn breadcrumbs(&self, owner: &OwnerId, id: Uuid) -> AppResult<Vec<Crumb>> {
        let node = self.store.get(owner, id).await?;
        let ancestors = self.ancestors(owner, &node).await?;
        Ok(ancestors
            .iter()
            .rev()
            .chain(std::iter::once(&node))
            .map(Crumb::from)
            .collect())
    }

    /// Whether any ancestor of `node` is in the trash.
    pub async fn has_trashed_ancestor(&self, owner: &OwnerId, node: &FileNode) -> AppResult<bool> {
        Ok(self
            .ancestors(owner, node)
            .await?
            .iter()
            .any(|a| a.is_trash))
    }

    /// Every node below `root_id`, in breadth-first order. The root itself is
    /// not included.
    pub async fn descendants(&self, owner: &OwnerId, root_id: Uuid) -> AppResult<Vec<FileNode>> {
        let mut visited = HashSet::from([root_id]);
        let mut frontier = vec![root_id];
        let mut found = Vec::new();

        while !frontier.is_empty() {
            let children = self.store.list_children_of(owner, &frontier).await?;
            frontier = Vec::with_capacity(children.len());
            for child in children {
                if !visited.insert(child.id) {
                    error!(owner_id = %owner, node_id = %child.id, "Node reached twice below {root_id}");
                    return Err(AppError::corrupt_hierarchy(format!(
                        "Cycle detected below node {root_id}"
                    )));
                }
                if child.is_folder {
                    frontier.push(child.id);
                }
                found.push(child);
            }
        }

        debug!(owner_id = %owner, node_id = %root_id, count = found.len(), "Collected descendants");
        Ok(found)
    }

    /// Move the navigation state into `target`, which must be an owned folder
    /// directly under the current folder.
    pub async fn navigate_into(
        &self,
        owner: &OwnerId,
        path: &FolderPath,
        target: Uuid,
    ) -> AppResult<FolderPath> {
        let folder = self
            .resolve_folder(owner, Some(target))
            .await?
            .ok_or_else(|| AppError::invalid_target("Target folder is required"))?;
        if folder.parent_id != path.current() {
            return Err(AppError::invalid_target(format!(
                "'{}' is not inside the current folder",
                folder.name
            )));
        }
        Ok(path.clone().enter(Crumb::from(&folder)))
    }
}
