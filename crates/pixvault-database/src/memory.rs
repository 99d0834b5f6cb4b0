//! In-memory entity store.
//!
//! Mirrors the PostgreSQL repository closely enough to back development
//! servers and tests: owner scoping, listing order, and the rule that a
//! record cannot be deleted while another record still points at it.
//! Parent existence is not checked on insert.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use pixvault_core::error::AppError;
use pixvault_core::result::AppResult;
use pixvault_core::types::OwnerId;
use pixvault_entity::{FileNode, NewFileNode, NodePatch};

use crate::store::NodeStore;

/// Entity store held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNodeStore {
    nodes: Arc<RwLock<HashMap<Uuid, FileNode>>>,
}

impl MemoryNodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all owners.
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }
}

fn listing_order(a: &FileNode, b: &FileNode) -> Ordering {
    b.is_folder
        .cmp(&a.is_folder)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

fn sorted(mut nodes: Vec<FileNode>) -> Vec<FileNode> {
    nodes.sort_by(listing_order);
    nodes
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Node {id} not found"))
}

fn still_referenced(nodes: &HashMap<Uuid, FileNode>, removing: &HashSet<Uuid>) -> Option<Uuid> {
    nodes
        .values()
        .filter(|n| !removing.contains(&n.id))
        .find_map(|n| n.parent_id.filter(|p| removing.contains(p)))
}

#[async_trait]
impl NodeStore for MemoryNodeStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn list(&self, owner: &OwnerId, parent_id: Option<Uuid>) -> AppResult<Vec<FileNode>> {
        let nodes = self.nodes.read().await;
        Ok(sorted(
            nodes
                .values()
                .filter(|n| &n.owner_id == owner && n.parent_id == parent_id)
                .cloned()
                .collect(),
        ))
    }

    async fn get(&self, owner: &OwnerId, id: Uuid) -> AppResult<FileNode> {
        self.nodes
            .read()
            .await
            .get(&id)
            .filter(|n| &n.owner_id == owner)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn insert(&self, data: &NewFileNode) -> AppResult<FileNode> {
        if data.name.trim().is_empty() {
            return Err(AppError::database("Node name must not be blank"));
        }
        if data.is_folder && (data.path.is_some() || data.file_url.is_some()) {
            return Err(AppError::database("Folders cannot reference a blob"));
        }
        if !data.is_folder && (data.path.is_none() || data.file_url.is_none()) {
            return Err(AppError::database("Files must reference a blob"));
        }

        let mut nodes = self.nodes.write().await;
        if nodes.contains_key(&data.id) {
            return Err(AppError::database(format!("Duplicate node id {}", data.id)));
        }
        let node = FileNode::from_new(data.clone(), Utc::now());
        nodes.insert(node.id, node.clone());
        Ok(node)
    }

    async fn update(&self, owner: &OwnerId, id: Uuid, patch: &NodePatch) -> AppResult<FileNode> {
        let mut nodes = self.nodes.write().await;
        let node = nodes
            .get_mut(&id)
            .filter(|n| &n.owner_id == owner)
            .ok_or_else(|| not_found(id))?;
        patch.apply(node, Utc::now());
        Ok(node.clone())
    }

    async fn delete(&self, owner: &OwnerId, id: Uuid) -> AppResult<()> {
        let mut nodes = self.nodes.write().await;
        if !nodes.get(&id).is_some_and(|n| &n.owner_id == owner) {
            return Err(not_found(id));
        }
        let removing = HashSet::from([id]);
        if let Some(child) = still_referenced(&nodes, &removing) {
            return Err(AppError::database(format!(
                "Node {id} is still referenced by {child}"
            )));
        }
        nodes.remove(&id);
        Ok(())
    }

    async fn list_children_of(
        &self,
        owner: &OwnerId,
        parent_ids: &[Uuid],
    ) -> AppResult<Vec<FileNode>> {
        let parents: HashSet<Uuid> = parent_ids.iter().copied().collect();
        let nodes = self.nodes.read().await;
        Ok(sorted(
            nodes
                .values()
                .filter(|n| &n.owner_id == owner)
                .filter(|n| n.parent_id.is_some_and(|p| parents.contains(&p)))
                .cloned()
                .collect(),
        ))
    }

    async fn set_trash(&self, owner: &OwnerId, ids: &[Uuid], value: bool) -> AppResult<u64> {
        let now = Utc::now();
        let mut nodes = self.nodes.write().await;
        let mut changed = 0;
        for id in ids {
            if let Some(node) = nodes.get_mut(id).filter(|n| &n.owner_id == owner) {
                node.is_trash = value;
                node.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn list_trashed(&self, owner: &OwnerId) -> AppResult<Vec<FileNode>> {
        let nodes = self.nodes.read().await;
        Ok(sorted(
            nodes
                .values()
                .filter(|n| &n.owner_id == owner && n.is_trash)
                .cloned()
                .collect(),
        ))
    }

    async fn delete_many(&self, owner: &OwnerId, ids: &[Uuid]) -> AppResult<u64> {
        let mut nodes = self.nodes.write().await;
        let removing: HashSet<Uuid> = ids
            .iter()
            .copied()
            .filter(|id| nodes.get(id).is_some_and(|n| &n.owner_id == owner))
            .collect();
        if let Some(child) = still_referenced(&nodes, &removing) {
            return Err(AppError::database(format!(
                "Cannot delete nodes still referenced by {child}"
            )));
        }
        for id in &removing {
            nodes.remove(id);
        }
        Ok(removing.len() as u64)
    }
}
