//! The entity store contract.

use async_trait::async_trait;
use uuid::Uuid;

use pixvault_core::result::AppResult;
use pixvault_core::types::OwnerId;
use pixvault_entity::{FileNode, NewFileNode, NodePatch};

/// Persistent, owner-scoped storage of file and folder records.
///
/// Every operation is filtered by owner. A record that exists but belongs
/// to someone else is indistinguishable from a missing one.
///
/// Listings are ordered folders first, then by name ascending, then by
/// creation time ascending.
#[async_trait]
pub trait NodeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name for logging (e.g. "postgres", "memory").
    fn backend(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// List the direct children of `parent_id` (root level when `None`).
    async fn list(&self, owner: &OwnerId, parent_id: Option<Uuid>) -> AppResult<Vec<FileNode>>;

    /// Fetch a single node. Fails with `NotFound` when missing or foreign.
    async fn get(&self, owner: &OwnerId, id: Uuid) -> AppResult<FileNode>;

    /// Insert a record with the caller-chosen ID.
    async fn insert(&self, data: &NewFileNode) -> AppResult<FileNode>;

    /// Apply a partial update. Fails with `NotFound` when missing or foreign.
    async fn update(&self, owner: &OwnerId, id: Uuid, patch: &NodePatch) -> AppResult<FileNode>;

    /// Delete a single record. Fails with `NotFound` when missing or foreign.
    async fn delete(&self, owner: &OwnerId, id: Uuid) -> AppResult<()>;

    /// List every direct child of any of the given parents.
    async fn list_children_of(&self, owner: &OwnerId, parent_ids: &[Uuid])
    -> AppResult<Vec<FileNode>>;

    /// Set the trash flag on every listed node in a single atomic write.
    ///
    /// Returns the number of rows changed. IDs that are missing or foreign
    /// are skipped.
    async fn set_trash(&self, owner: &OwnerId, ids: &[Uuid], value: bool) -> AppResult<u64>;

    /// List every node of the owner whose trash flag is set.
    async fn list_trashed(&self, owner: &OwnerId) -> AppResult<Vec<FileNode>>;

    /// Delete every listed record in a single atomic write.
    async fn delete_many(&self, owner: &OwnerId, ids: &[Uuid]) -> AppResult<u64>;
}
