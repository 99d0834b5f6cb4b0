//! File node repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use pixvault_core::error::{AppError, ErrorKind};
use pixvault_core::result::AppResult;
use pixvault_core::types::OwnerId;
use pixvault_entity::{FileNode, NewFileNode, NodePatch};

use crate::store::NodeStore;

const LISTING_ORDER: &str = "ORDER BY is_folder DESC, name ASC, created_at ASC";

/// PostgreSQL-backed entity store.
#[derive(Debug, Clone)]
pub struct NodeRepository {
    pool: PgPool,
}

impl NodeRepository {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Node {id} not found"))
}

#[async_trait]
impl NodeStore for NodeRepository {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    async fn list(&self, owner: &OwnerId, parent_id: Option<Uuid>) -> AppResult<Vec<FileNode>> {
        let sql = format!(
            "SELECT * FROM file_nodes WHERE owner_id = $1 AND parent_id IS NOT DISTINCT FROM $2 {LISTING_ORDER}"
        );
        sqlx::query_as::<_, FileNode>(&sql)
            .bind(owner)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list nodes", e))
    }

    async fn get(&self, owner: &OwnerId, id: Uuid) -> AppResult<FileNode> {
        sqlx::query_as::<_, FileNode>("SELECT * FROM file_nodes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))?
            .ok_or_else(|| not_found(id))
    }

    async fn insert(&self, data: &NewFileNode) -> AppResult<FileNode> {
        sqlx::query_as::<_, FileNode>(
            "INSERT INTO file_nodes (id, owner_id, name, parent_id, is_folder, path, file_url, mime_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.owner_id)
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(data.is_folder)
        .bind(&data.path)
        .bind(&data.file_url)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert node", e))
    }

    async fn update(&self, owner: &OwnerId, id: Uuid, patch: &NodePatch) -> AppResult<FileNode> {
        sqlx::query_as::<_, FileNode>(
            "UPDATE file_nodes SET \
             name = COALESCE($3, name), \
             is_starred = COALESCE($4, is_starred), \
             is_trash = COALESCE($5, is_trash), \
             updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(patch.is_starred)
        .bind(patch.is_trash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update node", e))?
        .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, owner: &OwnerId, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM file_nodes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete node", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list_children_of(
        &self,
        owner: &OwnerId,
        parent_ids: &[Uuid],
    ) -> AppResult<Vec<FileNode>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT * FROM file_nodes WHERE owner_id = $1 AND parent_id = ANY($2) {LISTING_ORDER}"
        );
        sqlx::query_as::<_, FileNode>(&sql)
            .bind(owner)
            .bind(parent_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn set_trash(&self, owner: &OwnerId, ids: &[Uuid], value: bool) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE file_nodes SET is_trash = $3, updated_at = NOW() \
             WHERE owner_id = $1 AND id = ANY($2)",
        )
        .bind(owner)
        .bind(ids)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set trash flag", e))?;
        Ok(result.rows_affected())
    }

    async fn list_trashed(&self, owner: &OwnerId) -> AppResult<Vec<FileNode>> {
        let sql = format!("SELECT * FROM file_nodes WHERE owner_id = $1 AND is_trash {LISTING_ORDER}");
        sqlx::query_as::<_, FileNode>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list trashed nodes", e)
            })
    }

    async fn delete_many(&self, owner: &OwnerId, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM file_nodes WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete nodes", e))?;
        Ok(result.rows_affected())
    }
}
