//! Response DTOs.

use serde::{Deserialize, Serialize};

use pixvault_service::{EmptyTrashReport, PurgeFailure};

/// Result of toggling the trash flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashResponse {
    /// Trash flag of the target after the toggle.
    pub is_trash: bool,
}

/// Plain success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Whether the operation succeeded.
    pub success: bool,
}

/// Result of emptying the trash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyTrashResponse {
    /// False when any subtree could not be purged.
    pub success: bool,
    pub purged_roots: u64,
    pub removed_nodes: u64,
    pub deleted_blobs: u64,
    /// Subtrees left in the trash.
    pub failures: Vec<FailureEntry>,
}

/// One subtree that could not be purged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEntry {
    pub id: String,
    pub name: String,
    pub error: String,
    pub message: String,
}

impl From<PurgeFailure> for FailureEntry {
    fn from(failure: PurgeFailure) -> Self {
        Self {
            id: failure.id.to_string(),
            name: failure.name,
            error: failure.kind.to_string(),
            message: failure.message,
        }
    }
}

impl From<EmptyTrashReport> for EmptyTrashResponse {
    fn from(report: EmptyTrashReport) -> Self {
        Self {
            success: report.is_complete(),
            purged_roots: report.purged_roots,
            removed_nodes: report.removed_nodes,
            deleted_blobs: report.deleted_blobs,
            failures: report.failures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Version.
    pub version: String,
    /// Entity store backend name.
    pub store: String,
    /// Whether the entity store answered.
    pub store_healthy: bool,
    /// Blob provider name.
    pub storage: String,
    /// Whether the blob provider answered.
    pub storage_healthy: bool,
}
