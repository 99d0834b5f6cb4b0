//! Breadcrumb entries for hierarchical display.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::FileNode;

/// One step on the path from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
}

impl From<&FileNode> for Crumb {
    fn from(node: &FileNode) -> Self {
        Self {
            id: node.id,
            name: node.name.clone(),
        }
    }
}
