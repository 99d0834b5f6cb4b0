//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use pixvault_core::error::AppError;

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    /// Owner the client believes it is acting for.
    pub user_id: Option<String>,
    /// Parent folder, absent or `null` for the root.
    pub parent_id: Option<String>,
}

/// Query for listing a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    /// Owner the client believes it is acting for.
    pub user_id: Option<String>,
    /// Folder to list.
    pub parent_id: Option<String>,
    /// `all`, `starred` or `trash`.
    pub view: Option<String>,
}

/// Query carrying only the owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    /// Owner the client believes it is acting for.
    pub user_id: Option<String>,
}

/// Runs `validator` rules and maps failures into the error taxonomy.
pub fn validate<T: Validate>(dto: &T) -> Result<(), AppError> {
    dto.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
