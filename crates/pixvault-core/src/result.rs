//! Convenience result type alias for PixVault.

use crate::error::AppError;

/// A specialized `Result` type for PixVault operations.
pub type AppResult<T> = Result<T, AppError>;
