//! Typed identifier helpers for path and query parameters.

use uuid::Uuid;

use pixvault_core::error::AppError;

/// Parses a UUID from a path segment.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s.trim()).map_err(|_| AppError::validation(format!("Invalid id: {s}")))
}

/// Parses an optional folder reference. Absent, empty, and `"null"` all mean
/// the root.
pub fn parse_optional_uuid(s: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match s.map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(raw) => parse_uuid(raw).map(Some),
    }
}
