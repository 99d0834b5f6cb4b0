//! Owner identifier supplied by the external identity provider.
//!
//! The identity provider hands out opaque strings (`user_2ab...`), so unlike
//! node ids this is not a UUID. When the `sqlx` feature is enabled the type
//! maps transparently onto a PostgreSQL `TEXT` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identifier of the user that owns a node. All store queries are scoped by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct OwnerId(String);

impl OwnerId {
    /// Build an owner id, rejecting blank input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, AppError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AppError::authentication("Missing user identity"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OwnerId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
