//! Explicit navigation state.
//!
//! The folder a client is looking at is an ordered list of crumbs from the
//! root down. It is passed into navigator calls by value, never held in
//! shared state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pixvault_core::error::AppError;
use pixvault_core::result::AppResult;
use pixvault_entity::Crumb;

/// Ordered ancestor chain of the current folder. Empty means the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath {
    crumbs: Vec<Crumb>,
}

impl FolderPath {
    /// The root folder.
    pub fn root() -> Self {
        Self::default()
    }

    /// Rebuild a path from crumbs ordered root first.
    pub fn from_crumbs(crumbs: Vec<Crumb>) -> Self {
        Self { crumbs }
    }

    /// The folder currently shown, or `None` at the root.
    pub fn current(&self) -> Option<Uuid> {
        self.crumbs.last().map(|c| c.id)
    }

    /// Number of folders below the root.
    pub fn depth(&self) -> usize {
        self.crumbs.len()
    }

    /// Crumbs ordered root first.
    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    /// Descend into a child folder.
    pub fn enter(mut self, crumb: Crumb) -> Self {
        self.crumbs.push(crumb);
        self
    }

    /// Go to the parent folder. Going up from the root stays at the root.
    pub fn up(mut self) -> Self {
        self.crumbs.pop();
        self
    }

    /// Jump to the crumb at `index`, dropping everything below it.
    pub fn jump_to(mut self, index: usize) -> AppResult<Self> {
        if index >= self.crumbs.len() {
            return Err(AppError::validation(format!(
                "Breadcrumb index {index} is out of range (depth {})",
                self.crumbs.len()
            )));
        }
        self.crumbs.truncate(index + 1);
        Ok(self)
    }
}
