//! Listing views: the "all", "starred", and "trash" tabs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::FileNode;

/// Filter applied to a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    /// Everything not in the trash.
    #[default]
    All,
    /// Starred and not in the trash.
    Starred,
    /// In the trash.
    Trash,
}

impl ViewFilter {
    /// Whether a node belongs in this view.
    pub fn matches(&self, node: &FileNode) -> bool {
        match self {
            Self::All => !node.is_trash,
            Self::Starred => node.is_starred && !node.is_trash,
            Self::Trash => node.is_trash,
        }
    }

    /// Keep only the nodes that belong in this view.
    pub fn apply(&self, nodes: Vec<FileNode>) -> Vec<FileNode> {
        nodes.into_iter().filter(|n| self.matches(n)).collect()
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Starred => write!(f, "starred"),
            Self::Trash => write!(f, "trash"),
        }
    }
}

impl FromStr for ViewFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "starred" => Ok(Self::Starred),
            "trash" => Ok(Self::Trash),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// Per-view counts for a folder listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCounts {
    /// Nodes visible in the "all" view.
    pub all: u64,
    /// Nodes visible in the "starred" view.
    pub starred: u64,
    /// Nodes visible in the "trash" view.
    pub trash: u64,
}

impl ViewCounts {
    /// Tally a listing.
    pub fn from_nodes(nodes: &[FileNode]) -> Self {
        let count = |view: ViewFilter| nodes.iter().filter(|n| view.matches(n)).count() as u64;
        Self {
            all: count(ViewFilter::All),
            starred: count(ViewFilter::Starred),
            trash: count(ViewFilter::Trash),
        }
    }
}
