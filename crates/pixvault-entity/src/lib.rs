//! # pixvault-entity
//!
//! Domain entity models for PixVault. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod node;

pub use node::{Crumb, FOLDER_MIME_TYPE, FileNode, MAX_NAME_LEN, NewFileNode, NodePatch, ViewCounts, ViewFilter};
