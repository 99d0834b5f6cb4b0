//! # pixvault-core
//!
//! Core crate for PixVault. Contains the unified error system, configuration
//! schemas, the owner identifier, and the blob storage provider trait.
//!
//! This crate has **no** internal dependencies on other PixVault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
