//! Core type definitions used across the PixVault workspace.

pub mod id;

pub use id::OwnerId;
