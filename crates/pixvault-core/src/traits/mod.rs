//! Core traits defined in `pixvault-core` and implemented by other crates.

pub mod storage;

pub use storage::{ByteStream, StorageProvider, StoredBlob};
