//! # pixvault-storage
//!
//! Blob store providers for PixVault. Supports the local filesystem and,
//! behind the `s3` feature, S3-compatible object stores. Also hosts the
//! retrieval URL builder and image type sniffing.

pub mod factory;
pub mod media;
pub mod providers;
pub mod url;

pub use factory::build_provider;
pub use url::{RetrievalUrls, UrlBuilder};
