//! Blob storage provider trait for pluggable object store backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Result of committing a blob to a storage provider.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredBlob {
    /// Storage-layer key of the blob.
    pub path: String,
    /// Public retrieval URL.
    pub url: String,
    /// Number of bytes written.
    pub size_bytes: u64,
}

/// A byte stream type used for writing and reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for blob storage backends.
///
/// The [`StorageProvider`] trait is defined here in `pixvault-core` and
/// implemented in `pixvault-storage`. Providers only store bytes; the
/// metadata record pointing at a blob is owned by the entity store.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a byte stream under `key` and return where it landed.
    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        stream: ByteStream,
    ) -> AppResult<StoredBlob>;

    /// Write an in-memory buffer under `key`.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> AppResult<StoredBlob> {
        let stream: ByteStream = Box::pin(futures::stream::once(async move { Ok(data) }));
        self.put_stream(key, content_type, stream).await
    }

    /// Read a blob fully into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Delete a blob. Deleting a missing blob succeeds.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Public retrieval URL for a stored path.
    fn url_for(&self, path: &str) -> String;
}
