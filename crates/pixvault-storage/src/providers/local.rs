//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use pixvault_core::error::{AppError, ErrorKind};
use pixvault_core::result::AppResult;
use pixvault_core::traits::storage::{ByteStream, StorageProvider, StoredBlob};

use crate::url::UrlBuilder;

const PARTIAL_SUFFIX: &str = ".partial";

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored blobs.
    root: PathBuf,
    urls: UrlBuilder,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str, urls: UrlBuilder) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root, urls })
    }

    /// Resolve a storage key to a path within the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes || relative.as_os_str().is_empty() {
            return Err(AppError::validation(format!("Invalid storage key: {path}")));
        }
        Ok(self.root.join(relative))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn write_partial(&self, partial: &Path, mut stream: ByteStream) -> AppResult<u64> {
        let mut file = fs::File::create(partial).await.map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to create blob", e)
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::StorageUnavailable, "Failed to write chunk", e)
            })?;
        }

        file.flush().await.map_err(|e| {
            AppError::with_source(ErrorKind::StorageUnavailable, "Failed to flush blob", e)
        })?;
        Ok(total_bytes)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put_stream(
        &self,
        key: &str,
        _content_type: &str,
        stream: ByteStream,
    ) -> AppResult<StoredBlob> {
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;

        let mut partial = full_path.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        // Bytes only become visible under the key once the stream completes.
        let size_bytes = match self.write_partial(&partial, stream).await {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        fs::rename(&partial, &full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                format!("Failed to commit blob: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = size_bytes, "Stored blob");
        Ok(StoredBlob {
            path: key.to_string(),
            url: self.urls.file_url(key),
            size_bytes,
        })
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to read blob: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        let mut partial = full_path.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);

        // A write interrupted mid-stream leaves only the partial file.
        for target in [full_path, PathBuf::from(partial)] {
            match fs::remove_file(&target).await {
                Ok(()) => debug!(path, file = %target.display(), "Deleted blob"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::StorageUnavailable,
                        format!("Failed to delete blob: {path}"),
                        e,
                    ));
                }
            }
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        Ok(fs::try_exists(&full_path).await?)
    }

    fn url_for(&self, path: &str) -> String {
        self.urls.file_url(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider(dir: &tempfile::TempDir) -> LocalStorageProvider {
        LocalStorageProvider::new(
            dir.path().to_str().unwrap(),
            UrlBuilder::new("http://localhost:8080/blobs", false),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        let data = Bytes::from_static(b"\x89PNG fake");
        let blob = provider
            .put("u1/abc/cat.png", "image/png", data.clone())
            .await
            .unwrap();
        assert_eq!(blob.size_bytes, data.len() as u64);
        assert_eq!(blob.url, "http://localhost:8080/blobs/u1/abc/cat.png");
        assert!(provider.exists("u1/abc/cat.png").await.unwrap());
        assert_eq!(provider.read_bytes("u1/abc/cat.png").await.unwrap(), data);

        provider.delete("u1/abc/cat.png").await.unwrap();
        assert!(!provider.exists("u1/abc/cat.png").await.unwrap());
        provider.delete("u1/abc/cat.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        let stream: ByteStream = Box::pin(futures::stream::iter(vec![
            Ok(Bytes::from_static(b"first")),
            Err(std::io::Error::other("client went away")),
        ]));
        let err = provider
            .put_stream("u1/abc/broken.png", "image/png", stream)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageUnavailable);
        assert!(!provider.exists("u1/abc/broken.png").await.unwrap());
        assert!(!dir.path().join("u1/abc/broken.png.partial").exists());
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        let err = provider.read_bytes("../etc/passwd").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
