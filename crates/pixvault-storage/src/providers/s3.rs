//! S3-compatible object storage provider (requires the `s3` feature).

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream as S3Body;
use bytes::{Bytes, BytesMut};
use futures::stream::StreamExt;
use tracing::{debug, info};

use pixvault_core::config::S3StorageConfig;
use pixvault_core::error::AppError;
use pixvault_core::result::AppResult;
use pixvault_core::traits::storage::{ByteStream, StorageProvider, StoredBlob};

use crate::url::UrlBuilder;

/// S3-compatible storage provider.
#[derive(Debug, Clone)]
pub struct S3StorageProvider {
    client: Client,
    bucket: String,
    urls: UrlBuilder,
}

fn unavailable(action: &str, err: impl std::error::Error) -> AppError {
    AppError::storage_unavailable(format!("S3 {action} failed: {}", DisplayErrorContext(err)))
}

impl S3StorageProvider {
    /// Create a new S3 storage provider.
    ///
    /// Static credentials are used when both keys are configured; otherwise
    /// the default AWS credential chain applies.
    pub async fn new(config: &S3StorageConfig, urls: UrlBuilder) -> AppResult<Self> {
        if config.bucket.trim().is_empty() {
            return Err(AppError::configuration("storage.s3.bucket is required"));
        }
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 storage provider"
        );

        let region = Region::new(config.region.clone());
        let mut builder = if config.access_key.is_empty() || config.secret_key.is_empty() {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .load()
                .await;
            aws_sdk_s3::config::Builder::from(&shared)
        } else {
            aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(Credentials::new(
                    config.access_key.clone(),
                    config.secret_key.clone(),
                    None,
                    None,
                    "pixvault",
                ))
        };
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone()).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            urls,
        })
    }
}

#[async_trait]
impl StorageProvider for S3StorageProvider {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn put_stream(
        &self,
        key: &str,
        content_type: &str,
        mut stream: ByteStream,
    ) -> AppResult<StoredBlob> {
        // Uploads are capped well below the multipart threshold, so the
        // body is buffered and sent in one request.
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        let size_bytes = buffer.len() as u64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(S3Body::from(buffer.freeze()))
            .send()
            .await
            .map_err(|e| unavailable("put_object", e))?;

        debug!(key, bytes = size_bytes, "Stored blob in S3");
        Ok(StoredBlob {
            path: key.to_string(),
            url: self.urls.file_url(key),
            size_bytes,
        })
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    AppError::not_found(format!("Blob not found: {path}"))
                } else {
                    unavailable("get_object", e)
                }
            })?;
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| unavailable("get_object body", e))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| unavailable("delete_object", e))?;
        debug!(path, "Deleted blob from S3");
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_not_found()) => Ok(false),
            Err(e) => Err(unavailable("head_object", e)),
        }
    }

    fn url_for(&self, path: &str) -> String {
        self.urls.file_url(path)
    }
}
