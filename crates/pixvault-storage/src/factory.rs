//! Builds the configured blob store provider.

use std::sync::Arc;

use tracing::info;

use pixvault_core::config::StorageConfig;
use pixvault_core::error::AppError;
use pixvault_core::result::AppResult;
use pixvault_core::traits::storage::StorageProvider;

use crate::providers::LocalStorageProvider;
use crate::url::UrlBuilder;

/// Instantiate the provider named by `storage.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let urls = UrlBuilder::from_config(config);
    let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
        "local" => Arc::new(LocalStorageProvider::new(&config.local.root_path, urls).await?),
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3StorageProvider::new(&config.s3, urls).await?),
        #[cfg(not(feature = "s3"))]
        "s3" => {
            return Err(AppError::configuration(
                "storage.provider = \"s3\" requires the `s3` feature",
            ));
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'"
            )));
        }
    };

    info!(provider = provider.provider_type(), "Blob store ready");
    Ok(provider)
}
