//! Retrieval URL construction.
//!
//! Blob URLs are the public base joined with the storage key. When the base
//! is an image CDN, viewer and download URLs carry `tr:` path transforms.

use serde::{Deserialize, Serialize};

use pixvault_core::config::StorageConfig;

const VIEW_TRANSFORM: &str = "tr:q-90,w-1600,h-1200,fo-auto";
const DOWNLOAD_TRANSFORM: &str = "tr:q-100,orig-true";

/// Builds retrieval URLs from storage keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
    transforms: bool,
}

/// The URLs a client needs to display and download an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalUrls {
    /// Plain blob URL.
    pub file_url: String,
    /// Resized, quality-reduced URL for the in-app viewer.
    pub view_url: String,
    /// Full-quality original for downloads.
    pub download_url: String,
}

impl UrlBuilder {
    /// Create a builder over `base`.
    pub fn new(base: impl Into<String>, transforms: bool) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            transforms,
        }
    }

    /// Create a builder from the storage section of the configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.public_base_url.clone(), config.image_transforms)
    }

    /// Plain URL for a storage key.
    pub fn file_url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Viewer URL for a storage key.
    pub fn view_url(&self, path: &str) -> String {
        self.transformed(VIEW_TRANSFORM, path)
    }

    /// Download URL for a storage key.
    pub fn download_url(&self, path: &str) -> String {
        self.transformed(DOWNLOAD_TRANSFORM, path)
    }

    /// All retrieval URLs for a storage key.
    pub fn retrieval_urls(&self, path: &str) -> RetrievalUrls {
        RetrievalUrls {
            file_url: self.file_url(path),
            view_url: self.view_url(path),
            download_url: self.download_url(path),
        }
    }

    fn transformed(&self, transform: &str, path: &str) -> String {
        if !self.transforms {
            return self.file_url(path);
        }
        format!("{}/{}/{}", self.base, transform, path.trim_start_matches('/'))
    }
}
