//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use pixvault_core::config::AppConfig;
use pixvault_core::traits::storage::StorageProvider;
use pixvault_database::NodeStore;
use pixvault_service::{
    FolderService, HierarchyNavigator, LifecycleService, PurgeService, UploadService,
};
use pixvault_storage::UrlBuilder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Entity store
    pub store: Arc<dyn NodeStore>,
    /// Blob store
    pub storage: Arc<dyn StorageProvider>,
    /// Retrieval URL builder
    pub urls: UrlBuilder,
    /// Breadcrumbs and parent resolution
    pub navigator: HierarchyNavigator,
    /// Star/trash transitions and listings
    pub lifecycle_service: Arc<LifecycleService>,
    /// Upload orchestrator
    pub upload_service: Arc<UploadService>,
    /// Folder creation
    pub folder_service: Arc<FolderService>,
    /// Permanent deletion
    pub purge_service: Arc<PurgeService>,
}

impl AppState {
    /// Wire every service over the given stores.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn NodeStore>,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        let navigator = HierarchyNavigator::new(Arc::clone(&store));
        let lifecycle_service = Arc::new(LifecycleService::new(
            Arc::clone(&store),
            navigator.clone(),
        ));
        let upload_service = Arc::new(UploadService::new(
            Arc::clone(&store),
            Arc::clone(&storage),
            navigator.clone(),
            config.storage.clone(),
        ));
        let folder_service = Arc::new(FolderService::new(Arc::clone(&store), navigator.clone()));
        let purge_service = Arc::new(PurgeService::new(
            Arc::clone(&store),
            Arc::clone(&storage),
            navigator.clone(),
        ));

        Self {
            urls: UrlBuilder::from_config(&config.storage),
            config: Arc::new(config),
            store,
            storage,
            navigator,
            lifecycle_service,
            upload_service,
            folder_service,
            purge_service,
        }
    }
}
