//! # pixvault-service
//!
//! The file/folder lifecycle engine. Each service orchestrates the entity
//! store and the blob store to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod folder;
pub mod hierarchy;
pub mod lifecycle;
pub mod purge;
pub mod upload;

pub use context::RequestContext;
pub use folder::FolderService;
pub use hierarchy::{FolderPath, HierarchyNavigator};
pub use lifecycle::{LifecycleService, TrashOutcome};
pub use purge::{EmptyTrashReport, PurgeFailure, PurgeReport, PurgeService};
pub use upload::{ProgressTracker, UploadControl, UploadRequest, UploadService};
