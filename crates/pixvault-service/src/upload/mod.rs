//! Upload orchestration: validate, commit the blob, then insert the record.

pub mod progress;
pub mod service;

pub use progress::ProgressTracker;
pub use service::{UploadControl, UploadRequest, UploadService};
