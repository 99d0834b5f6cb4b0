//! Permanent deletion of trashed subtrees.

pub mod service;

pub use service::{EmptyTrashReport, PurgeFailure, PurgeReport, PurgeService};
