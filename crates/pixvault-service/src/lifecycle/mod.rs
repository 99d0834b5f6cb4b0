//! Star and trash transitions with descendant cascade.

pub mod service;

pub use service::{LifecycleService, TrashOutcome};
