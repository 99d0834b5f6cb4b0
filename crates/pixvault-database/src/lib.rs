//! # pixvault-database
//!
//! Entity store for file and folder records: the [`NodeStore`] trait, a
//! PostgreSQL implementation, and an in-memory implementation used for
//! local development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryNodeStore;
pub use repositories::NodeRepository;
pub use store::NodeStore;
