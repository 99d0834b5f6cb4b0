//! Repository implementations backed by PostgreSQL.

pub mod node;

pub use node::NodeRepository;
