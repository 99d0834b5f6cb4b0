//! # pixvault-api
//!
//! HTTP API layer for PixVault built on Axum.
//!
//! Provides the REST endpoints over the lifecycle engine, the identity
//! extractor, middleware (CORS, logging), DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
