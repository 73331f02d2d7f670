//! HTTP surface of the extraction service.
//!
//! Thin plumbing over the pipeline: one multipart extraction endpoint, a
//! health check, permissive CORS, and the error-to-response mapping. The
//! router is composable — [`extraction_api_router`] returns a `Router`
//! that can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::extraction_api_router;
pub use types::ApiContext;
