//! Extraction API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! The body limit sits above the per-file cap to leave room for multipart
//! framing; per-file validation happens in the extract handler.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::endpoints::extract::MAX_UPLOAD_BYTES;
use crate::api::types::ApiContext;

/// Build the extraction API router.
pub fn extraction_api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/api/extract-aadhar", post(endpoints::extract::extract))
        .route("/api/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)) // multipart framing overhead
        .layer(CorsLayer::permissive())
}
