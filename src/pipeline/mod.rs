//! Extraction pipeline — session acquisition, document upload, response
//! normalization, and field parsing for Aadhaar documents.
//!
//! Layering, leaves first: `ondemand` (HTTP seam to the remote service),
//! `session` (session id acquisition/synthesis), `upload` (multipart
//! submission with the single session retry), `resolve` (response-shape
//! normalization to plain text), `rules`/`fields` (ordered pattern rules →
//! structured record), `orchestrator` (end-to-end composition).

pub mod fields;
pub mod ondemand;
pub mod orchestrator;
pub mod resolve;
pub mod rules;
pub mod session;
pub mod types;
pub mod upload;

use thiserror::Error;

use crate::pipeline::ondemand::RemoteError;

/// Failures that escape the pipeline. Translated into HTTP responses by
/// the API layer only — nothing below it produces a response shape.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The remote service processed the document and reported a failure.
    #[error("Extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    /// Upload failed (API error after the retry policy, or transport error).
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
