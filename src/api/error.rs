//! API error types with structured JSON responses.
//!
//! Sole translation point from pipeline failures to the wire shape
//! `{success: false, error, extractedData: {}, details?}`. Nothing below
//! the API layer builds HTTP responses, and no internal error type leaks
//! to the caller unformatted.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::pipeline::ondemand::RemoteError;
use crate::pipeline::PipelineError;

/// Error response body. `extracted_data` is always present (an empty
/// object) so clients can destructure the same shape on every path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub extracted_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFile,
    #[error("Invalid file type. Only PNG, JPG, and PDF are allowed.")]
    UnsupportedMediaType,
    #[error("Malformed upload request: {0}")]
    BadMultipart(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("OnDemand API error (HTTP {status})")]
    Upstream { status: u16, body: Value },
    #[error("Network error: Could not connect to OnDemand API.")]
    Unavailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NoFile => (StatusCode::BAD_REQUEST, "No file uploaded".to_string(), None),
            ApiError::UnsupportedMediaType => (
                StatusCode::BAD_REQUEST,
                "Invalid file type. Only PNG, JPG, and PDF are allowed.".to_string(),
                None,
            ),
            ApiError::BadMultipart(detail) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed upload request: {detail}"),
                None,
            ),
            ApiError::ExtractionFailed(reason) => {
                (StatusCode::INTERNAL_SERVER_ERROR, reason, None)
            }
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_else(|| "Unknown error".to_string());
                (
                    status,
                    format!("API Error ({}): {message}", status.as_u16()),
                    Some(body),
                )
            }
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Network error: Could not connect to OnDemand API.".to_string(),
                None,
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, detail, None)
            }
        };

        let body = ErrorBody {
            success: false,
            error,
            extracted_data: Value::Object(Default::default()),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::ExtractionFailed { reason } => ApiError::ExtractionFailed(reason),
            PipelineError::Remote(RemoteError::Api { status, body }) => {
                ApiError::Upstream { status, body }
            }
            PipelineError::Remote(RemoteError::Network(_)) => ApiError::Unavailable,
            PipelineError::Remote(RemoteError::InvalidResponse(detail)) => {
                ApiError::Internal(detail)
            }
        }
    }
}
