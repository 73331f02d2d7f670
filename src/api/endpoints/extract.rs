//! Document extraction endpoint — multipart upload in, structured record out.
//!
//! `POST /api/extract-aadhar` receives a single `file` part, validates the
//! declared media type, and hands a request-scoped [`DocumentPayload`] to
//! the pipeline. All pipeline failures convert to [`ApiError`] here; every
//! response body has the same `{success, extractedData, ...}` shape.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::orchestrator;
use crate::pipeline::types::{DocumentPayload, ExtractionReport};

/// Upload cap enforced at the API boundary (the pipeline itself is uncapped).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Media types accepted for identity documents.
const ALLOWED_MEDIA_TYPES: [&str; 4] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "application/pdf",
];

/// `POST /api/extract-aadhar` — extract structured fields from one document.
pub async fn extract(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionReport>, ApiError> {
    let payload = read_file_part(&mut multipart).await?;

    if !ALLOWED_MEDIA_TYPES.contains(&payload.content_type.as_str()) {
        tracing::warn!(content_type = %payload.content_type, "Rejected unsupported media type");
        return Err(ApiError::UnsupportedMediaType);
    }

    let report = orchestrator::run(ctx.service.as_ref(), payload).await?;
    Ok(Json(report))
}

/// Pull the `file` part out of the multipart stream. Other parts are
/// ignored; a missing `file` part is the caller's error.
async fn read_file_part(multipart: &mut Multipart) -> Result<DocumentPayload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadMultipart(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadMultipart(e.to_string()))?;

        return Ok(DocumentPayload {
            size_bytes: bytes.len() as u64,
            bytes: bytes.to_vec(),
            file_name,
            content_type,
        });
    }

    Err(ApiError::NoFile)
}
