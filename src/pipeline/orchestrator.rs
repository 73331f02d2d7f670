//! End-to-end extraction orchestration.
//!
//! Single composition point: session → upload (with its one retry) →
//! status classification → text resolution → field parsing. Lower layers
//! raise typed failures; this module decides which become a successful
//! report (processing, no fields matched) and which propagate as
//! [`PipelineError`] for the API layer to translate.

use uuid::Uuid;

use super::fields;
use super::ondemand::MediaService;
use super::resolve::{self, ServiceOutcome};
use super::session;
use super::types::{DocumentPayload, ExtractionRecord, ExtractionReport};
use super::upload;
use super::PipelineError;

/// Messages surfaced to the caller alongside the structured record.
pub const SUCCESS_MESSAGE: &str = "Data extracted successfully!";
pub const MANUAL_ENTRY_MESSAGE: &str =
    "Could not automatically extract information. Please enter details manually.";
pub const PROCESSING_MESSAGE: &str =
    "Document is still being processed. Please try again in a few moments.";

/// Run one extraction request end to end.
///
/// The payload is consumed: nothing retains the document bytes after the
/// report is produced.
pub async fn run<S: MediaService + ?Sized>(
    service: &S,
    payload: DocumentPayload,
) -> Result<ExtractionReport, PipelineError> {
    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        name = payload.document_name(),
        content_type = %payload.content_type,
        size_bytes = payload.size_bytes,
        "Starting extraction"
    );

    let session_id = session::acquire(service).await;
    let (response, _session) = upload::upload_with_retry(service, &payload, session_id).await?;

    match resolve::classify(&response) {
        ServiceOutcome::Processing => {
            tracing::info!(%request_id, "Document still processing on the remote service");
            Ok(ExtractionReport {
                success: false,
                extracted_data: ExtractionRecord::default(),
                raw_text: String::new(),
                message: PROCESSING_MESSAGE.to_string(),
            })
        }
        ServiceOutcome::Failed { reason } => {
            tracing::warn!(%request_id, reason, "Remote service reported extraction failure");
            Err(PipelineError::ExtractionFailed { reason })
        }
        ServiceOutcome::Ready => {
            let raw_text = resolve::resolve_text(service, &response).await;
            tracing::info!(%request_id, text_len = raw_text.len(), "Extracted text resolved");

            let extracted_data = fields::extract(&raw_text);
            let success = extracted_data.has_any_field();

            tracing::info!(%request_id, success, "Extraction complete");

            Ok(ExtractionReport {
                success,
                extracted_data,
                raw_text,
                message: if success {
                    SUCCESS_MESSAGE.to_string()
                } else {
                    MANUAL_ENTRY_MESSAGE.to_string()
                },
            })
        }
    }
}
