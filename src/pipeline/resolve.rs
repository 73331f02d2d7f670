//! Response-shape normalization for the OnDemand upload reply.
//!
//! The service is inconsistent: the payload may sit under a `data` key or at
//! the top level, extracted text may arrive inline, behind a URL, or under
//! one of several alternate field names, and a processing status may or may
//! not be present. [`classify`] folds the status variants into a tagged
//! union; [`resolve_text`] runs the text-source cascade. Neither fails —
//! a total miss resolves to the empty string.

use serde_json::Value;

use super::ondemand::MediaService;

/// Alternate field names probed for extracted text, in priority order.
const ALTERNATE_TEXT_FIELDS: [&str; 4] = ["text", "content", "ocrText", "extractedContent"];

/// Status-level interpretation of an upload response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// Asynchronous processing still in progress; text is not available yet.
    Processing,
    /// The service could not process the document.
    Failed { reason: String },
    /// Text resolution may proceed.
    Ready,
}

/// The media object carrying the extraction fields: the `data` member when
/// present, otherwise the response itself.
pub fn media_object(raw: &Value) -> &Value {
    match raw.get("data") {
        Some(data) if !data.is_null() => data,
        _ => raw,
    }
}

/// Interpret the `actionStatus` field. Absent or unknown statuses mean the
/// response is ready for text resolution.
pub fn classify(raw: &Value) -> ServiceOutcome {
    let media = media_object(raw);
    match media.get("actionStatus").and_then(Value::as_str) {
        Some("processing") => ServiceOutcome::Processing,
        Some("failed") => {
            let reason = media
                .get("failedReason")
                .and_then(Value::as_str)
                .filter(|r| !r.is_empty())
                .unwrap_or("Extraction failed")
                .to_string();
            ServiceOutcome::Failed { reason }
        }
        _ => ServiceOutcome::Ready,
    }
}

/// Resolve the extracted text out of a ready response. Never fails.
///
/// Cascade, each step consulted only while the text is still empty:
/// hosted URL (fetch errors logged and swallowed) → inline `extractedText`
/// → top-level `text` → alternate field names on the media object.
pub async fn resolve_text<S: MediaService + ?Sized>(service: &S, raw: &Value) -> String {
    let media = media_object(raw);
    let mut text = String::new();

    if let Some(url) = media.get("extractedTextUrl").and_then(Value::as_str) {
        tracing::debug!(url, "Fetching extracted text");
        match service.fetch_text(url).await {
            Ok(body) => text = body,
            Err(err) => {
                tracing::warn!(error = %err, url, "Failed to fetch extracted text")
            }
        }
    }

    if text.is_empty() {
        if let Some(inline) = media.get("extractedText") {
            text = stringify(inline);
        }
    }

    if text.is_empty() {
        if let Some(top) = raw.get("text") {
            text = stringify(top);
        }
    }

    if text.is_empty() {
        for field in ALTERNATE_TEXT_FIELDS {
            let candidate = media.get(field).map(stringify).unwrap_or_default();
            if !candidate.is_empty() {
                text = candidate;
                break;
            }
        }
    }

    text
}

/// Strings pass through; other JSON values are serialized.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ondemand::{MockMediaService, RemoteError};
    use serde_json::json;

    #[test]
    fn media_object_prefers_nested_data() {
        let raw = json!({"data": {"extractedText": "inner"}, "extractedText": "outer"});
        assert_eq!(media_object(&raw)["extractedText"], "inner");
    }

    #[test]
    fn media_object_falls_back_to_flat_response() {
        let raw = json!({"extractedText": "flat"});
        assert_eq!(media_object(&raw)["extractedText"], "flat");

        let raw = json!({"data": null, "extractedText": "flat"});
        assert_eq!(media_object(&raw)["extractedText"], "flat");
    }

    #[test]
    fn classify_processing_short_circuits() {
        let raw = json!({"data": {"actionStatus": "processing", "extractedText": "partial"}});
        assert_eq!(classify(&raw), ServiceOutcome::Processing);
    }

    #[test]
    fn classify_failed_carries_service_reason() {
        let raw = json!({"data": {"actionStatus": "failed", "failedReason": "blurry scan"}});
        assert_eq!(
            classify(&raw),
            ServiceOutcome::Failed {
                reason: "blurry scan".into()
            }
        );
    }

    #[test]
    fn classify_failed_defaults_reason() {
        let raw = json!({"actionStatus": "failed"});
        assert_eq!(
            classify(&raw),
            ServiceOutcome::Failed {
                reason: "Extraction failed".into()
            }
        );
    }

    #[test]
    fn classify_other_statuses_are_ready() {
        assert_eq!(classify(&json!({"actionStatus": "completed"})), ServiceOutcome::Ready);
        assert_eq!(classify(&json!({})), ServiceOutcome::Ready);
    }

    #[tokio::test]
    async fn url_takes_precedence_over_inline_text() {
        let mock = MockMediaService::new().with_text(Ok("from url".into()));
        let raw = json!({"data": {
            "extractedTextUrl": "https://cdn.example/doc.txt",
            "extractedText": "inline",
        }});

        assert_eq!(resolve_text(&mock, &raw).await, "from url");
        assert_eq!(mock.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn failed_url_fetch_falls_through_to_inline_text() {
        let mock = MockMediaService::new().with_text(Err(RemoteError::Network("404".into())));
        let raw = json!({"data": {
            "extractedTextUrl": "https://cdn.example/doc.txt",
            "extractedText": "inline",
        }});

        assert_eq!(resolve_text(&mock, &raw).await, "inline");
    }

    #[tokio::test]
    async fn empty_url_body_falls_through_to_inline_text() {
        let mock = MockMediaService::new().with_text(Ok(String::new()));
        let raw = json!({"data": {
            "extractedTextUrl": "https://cdn.example/doc.txt",
            "extractedText": "inline",
        }});

        assert_eq!(resolve_text(&mock, &raw).await, "inline");
    }

    #[tokio::test]
    async fn inline_non_string_text_is_stringified() {
        let mock = MockMediaService::new();
        let raw = json!({"data": {"extractedText": {"page": 1}}});

        assert_eq!(resolve_text(&mock, &raw).await, r#"{"page":1}"#);
    }

    #[tokio::test]
    async fn top_level_text_used_when_media_has_none() {
        let mock = MockMediaService::new();
        let raw = json!({"data": {"id": "x"}, "text": "top level"});

        assert_eq!(resolve_text(&mock, &raw).await, "top level");
    }

    #[tokio::test]
    async fn alternate_fields_probed_in_order() {
        let mock = MockMediaService::new();
        let raw = json!({"data": {"ocrText": "ocr", "content": "content"}});

        // `content` precedes `ocrText` in the probe order
        assert_eq!(resolve_text(&mock, &raw).await, "content");
    }

    #[tokio::test]
    async fn empty_alternate_fields_are_skipped() {
        let mock = MockMediaService::new();
        let raw = json!({"data": {"text": "", "ocrText": "ocr"}});

        assert_eq!(resolve_text(&mock, &raw).await, "ocr");
    }

    #[tokio::test]
    async fn total_miss_resolves_to_empty_string() {
        let mock = MockMediaService::new();
        let raw = json!({"data": {"id": "doc-1"}});

        assert_eq!(resolve_text(&mock, &raw).await, "");
        assert_eq!(mock.fetch_calls(), 0);
    }
}
