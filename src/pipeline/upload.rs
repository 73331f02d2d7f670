//! Document upload with the single session-retry.
//!
//! The remote service invalidates sessions unpredictably; when that is the
//! stated failure cause, one fresh session is acquired and the upload is
//! rebuilt and retried exactly once. Every other failure class — and a
//! failure of the retried attempt — propagates unchanged. This is the only
//! retry anywhere in the system; there is no backoff.

use serde_json::Value;

use super::ondemand::{MediaService, RemoteError};
use super::session::{self, SessionId};
use super::types::DocumentPayload;

/// Upload `payload` under `session_id`, retrying once with a fresh session
/// on a session-class failure. Returns the raw response body together with
/// the session that actually succeeded.
pub async fn upload_with_retry<S: MediaService + ?Sized>(
    service: &S,
    payload: &DocumentPayload,
    session_id: SessionId,
) -> Result<(Value, SessionId), RemoteError> {
    match service.upload(payload, &session_id).await {
        Ok(body) => Ok((body, session_id)),
        Err(first) if first.is_session_error() => {
            tracing::warn!(
                error = %first,
                stale_session = %session_id,
                "Upload failed with session error, retrying once with a fresh session"
            );
            let fresh = session::acquire(service).await;
            let body = service.upload(payload, &fresh).await?;
            tracing::info!(session_id = %fresh, "Upload retry succeeded");
            Ok((body, fresh))
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ondemand::MockMediaService;
    use serde_json::json;

    fn payload() -> DocumentPayload {
        DocumentPayload {
            bytes: b"pdf".to_vec(),
            file_name: Some("card.pdf".into()),
            content_type: "application/pdf".into(),
            size_bytes: 3,
        }
    }

    fn session_failure() -> RemoteError {
        RemoteError::Api {
            status: 500,
            body: json!({"message": "Invalid session"}),
        }
    }

    #[tokio::test]
    async fn first_attempt_success_needs_no_retry() {
        let mock = MockMediaService::new().with_upload(Ok(json!({"data": {"text": "ok"}})));

        let (body, used) = upload_with_retry(&mock, &payload(), SessionId::new("s1"))
            .await
            .unwrap();

        assert_eq!(body["data"]["text"], "ok");
        assert_eq!(used.as_str(), "s1");
        assert_eq!(mock.upload_calls(), 1);
        assert_eq!(mock.session_calls(), 0);
    }

    #[tokio::test]
    async fn session_error_triggers_exactly_one_retry() {
        let mock = MockMediaService::new()
            .with_upload(Err(session_failure()))
            .with_session(Ok(json!({"data": {"_id": "64f0c0ffee0123456789abcd"}})))
            .with_upload(Ok(json!({"data": {"extractedText": "NAME"}})));

        let (body, used) = upload_with_retry(&mock, &payload(), SessionId::new("stale"))
            .await
            .unwrap();

        assert_eq!(body["data"]["extractedText"], "NAME");
        assert_eq!(used.as_str(), "64f0c0ffee0123456789abcd");
        // Exactly one extra session acquisition and one extra upload
        assert_eq!(mock.session_calls(), 1);
        assert_eq!(mock.upload_calls(), 2);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let mock = MockMediaService::new().with_upload(Err(RemoteError::Api {
            status: 400,
            body: json!({"message": "Invalid session"}),
        }));

        let err = upload_with_retry(&mock, &payload(), SessionId::new("s1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Api { status: 400, .. }));
        assert_eq!(mock.upload_calls(), 1);
        assert_eq!(mock.session_calls(), 0);
    }

    #[tokio::test]
    async fn non_session_5xx_is_not_retried() {
        let mock = MockMediaService::new().with_upload(Err(RemoteError::Api {
            status: 500,
            body: json!({"message": "internal error"}),
        }));

        let err = upload_with_retry(&mock, &payload(), SessionId::new("s1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Api { status: 500, .. }));
        assert_eq!(mock.upload_calls(), 1);
    }

    #[tokio::test]
    async fn second_failure_propagates_with_its_own_details() {
        let mock = MockMediaService::new()
            .with_upload(Err(session_failure()))
            .with_session(Ok(json!({"data": {"_id": "64f0c0ffee0123456789abcd"}})))
            .with_upload(Err(RemoteError::Api {
                status: 422,
                body: json!({"message": "unsupported document"}),
            }));

        let err = upload_with_retry(&mock, &payload(), SessionId::new("stale"))
            .await
            .unwrap_err();

        match err {
            RemoteError::Api { status, body } => {
                assert_eq!(status, 422);
                assert_eq!(body["message"], "unsupported document");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        // No third attempt
        assert_eq!(mock.upload_calls(), 2);
        assert_eq!(mock.session_calls(), 1);
    }

    #[tokio::test]
    async fn retry_survives_session_acquisition_failure() {
        // Fresh session acquisition itself falls back to synthesis
        let mock = MockMediaService::new()
            .with_upload(Err(session_failure()))
            .with_session(Err(RemoteError::Network("refused".into())))
            .with_upload(Ok(json!({"data": {"text": "ok"}})));

        let (_, used) = upload_with_retry(&mock, &payload(), SessionId::new("stale"))
            .await
            .unwrap();

        assert_eq!(used.as_str().len(), 24);
        assert_eq!(mock.upload_calls(), 2);
    }

    #[tokio::test]
    async fn network_errors_are_not_retried() {
        let mock =
            MockMediaService::new().with_upload(Err(RemoteError::Network("timed out".into())));

        let err = upload_with_retry(&mock, &payload(), SessionId::new("s1"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemoteError::Network(_)));
        assert_eq!(mock.upload_calls(), 1);
    }
}
