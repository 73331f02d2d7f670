//! OnDemand media API client — the single HTTP seam to the remote
//! OCR/extraction service.
//!
//! Everything network-shaped goes through the [`MediaService`] trait so the
//! rest of the pipeline (session fallback, retry policy, orchestration) can
//! be exercised against [`MockMediaService`] without a server. The
//! production implementation is [`OnDemandClient`] over async reqwest.
//!
//! The service is unreliable in practice: error bodies vary, success bodies
//! nest payloads inconsistently, and sessions expire server-side. The client
//! therefore returns raw `serde_json::Value` bodies and typed transport
//! errors; shape normalization happens one layer up in `resolve`.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::session::SessionId;
use super::types::DocumentPayload;

// ──────────────────────────────────────────────
// Constants
// ──────────────────────────────────────────────

/// Session creation endpoint, relative to the configured base URL.
pub const SESSION_PATH: &str = "/media/v1/public/session";

/// Raw file upload endpoint, relative to the configured base URL.
pub const UPLOAD_PATH: &str = "/media/v1/public/file/raw";

/// Fixed identity recorded as creator/updater on the remote service.
pub const SERVICE_IDENTITY: &str = "Jan Sahayak";

/// Session creation is quick; fail fast if the service is unresponsive.
const SESSION_TIMEOUT_SECS: u64 = 30;

/// Synchronous extraction can take a while on large PDFs.
const UPLOAD_TIMEOUT_SECS: u64 = 120;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Transport-level failures talking to the OnDemand API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service answered with a non-2xx status. `body` is the parsed
    /// JSON error body, or the raw text wrapped in a JSON string when the
    /// body is not JSON.
    #[error("OnDemand API error (HTTP {status})")]
    Api { status: u16, body: Value },

    /// No usable response at all: connect failure, timeout, broken stream.
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx response whose body could not be decoded.
    #[error("Invalid response from OnDemand API: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Does this error indicate a stale/invalid session on the service side?
    ///
    /// The service reports these as 5xx with "session" somewhere in the
    /// `message` or `error` field of the body. This is the only error class
    /// the uploader retries (once, with a fresh session).
    pub fn is_session_error(&self) -> bool {
        let RemoteError::Api { status, body } = self else {
            return false;
        };
        if *status < 500 {
            return false;
        }
        ["message", "error"].iter().any(|key| {
            body.get(*key)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains("session"))
        })
    }
}

// ──────────────────────────────────────────────
// MediaService trait
// ──────────────────────────────────────────────

/// Remote media API surface consumed by the pipeline.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// `POST /session` — create a processing session.
    async fn create_session(&self) -> Result<Value, RemoteError>;

    /// `POST /file/raw` — multipart upload of one document, synchronous
    /// extraction requested.
    async fn upload(
        &self,
        payload: &DocumentPayload,
        session_id: &SessionId,
    ) -> Result<Value, RemoteError>;

    /// Plain GET of an externally-hosted extracted-text URL.
    async fn fetch_text(&self, url: &str) -> Result<String, RemoteError>;
}

// ──────────────────────────────────────────────
// OnDemandClient
// ──────────────────────────────────────────────

/// Production [`MediaService`] over the OnDemand HTTP API.
pub struct OnDemandClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OnDemandClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, err: reqwest::Error, timeout_secs: u64) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Network(format!("Request timed out after {timeout_secs}s"))
        } else if err.is_connect() {
            RemoteError::Network(format!("Could not connect to {}", self.base_url))
        } else {
            RemoteError::Network(err.to_string())
        }
    }
}

/// Turn a non-2xx response into `RemoteError::Api`, preserving as much of
/// the body as possible (parsed JSON, else raw text).
async fn api_error(response: reqwest::Response) -> RemoteError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    RemoteError::Api { status, body }
}

#[async_trait]
impl MediaService for OnDemandClient {
    async fn create_session(&self) -> Result<Value, RemoteError> {
        let url = format!("{}{}", self.base_url, SESSION_PATH);
        let body = serde_json::json!({
            "createdBy": SERVICE_IDENTITY,
            "updatedBy": SERVICE_IDENTITY,
        });

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .json(&body)
            .timeout(Duration::from_secs(SESSION_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| self.map_send_error(e, SESSION_TIMEOUT_SECS))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    async fn upload(
        &self,
        payload: &DocumentPayload,
        session_id: &SessionId,
    ) -> Result<Value, RemoteError> {
        let url = format!("{}{}", self.base_url, UPLOAD_PATH);

        let file_part = reqwest::multipart::Part::bytes(payload.bytes.clone())
            .file_name(payload.document_name().to_string())
            .mime_str(&payload.content_type)
            .map_err(|e| RemoteError::Network(format!("Invalid media type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("createdBy", SERVICE_IDENTITY)
            .text("updatedBy", SERVICE_IDENTITY)
            .text("name", payload.document_name().to_string())
            .text("sessionId", session_id.to_string())
            .text("sizeBytes", payload.size_bytes.to_string())
            .text("responseMode", "sync");

        tracing::debug!(
            url = %url,
            session_id = %session_id,
            name = payload.document_name(),
            size_bytes = payload.size_bytes,
            "Uploading document"
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .multipart(form)
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| self.map_send_error(e, UPLOAD_TIMEOUT_SECS))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, RemoteError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        // JSON bodies are returned verbatim — the raw body IS the
        // stringified form the parser expects.
        response
            .text()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))
    }
}

// ──────────────────────────────────────────────
// MockMediaService — scripted responses for tests
// ──────────────────────────────────────────────

use std::collections::VecDeque;
use std::sync::Mutex;

/// Scriptable [`MediaService`] for tests. Responses are queued per
/// operation and consumed in order; an empty queue yields a network error
/// so unscripted calls fail loudly. Call counts are observable.
#[derive(Default)]
pub struct MockMediaService {
    session_responses: Mutex<VecDeque<Result<Value, RemoteError>>>,
    upload_responses: Mutex<VecDeque<Result<Value, RemoteError>>>,
    text_responses: Mutex<VecDeque<Result<String, RemoteError>>>,
    session_calls: Mutex<usize>,
    upload_calls: Mutex<usize>,
    fetch_calls: Mutex<usize>,
}

impl MockMediaService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(self, result: Result<Value, RemoteError>) -> Self {
        self.session_responses.lock().unwrap().push_back(result);
        self
    }

    pub fn with_upload(self, result: Result<Value, RemoteError>) -> Self {
        self.upload_responses.lock().unwrap().push_back(result);
        self
    }

    pub fn with_text(self, result: Result<String, RemoteError>) -> Self {
        self.text_responses.lock().unwrap().push_back(result);
        self
    }

    pub fn session_calls(&self) -> usize {
        *self.session_calls.lock().unwrap()
    }

    pub fn upload_calls(&self) -> usize {
        *self.upload_calls.lock().unwrap()
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetch_calls.lock().unwrap()
    }
}

fn unscripted() -> RemoteError {
    RemoteError::Network("mock: no scripted response".into())
}

#[async_trait]
impl MediaService for MockMediaService {
    async fn create_session(&self) -> Result<Value, RemoteError> {
        *self.session_calls.lock().unwrap() += 1;
        self.session_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn upload(
        &self,
        _payload: &DocumentPayload,
        _session_id: &SessionId,
    ) -> Result<Value, RemoteError> {
        *self.upload_calls.lock().unwrap() += 1;
        self.upload_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn fetch_text(&self, _url: &str) -> Result<String, RemoteError> {
        *self.fetch_calls.lock().unwrap() += 1;
        self.text_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }
}
