//! Session identifiers for the OnDemand media API.
//!
//! The service associates every upload with a session. Sessions are ideally
//! created server-side, but session creation fails often enough in practice
//! that acquisition must never fail: on any error (or a success body missing
//! the identifier) a session id is synthesized locally in the ObjectId-like
//! format the service accepts — 24 lowercase hex characters.

use serde_json::Value;

use super::ondemand::MediaService;

/// Opaque session token. Service-issued ids are passed through verbatim;
/// synthesized ids are exactly 24 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acquire a session id. Never fails.
///
/// Tries the remote service first; falls back to [`synthesize`] when the
/// call errors or the response is missing the nested identifier.
pub async fn acquire<S: MediaService + ?Sized>(service: &S) -> SessionId {
    match service.create_session().await {
        Ok(body) => match body.pointer("/data/_id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                tracing::info!(session_id = %id, "Session created");
                SessionId::new(id)
            }
            _ => {
                tracing::warn!("Session response missing identifier, synthesizing locally");
                synthesize()
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "Session creation failed, synthesizing locally");
            synthesize()
        }
    }
}

/// Synthesize a session id from the current time and fresh randomness.
pub fn synthesize() -> SessionId {
    let unix_secs = chrono::Utc::now().timestamp().max(0) as u64;
    synthesize_from(unix_secs, rand::random::<u32>(), rand::random::<u32>())
}

/// Deterministic core of [`synthesize`]: timestamp (8 hex) ++ random (8 hex)
/// ++ random (6 hex), clamped to exactly 24 lowercase hex characters for any
/// input values.
fn synthesize_from(unix_secs: u64, random_a: u32, random_b: u32) -> SessionId {
    let mut token = format!(
        "{unix_secs:08x}{random_a:08x}{:06x}",
        random_b & 0x00ff_ffff
    );
    token.truncate(24);
    while token.len() < 24 {
        token.push('0');
    }
    SessionId(token)
}
