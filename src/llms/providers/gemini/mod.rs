//! Google Gemini `generateContent` transport.
//!
//! Two halves:
//!
//! - [`GeminiTransport`] performs one HTTP exchange with the Gemini API
//!   using `reqwest`. The API key travels as the `key` query parameter.
//! - [`classify_response`] inspects a parsed 2xx body and decides whether
//!   it carries candidate text, an explicit error object, or neither.
//!
//! # Response shapes
//!
//! ```text
//! { "candidates": [{ "content": { "parts": [{ "text": "..." }] } }] }   -> Text
//! { "error": { "message": "..." } }                                     -> ApiError
//! anything else                                                         -> UnexpectedShape
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::config::DispatcherConfig;
use crate::llms::transport::{Transport, TransportError, TransportResponse};
use crate::prompt::RequestPayload;

/// Message used when an error body carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ---------------------------------------------------------------------------
// GeminiTransport
// ---------------------------------------------------------------------------

/// `reqwest`-backed transport for the Gemini API.
#[derive(Clone)]
pub struct GeminiTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl GeminiTransport {
    /// Build a transport whose client applies the configured timeout.
    pub fn new(config: &DispatcherConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.generate_content_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// The `generateContent` URL, without the key.
    pub fn endpoint(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for GeminiTransport {
    async fn send(&self, payload: &RequestPayload) -> Result<TransportResponse, TransportError> {
        log::debug!("GeminiTransport.send: url={}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .query(&[("key", self.api_key.as_str())])
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        log::debug!("GeminiTransport.send: status={}, body_len={}", status, body.len());
        Ok(TransportResponse { status, body })
    }
}

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// What a well-formed 2xx body contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Non-empty text of the first part of the first candidate.
    Text(String),
    /// An explicit `error` object, with its message.
    ApiError(String),
    /// Neither of the above.
    UnexpectedShape,
}

/// Text at `candidates[0].content.parts[0].text`, if present and non-empty.
pub fn candidate_text(body: &Value) -> Option<&str> {
    body.get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|p| p.first())
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
}

/// Whether `value` counts as present: not `null`, `false`, `0` or `""`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Message of the body's `error` value, if the body has a truthy one.
///
/// Reads `error.message`, then `error.statusMessage`, then falls back to
/// [`UNKNOWN_ERROR`].
pub fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").filter(|e| is_truthy(e))?;

    if let Some(text) = error.as_str() {
        return Some(text.to_string());
    }

    let message = ["message", "statusMessage"]
        .iter()
        .filter_map(|key| error.get(*key).and_then(|m| m.as_str()))
        .find(|m| !m.is_empty())
        .unwrap_or(UNKNOWN_ERROR);

    Some(message.to_string())
}

/// Classify a parsed 2xx body. Candidate text wins over an error object.
pub fn classify_response(body: &Value) -> ResponseOutcome {
    if let Some(text) = candidate_text(body) {
        return ResponseOutcome::Text(text.to_string());
    }
    match error_message(body) {
        Some(message) => ResponseOutcome::ApiError(message),
        None => ResponseOutcome::UnexpectedShape,
    }
}
