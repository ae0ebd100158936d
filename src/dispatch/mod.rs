//! Resilient request dispatch.
//!
//! [`RequestDispatcher::dispatch`] turns one mood description into one
//! [`DispatchResult`]. It never returns an error and never panics on a bad
//! response: every failure path becomes [`DispatchResult::Failure`].
//!
//! # Attempt lifecycle
//!
//! ```text
//! Attempting(0) --usable body--> Succeeded (classify body)
//!      |
//!      +--failed, not final--> Backoff(n) --sleep delay, delay *= 2--> Attempting(n + 1)
//!      |
//!      +--failed, final------> FailedFinal
//! ```
//!
//! An attempt fails when the transport errors, the status is not 2xx, or a
//! 2xx body is not JSON. All three count toward the attempt bound, and the
//! kind reported after the final attempt follows that attempt's failure.

pub mod retry;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DispatcherConfig;
use crate::llms::providers::gemini::{self, GeminiTransport, ResponseOutcome, UNKNOWN_ERROR};
use crate::llms::transport::{Transport, TransportError};
use crate::prompt::RequestPayload;

pub use retry::{RetryPolicy, RetryState};

/// Failure message for empty input.
pub const INVALID_INPUT_MESSAGE: &str = "mood text required";

/// Failure message for a 2xx body with neither candidates nor an error.
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "model returned an unexpected response";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Why a dispatch call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty mood text; no request was sent.
    InvalidInput,
    /// Non-2xx status on the final attempt, or an explicit error payload.
    ApiError,
    /// 2xx JSON body without candidate text or an error object.
    UnexpectedResponseShape,
    /// The final attempt could not complete the exchange or read its body.
    TransportError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::ApiError => write!(f, "api_error"),
            Self::UnexpectedResponseShape => write!(f, "unexpected_response_shape"),
            Self::TransportError => write!(f, "transport_error"),
        }
    }
}

/// Outcome of one dispatch call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchResult {
    Success { text: String },
    Failure { kind: ErrorKind, message: String },
}

impl DispatchResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Generated text, for a success.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Error kind, for a failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Text to show the user in place of a reflection.
    pub fn user_message(&self) -> String {
        match self {
            Self::Success { text } => text.clone(),
            Self::Failure {
                kind: ErrorKind::InvalidInput,
                ..
            } => "Please enter how you are feeling first!".to_string(),
            Self::Failure {
                kind: ErrorKind::UnexpectedResponseShape,
                ..
            } => "Sorry, I couldn’t generate a reflection. The model returned an unexpected response."
                .to_string(),
            Self::Failure { message, .. } => format!("Error: {}", message),
        }
    }
}

// ---------------------------------------------------------------------------
// Attempt failures
// ---------------------------------------------------------------------------

/// Why a single attempt produced no usable body.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The exchange did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx body that is not JSON.
    #[error("failed to parse response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl AttemptFailure {
    /// The call's result when this was the final attempt.
    pub fn into_result(self) -> DispatchResult {
        match self {
            Self::Status { message, .. } => DispatchResult::failure(ErrorKind::ApiError, message),
            other => DispatchResult::failure(ErrorKind::TransportError, other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RequestDispatcher
// ---------------------------------------------------------------------------

/// Sends mood reflection requests with bounded retry and exponential backoff.
///
/// Holds no per-call state, so one dispatcher can serve concurrent calls.
/// Callers that must avoid duplicate requests (a submit button, say) have to
/// gate re-invocation themselves.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RequestDispatcher {
    /// Create a dispatcher over `transport` with the default policy.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
        }
    }

    /// Create a dispatcher over a [`GeminiTransport`] built from `config`.
    pub fn from_config(config: &DispatcherConfig) -> Result<Self, TransportError> {
        Ok(Self::new(GeminiTransport::new(config)?))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Request a reflection for `mood_text`.
    pub async fn dispatch(&self, mood_text: &str) -> DispatchResult {
        if mood_text.trim().is_empty() {
            return DispatchResult::failure(ErrorKind::InvalidInput, INVALID_INPUT_MESSAGE);
        }

        let call_id = Uuid::new_v4();
        log::debug!("dispatch[{}]: start, mood_len={}", call_id, mood_text.len());

        let payload = RequestPayload::for_mood(mood_text);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut state = RetryState::start(&self.policy);

        let result = loop {
            match self.attempt(&payload).await {
                Ok(body) => break Self::interpret(&body),
                Err(failure) if state.is_final(&self.policy) => {
                    log::error!(
                        "dispatch[{}]: attempt {}/{} failed, giving up: {}",
                        call_id,
                        state.attempt + 1,
                        max_attempts,
                        failure
                    );
                    break failure.into_result();
                }
                Err(failure) => {
                    log::warn!(
                        "dispatch[{}]: attempt {}/{} failed: {}; retrying after {:?}",
                        call_id,
                        state.attempt + 1,
                        max_attempts,
                        failure,
                        state.delay
                    );
                    tokio::time::sleep(state.delay).await;
                    state = state.next(&self.policy);
                }
            }
        };

        match &result {
            DispatchResult::Success { text } => {
                log::info!("dispatch[{}]: success, text_len={}", call_id, text.len())
            }
            DispatchResult::Failure { kind, message } => {
                log::info!("dispatch[{}]: failure kind={} message={}", call_id, kind, message)
            }
        }
        result
    }

    /// One exchange. `Ok` carries a parsed 2xx body.
    async fn attempt(&self, payload: &RequestPayload) -> Result<Value, AttemptFailure> {
        let response = self.transport.send(payload).await?;

        if !response.is_success() {
            let message = serde_json::from_str::<Value>(&response.body)
                .ok()
                .and_then(|body| gemini::error_message(&body))
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            return Err(AttemptFailure::Status {
                status: response.status,
                message,
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    fn interpret(body: &Value) -> DispatchResult {
        match gemini::classify_response(body) {
            ResponseOutcome::Text(text) => DispatchResult::success(text),
            ResponseOutcome::ApiError(message) => DispatchResult::failure(ErrorKind::ApiError, message),
            ResponseOutcome::UnexpectedShape => {
                DispatchResult::failure(ErrorKind::UnexpectedResponseShape, UNEXPECTED_RESPONSE_MESSAGE)
            }
        }
    }
}
