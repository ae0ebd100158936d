//! Transport capability.
//!
//! The dispatcher never talks to the network directly: it sends a
//! [`RequestPayload`] through a [`Transport`] and reads back a raw status and
//! body. Production code uses
//! [`GeminiTransport`](crate::llms::providers::gemini::GeminiTransport);
//! tests substitute deterministic stubs.
//!
//! ```text
//! RequestDispatcher
//!   |
//!   +-- Transport::send(payload) --> Ok(TransportResponse { status, body })
//!   |                           \--> Err(TransportError)
//!   |
//!   +-- retry / classify
//! ```

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::RequestPayload;

// ---------------------------------------------------------------------------
// TransportResponse
// ---------------------------------------------------------------------------

/// Status and body of a completed exchange. Non-2xx statuses are still
/// responses; only failures to complete the exchange are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// The exchange could not be completed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request or the body read exceeded the configured timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The endpoint could not be reached.
    #[error("connection error: {0}")]
    Connect(String),

    /// Any other network-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The client could not be built or the request could not be encoded.
    #[error("client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::Client(e.to_string())
        } else {
            TransportError::Network(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/// Sends one request payload and returns the raw response.
///
/// Implementations perform exactly one exchange per call; retrying is the
/// caller's job.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, payload: &RequestPayload) -> Result<TransportResponse, TransportError>;
}
