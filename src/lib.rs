//! # mood-reflect
//!
//! Turns a short free-text mood description into an empathetic reflection
//! generated by the Gemini `generateContent` API.
//!
//! The core is [`RequestDispatcher`]: it builds the prompt payload, sends it
//! through an injected [`Transport`], retries failed attempts with
//! exponential backoff, validates the shape of the response, and always
//! returns a [`DispatchResult`] value instead of an error.
//!
//! The [`server`] module exposes the dispatcher over HTTP for a browser UI.

pub mod config;
pub mod dispatch;
pub mod llms;
pub mod prompt;
pub mod server;
pub mod share;

pub use config::{ConfigError, DispatcherConfig, ServerConfig};
pub use dispatch::{DispatchResult, ErrorKind, RequestDispatcher, RetryPolicy};
pub use llms::providers::gemini::GeminiTransport;
pub use llms::transport::{Transport, TransportError, TransportResponse};
pub use prompt::RequestPayload;

/// Crate version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
