//! Outbound LLM plumbing.
//!
//! - [`transport`] - The injectable transport capability used by the dispatcher
//! - [`providers`] - Concrete provider transports and response handling

pub mod providers;
pub mod transport;

pub use transport::{Transport, TransportError, TransportResponse};
