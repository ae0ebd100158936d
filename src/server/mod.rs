//! HTTP surface for the mood reflection dispatcher.
//!
//! Lets a browser UI request reflections without holding the API key.
//!
//! # Endpoints
//!
//! - `GET  /health`  - Liveness check
//! - `POST /reflect` - Dispatch one mood description
//! - `GET  /share`   - Page URL and its QR code image URL

pub mod routes;

pub use routes::{app_router, AppState};
