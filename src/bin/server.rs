//! mood-reflect HTTP server binary.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` - API key (or `GOOGLE_API_KEY`), required
//! - `GEMINI_MODEL` - Model id (default: gemini-2.5-flash-preview-09-2025)
//! - `GEMINI_ENDPOINT_URL` - Models base URL
//! - `GEMINI_TIMEOUT_SECS` - Per-attempt timeout (default: 120)
//! - `PORT` - HTTP port (default: 8080)
//! - `PUBLIC_URL` - Page URL for the share QR code
//! - `RUST_LOG` - Tracing filter (default: "info,mood_reflect=debug")
//!
//! # Usage
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run --bin server
//! ```

use anyhow::Context;

use mood_reflect::server::{app_router, AppState};
use mood_reflect::{DispatcherConfig, RequestDispatcher, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mood_reflect=debug".into()),
        )
        .init();

    let dispatcher_config = DispatcherConfig::from_env().context("resolving dispatcher configuration")?;
    let server_config = ServerConfig::from_env().context("resolving server configuration")?;

    let dispatcher =
        RequestDispatcher::from_config(&dispatcher_config).context("building Gemini transport")?;
    let state = AppState::new(dispatcher).with_public_url(server_config.public_url.clone());
    let app = app_router(state);

    let bind_addr = server_config.bind_addr();
    tracing::info!(
        model = %dispatcher_config.model_id,
        "mood-reflect server starting on {}",
        bind_addr
    );
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health  - liveness check");
    tracing::info!("  POST /reflect - mood reflection");
    tracing::info!("  GET  /share   - share link and QR code");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
