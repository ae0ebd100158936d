//! Axum route handlers.
//!
//! # Routes
//!
//! - `GET  /health`  - Returns `{"status": "ok", "version": .., "service": "mood-reflect"}`
//! - `POST /reflect` - Accepts `{"mood": ".."}`, returns the dispatch result
//! - `GET  /share`   - Returns `{"url": .., "qr_code_url": .., "size": ..}`

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::dispatch::{DispatchResult, ErrorKind, RequestDispatcher};
use crate::share::ShareLink;

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: RequestDispatcher,
    /// Page URL for the share link; derived from `Host` when `None`.
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(dispatcher: RequestDispatcher) -> Self {
        Self {
            dispatcher,
            public_url: None,
        }
    }

    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/reflect", post(reflect_handler))
        .route("/share", get(share_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health - liveness check.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "mood-reflect",
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReflectRequest {
    pub mood: String,
}

#[derive(Debug, Serialize)]
pub struct ReflectResponse {
    #[serde(flatten)]
    pub result: DispatchResult,
    /// Text the UI shows verbatim.
    pub display: String,
}

fn status_for(result: &DispatchResult) -> StatusCode {
    match result.kind() {
        None => StatusCode::OK,
        Some(ErrorKind::InvalidInput) => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::BAD_GATEWAY,
    }
}

/// POST /reflect - dispatch one mood description.
///
/// 200 on success, 400 for empty input, 502 for any upstream failure. The
/// body always carries the serialised result plus a `display` string.
async fn reflect_handler(
    State(state): State<AppState>,
    Json(request): Json<ReflectRequest>,
) -> (StatusCode, Json<ReflectResponse>) {
    let result = state.dispatcher.dispatch(&request.mood).await;
    let status = status_for(&result);

    if let Some(kind) = result.kind() {
        tracing::warn!(%kind, "reflect request failed");
    } else {
        tracing::info!("reflect request succeeded");
    }

    let display = result.user_message();
    (status, Json(ReflectResponse { result, display }))
}

/// GET /share - page URL and QR code image URL.
async fn share_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ShareLink>, (StatusCode, Json<Value>)> {
    let page_url = match state.public_url {
        Some(url) => url,
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({"error": "Host header required when PUBLIC_URL is not set"})),
                    )
                })?;
            format!("http://{}/", host)
        }
    };

    ShareLink::new(&page_url).map(Json).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": e.to_string()})),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use async_trait::async_trait;

    use crate::llms::transport::{Transport, TransportError, TransportResponse};
    use crate::prompt::RequestPayload;

    #[derive(Debug)]
    struct FixedTransport(u16, Value);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, _payload: &RequestPayload) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse::new(self.0, self.1.to_string()))
        }
    }

    fn app_with(status: u16, body: Value) -> Router {
        let dispatcher = RequestDispatcher::new(FixedTransport(status, body));
        app_router(AppState::new(dispatcher))
    }

    fn candidate(text: &str) -> Value {
        serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn reflect_request(mood: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/reflect")
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::json!({ "mood": mood }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app_with(200, candidate("unused"));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "mood-reflect");
    }

    #[tokio::test]
    async fn test_reflect_success() {
        let app = app_with(200, candidate("Positive. Enjoy the sunshine."));

        let response = app.oneshot(reflect_request("sunny and light")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["text"], "Positive. Enjoy the sunshine.");
        assert_eq!(json["display"], "Positive. Enjoy the sunshine.");
    }

    #[tokio::test]
    async fn test_reflect_blank_mood_is_bad_request() {
        let app = app_with(200, candidate("unused"));

        let response = app.oneshot(reflect_request("   ")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "invalid_input");
        assert_eq!(json["display"], "Please enter how you are feeling first!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reflect_upstream_failure_is_bad_gateway() {
        let app = app_with(500, serde_json::json!({ "error": { "message": "internal" } }));

        let response = app.oneshot(reflect_request("worried")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert_eq!(json["kind"], "api_error");
        assert_eq!(json["message"], "internal");
        assert_eq!(json["display"], "Error: internal");
    }

    #[tokio::test]
    async fn test_reflect_rejects_missing_mood_field() {
        let app = app_with(200, candidate("unused"));

        let request = Request::builder()
            .method("POST")
            .uri("/reflect")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"feeling": "ok"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_share_uses_host_header() {
        let app = app_with(200, candidate("unused"));

        let request = Request::builder()
            .uri("/share")
            .header("Host", "192.168.1.20:8080")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["url"], "http://192.168.1.20:8080/");
        assert_eq!(json["size"], 180);
        assert!(json["qr_code_url"].as_str().unwrap().contains("chs=180x180"));
    }

    #[tokio::test]
    async fn test_share_prefers_public_url() {
        let dispatcher = RequestDispatcher::new(FixedTransport(200, candidate("unused")));
        let state = AppState::new(dispatcher).with_public_url(Some("https://mood.example.com/".to_string()));
        let app = app_router(state);

        let request = Request::builder()
            .uri("/share")
            .header("Host", "internal:8080")
            .body(Body::empty())
            .unwrap();

        let json = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(json["url"], "https://mood.example.com/");
    }
}
