//! Shared test setup for API integration tests.

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};

use prattle::api::{AppState, create_router};
use prattle::config::AppConfig;

/// Spawn a mock upstream serving a fixed response for POST /chat/completions
/// on an ephemeral port. Returns the base URL.
pub async fn spawn_upstream(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        "/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A completion body with the given reply text.
pub fn completion_body(reply: &str) -> Value {
    json!({"choices":[{"message":{"content": reply}}]})
}

/// Build the application router wired to the given upstream base URL.
pub fn test_app(upstream_base_url: String) -> Router {
    let mut config = AppConfig::default();
    config.upstream.api_key = "test-key".to_string();
    config.upstream.base_url = upstream_base_url;
    create_router(AppState::new(config))
}

/// App whose upstream always answers with the given reply text.
pub async fn test_app_with_reply(reply: &str) -> Router {
    let base_url = spawn_upstream(StatusCode::OK, completion_body(reply)).await;
    test_app(base_url)
}

/// App with no upstream credential configured.
pub fn test_app_without_credential() -> Router {
    let config = AppConfig::default();
    create_router(AppState::new(config))
}
