//! Test helpers: in-process router with the hosted model replaced by a mock server.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;

use vehicle_validator::app_state::AppState;
use vehicle_validator::config::AppConfig;
use vehicle_validator::routes;

pub const API_VERSION: &str = "2024-02-15-preview";
pub const API_KEY: &str = "super-secret-test-key";

/// Configuration pointing the model client at `endpoint`.
pub fn config_for(endpoint: &str) -> AppConfig {
    AppConfig {
        azure_openai_api_key: Some(API_KEY.to_string()),
        azure_openai_endpoint: Some(endpoint.to_string()),
        azure_openai_api_version: Some(API_VERSION.to_string()),
        ai_timeout_secs: 5,
        ..AppConfig::default()
    }
}

pub fn app_with(config: AppConfig) -> Router {
    routes::router(AppState::new(config), None)
}

/// A base64 payload of exactly `chars` characters.
pub fn fake_image_b64(chars: usize) -> String {
    let raw = vec![0xFFu8; chars];
    let mut encoded = base64::engine::general_purpose::STANDARD.encode(raw);
    encoded.truncate(chars);
    encoded
}

/// Mock one chat completion whose first choice carries `content`.
pub async fn mock_completion(server: &mut ServerGuard, content: &str) -> Mock {
    server
        .mock("POST", "/openai/deployments/gpt-4o/chat/completions")
        .match_query(Matcher::UrlEncoded("api-version".into(), API_VERSION.into()))
        .match_header("api-key", API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "finish_reason": "stop",
                    "message": { "role": "assistant", "content": content }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Assert the standard error envelope.
pub fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["error"], true, "body: {body}");
    assert_eq!(body["error_code"], code, "body: {body}");
    assert!(body["message"].is_string(), "body: {body}");
}
