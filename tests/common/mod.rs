#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use khipu_gateway::{
    app::build_router,
    config::{Config, Environment},
    handlers::AppState,
    services::KhipuClient,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config(target_url: &str, api_key: Option<&str>) -> Config {
    Config {
        environment: Environment::Development,
        host: "127.0.0.1".to_string(),
        port: 0,
        khipu_api_key: api_key.map(str::to_string),
        khipu_target_api_url: target_url.to_string(),
    }
}

pub fn test_app(target_url: &str, api_key: Option<&str>) -> Router {
    let khipu = KhipuClient::new(&test_config(target_url, api_key)).unwrap();
    build_router(AppState::new(Arc::new(khipu)))
}

pub async fn send(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub async fn post_payment(app: Router, body: &str) -> (StatusCode, Value) {
    send(app, "POST", "/v3/payments", body).await
}
