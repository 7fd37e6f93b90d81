//! Shared helpers for integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceExt;

use salon_api::app::{create_app, create_state};
use salon_api::config::Config;

/// In-memory application with a shared single-connection pool and no
/// remote configured.
pub async fn test_app() -> (Router, SqlitePool) {
    test_app_with_overrides(&[]).await
}

pub async fn test_app_with_overrides(overrides: &[(&str, &str)]) -> (Router, SqlitePool) {
    let config = Config::load_for_test(overrides).expect("test config");

    let pool = persistence::db::create_pool(&config.database)
        .await
        .expect("test pool");
    persistence::db::run_migrations(&pool).await.expect("migrations");

    let state = create_state(config, pool.clone());
    (create_app(state), pool)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    app.clone().oneshot(request).await.expect("response")
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn expect_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

/// A valid booking payload. The email local part keeps only ASCII
/// alphanumerics: client names may carry accents, email addresses may not.
pub fn booking(name: &str, date: &str, time: &str) -> serde_json::Value {
    let local: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    serde_json::json!({
        "clientName": name,
        "clientEmail": format!("{}@example.com", local),
        "clientPhone": "12345678",
        "service": "Corte de Cabello",
        "date": date,
        "time": time,
        "totalPrice": 25.0
    })
}
