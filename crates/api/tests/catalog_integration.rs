//! Service catalog, slot availability, and health endpoint tests.

mod common;

use axum::http::StatusCode;
use common::{booking, response_json, send_json, test_app};

#[tokio::test]
async fn test_service_catalog() {
    let (app, _pool) = test_app().await;

    let response = send_json(&app, "GET", "/api/v1/services", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    let services = body["services"].as_array().unwrap();
    assert_eq!(services.len(), 6);
    let corte = services
        .iter()
        .find(|s| s["name"] == "Corte de Cabello")
        .unwrap();
    assert_eq!(corte["price"], 25.0);
    assert_eq!(corte["duration"], 45);
}

#[tokio::test]
async fn test_available_slots_filter_booked_times() {
    let (app, _pool) = test_app().await;

    send_json(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking("María García", "2026-09-01", "10:00")),
    )
    .await;

    let response = send_json(&app, "GET", "/api/v1/available-slots/2026-09-01", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    let slots = body["availableSlots"].as_array().unwrap();
    assert_eq!(slots.len(), 17);
    assert!(!slots.iter().any(|s| s == "10:00"));
    assert_eq!(slots[0], "09:00");
    assert_eq!(slots[16], "17:30");

    // Another date is unaffected.
    let body =
        response_json(send_json(&app, "GET", "/api/v1/available-slots/2026-09-02", None).await)
            .await;
    assert_eq!(body["availableSlots"].as_array().unwrap().len(), 18);
}

#[tokio::test]
async fn test_available_slots_reject_bad_date() {
    let (app, _pool) = test_app().await;
    let response = send_json(&app, "GET", "/api/v1/available-slots/someday", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let (app, _pool) = test_app().await;

    let response = send_json(&app, "GET", "/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);
    assert_eq!(body["remote"]["configured"], false);

    let response = send_json(&app, "GET", "/api/health/live", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(&app, "GET", "/api/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
