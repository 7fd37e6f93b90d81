//! Appointment lifecycle integration tests.

mod common;

use axum::http::StatusCode;
use common::{booking, response_json, send_json, test_app};
use persistence::repositories::OutboxRepository;
use serde_json::json;

#[tokio::test]
async fn test_create_then_list() {
    let (app, _pool) = test_app().await;

    let response = send_json(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking("María García", "2026-09-01", "10:00")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = response_json(response).await;
    assert_eq!(created["status"], "pending");
    // Accented client names are accepted; the contact email stays ASCII.
    assert_eq!(created["clientName"], "María García");
    assert_eq!(created["clientEmail"], "maragarca@example.com");
    assert!(created["id"].as_str().is_some());
    assert_eq!(created["reminderSent"], false);

    let response = send_json(&app, "GET", "/api/v1/appointments", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["appointments"][0]["id"], created["id"]);
}

#[tokio::test]
async fn test_create_rejects_invalid_payload() {
    let (app, _pool) = test_app().await;

    let mut payload = booking("María García", "2026-09-01", "10:00");
    payload["clientEmail"] = json!("not-an-email");
    let response = send_json(&app, "POST", "/api/v1/appointments", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut payload = booking("María García", "2026-09-01", "10:00");
    payload["time"] = json!("25:00");
    let response = send_json(&app, "POST", "/api/v1/appointments", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_double_booking_is_accepted() {
    // Same date and time twice: both succeed, slot filtering is the only
    // collision surface.
    let (app, _pool) = test_app().await;

    for name in ["María García", "Ana López"] {
        let response = send_json(
            &app,
            "POST",
            "/api/v1/appointments",
            Some(booking(name, "2026-09-01", "10:00")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body = response_json(send_json(&app, "GET", "/api/v1/appointments", None).await).await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_update_confirms_appointment() {
    let (app, _pool) = test_app().await;

    let created = response_json(
        send_json(
            &app,
            "POST",
            "/api/v1/appointments",
            Some(booking("María García", "2026-09-01", "10:00")),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({"status": "confirmed", "notes": "Llega 5 min tarde"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(updated["status"], "confirmed");
    assert_eq!(updated["notes"], "Llega 5 min tarde");
    // Identity fields never change on update.
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn test_invalid_status_transition_is_conflict() {
    let (app, _pool) = test_app().await;

    let created = response_json(
        send_json(
            &app,
            "POST",
            "/api/v1/appointments",
            Some(booking("María García", "2026-09-01", "10:00")),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // pending -> completed skips confirmation.
    let response = send_json(
        &app,
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The rejected update must not leak partial changes.
    let current = response_json(
        send_json(&app, "GET", &format!("/api/v1/appointments/{}", id), None).await,
    )
    .await;
    assert_eq!(current["status"], "pending");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let (app, _pool) = test_app().await;
    let response = send_json(
        &app,
        "PUT",
        "/api/v1/appointments/missing",
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_appointment() {
    let (app, _pool) = test_app().await;

    let created = response_json(
        send_json(
            &app,
            "POST",
            "/api/v1/appointments",
            Some(booking("María García", "2026-09-01", "10:00")),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let response = send_json(&app, "DELETE", &format!("/api/v1/appointments/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send_json(&app, "DELETE", &format!("/api/v1/appointments/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mutations_leave_outbox_intents() {
    let (app, pool) = test_app().await;
    let outbox = OutboxRepository::new(pool);

    let created = response_json(
        send_json(
            &app,
            "POST",
            "/api/v1/appointments",
            Some(booking("María García", "2026-09-01", "10:00")),
        )
        .await,
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(outbox.count_pending().await.unwrap(), 1);

    send_json(
        &app,
        "PUT",
        &format!("/api/v1/appointments/{}", id),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    send_json(&app, "DELETE", &format!("/api/v1/appointments/{}", id), None).await;
    assert_eq!(outbox.count_pending().await.unwrap(), 3);
    assert!(outbox.has_pending_for(&id).await.unwrap());
}

#[tokio::test]
async fn test_refresh_without_remote_returns_collection() {
    let (app, _pool) = test_app().await;
    send_json(
        &app,
        "POST",
        "/api/v1/appointments",
        Some(booking("María García", "2026-09-01", "10:00")),
    )
    .await;

    let response = send_json(&app, "POST", "/api/v1/appointments/refresh", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_auth_required_when_key_configured() {
    let (app, _pool) =
        common::test_app_with_overrides(&[("server.api_key", "secret-admin-key")]).await;

    // No credential.
    let response = send_json(&app, "GET", "/api/v1/appointments", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Health stays public.
    let response = send_json(&app, "GET", "/api/health/live", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Correct credential.
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/appointments")
        .header("Authorization", "Bearer secret-admin-key")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
