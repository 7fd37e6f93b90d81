//! Notification center integration tests.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{response_json, send_json, test_app};
use domain::models::{Notification, NotificationKind, Priority};
use persistence::repositories::NotificationRepository;

fn entry(id: &str, age_minutes: i64) -> Notification {
    Notification {
        id: id.to_string(),
        kind: NotificationKind::Upcoming,
        title: "Upcoming appointment".to_string(),
        message: format!("Notification {}", id),
        appointment_id: Some("a1".to_string()),
        client_name: Some("María García".to_string()),
        date: Some("2026-09-01".to_string()),
        time: Some("10:00".to_string()),
        created_at: Utc::now() - Duration::minutes(age_minutes),
        read: false,
        priority: Priority::Medium,
    }
}

#[tokio::test]
async fn test_list_is_newest_first_with_unread_count() {
    let (app, pool) = test_app().await;
    let repo = NotificationRepository::new(pool);
    repo.ingest(&[entry("old", 10), entry("new", 1)], 50)
        .await
        .expect("ingest");

    let response = send_json(&app, "GET", "/api/v1/notifications", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["unreadCount"], 2);
    assert_eq!(body["notifications"][0]["id"], "new");
    assert_eq!(body["notifications"][1]["id"], "old");
}

#[tokio::test]
async fn test_mark_read_and_read_all() {
    let (app, pool) = test_app().await;
    let repo = NotificationRepository::new(pool);
    repo.ingest(&[entry("a", 2), entry("b", 1)], 50)
        .await
        .expect("ingest");

    let response = send_json(&app, "PUT", "/api/v1/notifications/a/read", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = response_json(send_json(&app, "GET", "/api/v1/notifications", None).await).await;
    assert_eq!(body["unreadCount"], 1);

    let response = send_json(&app, "PUT", "/api/v1/notifications/read-all", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = response_json(send_json(&app, "GET", "/api/v1/notifications", None).await).await;
    assert_eq!(body["unreadCount"], 0);
}

#[tokio::test]
async fn test_mark_read_unknown_id_is_not_found() {
    let (app, _pool) = test_app().await;
    let response = send_json(&app, "PUT", "/api/v1/notifications/missing/read", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_notification() {
    let (app, pool) = test_app().await;
    let repo = NotificationRepository::new(pool);
    repo.ingest(&[entry("a", 1)], 50).await.expect("ingest");

    let response = send_json(&app, "DELETE", "/api/v1/notifications/a", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send_json(&app, "DELETE", "/api/v1/notifications/a", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_log_is_capped_at_configured_size() {
    let (app, pool) = common::test_app_with_overrides(&[("limits.notification_cap", "5")]).await;
    let repo = NotificationRepository::new(pool);

    let entries: Vec<Notification> =
        (0..8).map(|i| entry(&format!("n-{}", i), 8 - i)).collect();
    repo.ingest(&entries, 5).await.expect("ingest");

    let body = response_json(send_json(&app, "GET", "/api/v1/notifications", None).await).await;
    assert_eq!(body["notifications"].as_array().unwrap().len(), 5);
    // The newest survives, the oldest is gone.
    assert_eq!(body["notifications"][0]["id"], "n-7");
}
