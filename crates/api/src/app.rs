use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use persistence::repositories::{AppointmentRepository, NotificationRepository, OutboxRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::middleware::require_auth;
use crate::routes::{appointments, health, notifications, services, slots};
use crate::services::{RemoteClient, SyncService};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub sync: Arc<SyncService>,
}

/// Per-request repository handles over the shared pool.
pub struct Repositories {
    pub appointments: AppointmentRepository,
    pub notifications: NotificationRepository,
    pub outbox: OutboxRepository,
}

impl AppState {
    pub fn repos(&self) -> Repositories {
        Repositories {
            appointments: AppointmentRepository::new(self.pool.clone()),
            notifications: NotificationRepository::new(self.pool.clone()),
            outbox: OutboxRepository::new(self.pool.clone()),
        }
    }
}

/// Builds the application state, including the remote client when one is
/// configured.
pub fn create_state(config: Config, pool: SqlitePool) -> AppState {
    let config = Arc::new(config);

    let remote = if config.remote.is_enabled() {
        match RemoteClient::new(&config.remote) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "Remote client unavailable, running standalone");
                None
            }
        }
    } else {
        None
    };

    let sync = Arc::new(SyncService::new(
        AppointmentRepository::new(pool.clone()),
        NotificationRepository::new(pool.clone()),
        OutboxRepository::new(pool.clone()),
        remote,
    ));

    AppState { pool, config, sync }
}

pub fn create_app(state: AppState) -> Router {
    let request_timeout = state.config.server.request_timeout_secs;

    // The admin panel is served from anywhere; the API key is the boundary.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Protected routes (require API key authentication when configured)
    let protected_routes = Router::new()
        .route(
            "/api/v1/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/api/v1/appointments/refresh",
            post(appointments::refresh_appointments),
        )
        .route(
            "/api/v1/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/api/v1/notifications", get(notifications::list_notifications))
        .route("/api/v1/notifications/read-all", put(notifications::mark_all_read))
        .route("/api/v1/notifications/:id/read", put(notifications::mark_read))
        .route(
            "/api/v1/notifications/:id",
            delete(notifications::delete_notification),
        )
        .route("/api/v1/services", get(services::list_services))
        .route(
            "/api/v1/available-slots/:date",
            get(slots::get_available_slots),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
