use anyhow::Result;
use std::time::Duration;
use tracing::info;

use salon_api::jobs::{JobScheduler, OutboxDrainJob, RemotePollJob, ReminderScanJob};
use salon_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Salon Meraki API v{}", env!("CARGO_PKG_VERSION"));

    // Create local store pool and apply migrations
    let pool = persistence::db::create_pool(&config.database).await?;
    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    // A standalone instance with an empty store gets demo data.
    if !config.remote.is_enabled() {
        let repo = persistence::repositories::AppointmentRepository::new(pool.clone());
        persistence::seed::seed_demo_appointments(&repo).await?;
    }

    let state = app::create_state(config.clone(), pool.clone());

    // Background jobs
    let mut scheduler = JobScheduler::new();
    scheduler.register(ReminderScanJob::new(
        pool.clone(),
        config.jobs.reminder_scan_secs,
        config.limits.notification_cap,
    ));
    scheduler.register(OutboxDrainJob::new(
        state.sync.clone(),
        config.jobs.outbox_drain_secs,
        config.limits.outbox_batch_size,
        config.limits.outbox_retention_days,
    ));
    if state.sync.remote_enabled() {
        scheduler.register(RemotePollJob::new(
            state.sync.clone(),
            config.jobs.remote_poll_secs,
            config.limits.notification_cap,
        ));
    }
    scheduler.start();

    // Build application
    let router = app::create_app(state);

    // Start server
    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
