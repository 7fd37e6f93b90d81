//! Periodic reminder scan.
//!
//! Each pass evaluates the appointment collection into notification
//! candidates, pops any sharp thresholds that came due from the reminder
//! queue, and ingests everything into the capped notification log. Newly
//! inserted high/urgent entries are surfaced on the warn channel, which is
//! what operators actually watch.

use chrono::Utc;
use domain::models::{Notification, Priority};
use domain::services::reminders::{evaluate, DueReminder, ReminderQueue};
use persistence::repositories::{AppointmentRepository, NotificationRepository};
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::jobs::scheduler::{Job, JobFrequency};

pub struct ReminderScanJob {
    pool: SqlitePool,
    queue: Mutex<ReminderQueue>,
    scan_secs: u64,
    notification_cap: u32,
}

impl ReminderScanJob {
    pub fn new(pool: SqlitePool, scan_secs: u64, notification_cap: u32) -> Self {
        Self {
            pool,
            queue: Mutex::new(ReminderQueue::new()),
            scan_secs,
            notification_cap,
        }
    }

    fn reminder_notification(&self, due: &DueReminder) -> Notification {
        let mut notification = Notification::system(
            format!("reminder-{}-{}", due.threshold.slug(), due.appointment_id),
            due.threshold.title(),
            format!(
                "{} - {} at {}",
                due.client_name, due.service, due.time
            ),
        );
        notification.kind = domain::models::NotificationKind::Reminder;
        notification.appointment_id = Some(due.appointment_id.clone());
        notification.client_name = Some(due.client_name.clone());
        notification.time = Some(due.time.clone());
        notification.priority = due.threshold.priority();
        notification
    }
}

#[async_trait::async_trait]
impl Job for ReminderScanJob {
    fn name(&self) -> &'static str {
        "reminder_scan"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.scan_secs)
    }

    // The first scan runs at startup so a restart does not delay alerts.
    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), String> {
        let appointments = AppointmentRepository::new(self.pool.clone());
        let notifications = NotificationRepository::new(self.pool.clone());
        let now = Utc::now();

        let collection = appointments.list().await.map_err(|e| e.to_string())?;

        let mut candidates = evaluate(&collection, now);

        let due = {
            let mut queue = self.queue.lock().await;
            queue.rebuild(&collection, now);
            queue.pop_due(now)
        };
        for reminder in &due {
            candidates.push(self.reminder_notification(reminder));
        }

        let inserted = notifications
            .ingest(&candidates, self.notification_cap)
            .await
            .map_err(|e| e.to_string())?;

        for notification in &inserted {
            if notification.priority >= Priority::High {
                warn!(
                    id = %notification.id,
                    priority = %notification.priority.as_str(),
                    "{}: {}",
                    notification.title,
                    notification.message
                );
            }
        }

        if !inserted.is_empty() {
            info!(
                scanned = collection.len(),
                new = inserted.len(),
                fired = due.len(),
                "Reminder scan produced notifications"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::models::appointment::CreateAppointmentRequest;
    use domain::models::{Appointment, AppointmentStatus, NotificationKind};
    use persistence::db::{create_pool, run_migrations, DatabaseConfig};

    async fn test_pool() -> SqlitePool {
        let pool = create_pool(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_secs: 5,
        })
        .await
        .expect("pool");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    fn confirmed_in(minutes: i64) -> Appointment {
        let starts = Utc::now().naive_utc() + Duration::minutes(minutes);
        let mut appointment = Appointment::new(CreateAppointmentRequest {
            client_name: "Ana López".to_string(),
            client_email: "ana@example.com".to_string(),
            client_phone: "87654321".to_string(),
            service: "Manicura Clásica".to_string(),
            date: starts.format("%Y-%m-%d").to_string(),
            time: starts.format("%H:%M").to_string(),
            notes: None,
            total_price: 15.0,
        });
        appointment.status = AppointmentStatus::Confirmed;
        appointment
    }

    #[tokio::test]
    async fn test_scan_persists_candidates() {
        let pool = test_pool().await;
        let repo = AppointmentRepository::new(pool.clone());
        repo.create(&confirmed_in(45)).await.expect("create");

        let job = ReminderScanJob::new(pool.clone(), 60, 50);
        job.execute().await.expect("scan");

        let log = NotificationRepository::new(pool.clone()).list().await.unwrap();
        // 45 minutes out: upcoming and reminder candidates.
        assert!(log.iter().any(|n| n.kind == NotificationKind::Upcoming));
        assert!(log.iter().any(|n| n.kind == NotificationKind::Reminder));
    }

    #[tokio::test]
    async fn test_repeated_scans_do_not_duplicate() {
        let pool = test_pool().await;
        let repo = AppointmentRepository::new(pool.clone());
        repo.create(&confirmed_in(45)).await.expect("create");

        let job = ReminderScanJob::new(pool.clone(), 60, 50);
        job.execute().await.expect("first scan");
        let count_after_first = NotificationRepository::new(pool.clone())
            .count()
            .await
            .unwrap();

        job.execute().await.expect("second scan");
        let count_after_second = NotificationRepository::new(pool.clone())
            .count()
            .await
            .unwrap();
        assert_eq!(count_after_first, count_after_second);
    }

    #[tokio::test]
    async fn test_empty_collection_is_quiet() {
        let pool = test_pool().await;
        let job = ReminderScanJob::new(pool.clone(), 60, 50);
        job.execute().await.expect("scan");
        assert_eq!(
            NotificationRepository::new(pool).count().await.unwrap(),
            0
        );
    }
}
