//! Notification log repository.
//!
//! The log is capped and deduplicated by notification id; content is never
//! updated after creation, only the read flag flips.

use domain::models::Notification;
use sqlx::SqlitePool;

use crate::entities::NotificationEntity;

const SELECT_COLUMNS: &str =
    "id, kind, title, message, appointment_id, client_name, date, time, priority, read, created_at";

/// Repository for the notification log.
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ingests candidates, skipping ids already present, then evicts the
    /// oldest entries beyond `cap`. Returns the candidates that were
    /// actually new, so callers can surface alerts for them exactly once.
    pub async fn ingest(
        &self,
        candidates: &[Notification],
        cap: u32,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let mut inserted = Vec::new();

        for candidate in candidates {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO notifications
                    (id, kind, title, message, appointment_id, client_name, date, time,
                     priority, read, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&candidate.id)
            .bind(candidate.kind.as_str())
            .bind(&candidate.title)
            .bind(&candidate.message)
            .bind(&candidate.appointment_id)
            .bind(&candidate.client_name)
            .bind(&candidate.date)
            .bind(&candidate.time)
            .bind(candidate.priority.as_str())
            .bind(candidate.read)
            .bind(candidate.created_at)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() > 0 {
                inserted.push(candidate.clone());
            }
        }

        self.enforce_cap(cap).await?;
        Ok(inserted)
    }

    /// Drops the oldest entries (by creation time) beyond `cap`.
    async fn enforce_cap(&self, cap: u32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id NOT IN (
                SELECT id FROM notifications
                ORDER BY created_at DESC, id DESC
                LIMIT ?
            )
            "#,
        )
        .bind(cap as i64)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Lists the log newest-first.
    pub async fn list(&self) -> Result<Vec<Notification>, sqlx::Error> {
        let entities = sqlx::query_as::<_, NotificationEntity>(&format!(
            "SELECT {} FROM notifications ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        entities.into_iter().map(NotificationEntity::into_model).collect()
    }

    /// Flips the read flag. Returns false when the id is unknown.
    pub async fn mark_read(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE read = 0")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Removes an entry unconditionally. Returns false when absent.
    pub async fn remove(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Derived, never independently tracked.
    pub async fn unread_count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE read = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
