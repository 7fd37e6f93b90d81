//! Outbox repository.
//!
//! Local mutations enqueue an intent row; a background job drains rows that
//! are due and records the outcome of each delivery attempt with a fixed
//! backoff schedule.

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

use crate::entities::outbox::{
    OutboxEntity, OutboxOperation, MAX_SYNC_ATTEMPTS, RETRY_BACKOFF_SECONDS, STATUS_FAILED,
    STATUS_PENDING, STATUS_SUCCESS,
};

const SELECT_COLUMNS: &str = "id, operation, record_id, payload, status, attempts, \
                              last_attempt_at, next_retry_at, last_error, created_at";

/// Repository for the remote-sync outbox.
pub struct OutboxRepository {
    pool: SqlitePool,
}

impl OutboxRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records an intent to replay a local mutation against the remote.
    pub async fn enqueue(
        &self,
        operation: OutboxOperation,
        record_id: &str,
        payload: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO outbox_entries
                (operation, record_id, payload, status, attempts, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(operation.as_str())
        .bind(record_id)
        .bind(payload)
        .bind(STATUS_PENDING)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Pending entries whose retry time has passed, oldest first. Entries
    /// that have never been attempted are due immediately.
    pub async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<OutboxEntity>, sqlx::Error> {
        sqlx::query_as::<_, OutboxEntity>(&format!(
            r#"
            SELECT {} FROM outbox_entries
            WHERE status = ? AND COALESCE(next_retry_at, created_at) <= ?
            ORDER BY COALESCE(next_retry_at, created_at) ASC, id ASC
            LIMIT ?
            "#,
            SELECT_COLUMNS
        ))
        .bind(STATUS_PENDING)
        .bind(now)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
    }

    /// Marks an entry delivered.
    pub async fn mark_success(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE outbox_entries SET status = ?, last_attempt_at = ?, last_error = NULL \
             WHERE id = ?",
        )
        .bind(STATUS_SUCCESS)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Records a failed attempt. The entry stays pending with the next
    /// backoff interval applied until the attempt budget is exhausted,
    /// after which it is marked failed and no longer retried.
    pub async fn record_failure(&self, entry: &OutboxEntity, error: &str) -> Result<(), sqlx::Error> {
        let attempts = entry.attempts + 1;
        let now = Utc::now();

        if attempts >= MAX_SYNC_ATTEMPTS {
            sqlx::query(
                "UPDATE outbox_entries \
                 SET status = ?, attempts = ?, last_attempt_at = ?, last_error = ? \
                 WHERE id = ?",
            )
            .bind(STATUS_FAILED)
            .bind(attempts)
            .bind(now)
            .bind(error)
            .bind(entry.id)
            .execute(&self.pool)
            .await?;
            return Ok(());
        }

        let backoff = RETRY_BACKOFF_SECONDS[attempts as usize];
        let next_retry = now + Duration::seconds(backoff);
        sqlx::query(
            "UPDATE outbox_entries \
             SET status = ?, attempts = ?, last_attempt_at = ?, next_retry_at = ?, last_error = ? \
             WHERE id = ?",
        )
        .bind(STATUS_PENDING)
        .bind(attempts)
        .bind(now)
        .bind(next_retry)
        .bind(error)
        .bind(entry.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// True when the record still has undelivered intents. Refresh skips
    /// such records so local edits are not clobbered by stale remote state.
    pub async fn has_pending_for(&self, record_id: &str) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM outbox_entries WHERE record_id = ? AND status = ?",
        )
        .bind(record_id)
        .bind(STATUS_PENDING)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    /// Distinct record ids with pending intents.
    pub async fn pending_records(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT record_id FROM outbox_entries WHERE status = ?",
        )
        .bind(STATUS_PENDING)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Drops delivered and permanently-failed entries older than the cutoff.
    pub async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM outbox_entries WHERE status != ? AND created_at < ?",
        )
        .bind(STATUS_PENDING)
        .bind(older_than)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM outbox_entries WHERE status = ?")
                .bind(STATUS_PENDING)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0)
    }
}
