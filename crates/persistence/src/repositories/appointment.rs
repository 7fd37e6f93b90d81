//! Appointment repository.
//!
//! Owns the canonical appointment collection. All writes commit here before
//! any remote sync intent is enqueued.

use domain::models::Appointment;
use sqlx::SqlitePool;

use crate::entities::AppointmentEntity;

const SELECT_COLUMNS: &str = "id, client_name, client_email, client_phone, service, date, time, \
                              status, notes, total_price, created_at, reminder_sent";

/// Repository for appointment operations.
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists the whole collection, ordered by schedule.
    pub async fn list(&self) -> Result<Vec<Appointment>, sqlx::Error> {
        let entities = sqlx::query_as::<_, AppointmentEntity>(&format!(
            "SELECT {} FROM appointments ORDER BY date ASC, time ASC, id ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        entities.into_iter().map(AppointmentEntity::into_model).collect()
    }

    /// Lists appointments scheduled on a given calendar date.
    pub async fn list_by_date(&self, date: &str) -> Result<Vec<Appointment>, sqlx::Error> {
        let entities = sqlx::query_as::<_, AppointmentEntity>(&format!(
            "SELECT {} FROM appointments WHERE date = ? ORDER BY time ASC, id ASC",
            SELECT_COLUMNS
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        entities.into_iter().map(AppointmentEntity::into_model).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Appointment>, sqlx::Error> {
        let entity = sqlx::query_as::<_, AppointmentEntity>(&format!(
            "SELECT {} FROM appointments WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        entity.map(AppointmentEntity::into_model).transpose()
    }

    /// Inserts a new appointment. Fails on id collision.
    pub async fn create(&self, appointment: &Appointment) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, client_name, client_email, client_phone, service, date, time,
                 status, notes, total_price, created_at, reminder_sent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.client_email)
        .bind(&appointment.client_phone)
        .bind(&appointment.service)
        .bind(&appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .bind(appointment.total_price)
        .bind(appointment.created_at)
        .bind(appointment.reminder_sent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Writes a merged appointment back. Returns false when the id is
    /// unknown (reported upstream as not-found, never a silent no-op).
    pub async fn update(&self, appointment: &Appointment) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET client_name = ?, client_email = ?, client_phone = ?, service = ?,
                date = ?, time = ?, status = ?, notes = ?, total_price = ?,
                reminder_sent = ?
            WHERE id = ?
            "#,
        )
        .bind(&appointment.client_name)
        .bind(&appointment.client_email)
        .bind(&appointment.client_phone)
        .bind(&appointment.service)
        .bind(&appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .bind(appointment.total_price)
        .bind(appointment.reminder_sent)
        .bind(&appointment.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes by id. Returns false when no row matched.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces a locally-created record with the server's version of it
    /// (the server may assign a different id). Atomic: the old row is gone
    /// and the new one present, or neither changed.
    pub async fn replace(&self, local_id: &str, server: &Appointment) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM appointments WHERE id = ?")
            .bind(local_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Record vanished locally in the meantime; do not resurrect it.
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO appointments
                (id, client_name, client_email, client_phone, service, date, time,
                 status, notes, total_price, created_at, reminder_sent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&server.id)
        .bind(&server.client_name)
        .bind(&server.client_email)
        .bind(&server.client_phone)
        .bind(&server.service)
        .bind(&server.date)
        .bind(&server.time)
        .bind(server.status.as_str())
        .bind(&server.notes)
        .bind(server.total_price)
        .bind(server.created_at)
        .bind(server.reminder_sent)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Inserts or overwrites a record wholesale; used when merging the
    /// remote collection during refresh.
    pub async fn upsert(&self, appointment: &Appointment) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO appointments
                (id, client_name, client_email, client_phone, service, date, time,
                 status, notes, total_price, created_at, reminder_sent)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.client_name)
        .bind(&appointment.client_email)
        .bind(&appointment.client_phone)
        .bind(&appointment.service)
        .bind(&appointment.date)
        .bind(&appointment.time)
        .bind(appointment.status.as_str())
        .bind(&appointment.notes)
        .bind(appointment.total_price)
        .bind(appointment.created_at)
        .bind(appointment.reminder_sent)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM appointments")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
