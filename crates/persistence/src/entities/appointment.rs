//! Appointment entity definitions.

use chrono::{DateTime, Utc};
use domain::models::{Appointment, AppointmentStatus};
use sqlx::FromRow;

/// Database entity for the `appointments` table.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentEntity {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub service: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub notes: Option<String>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    pub reminder_sent: bool,
}

impl AppointmentEntity {
    /// Converts the row into the domain model. A status value outside the
    /// known set is a data corruption error, not a silent default.
    pub fn into_model(self) -> Result<Appointment, sqlx::Error> {
        let status: AppointmentStatus = self
            .status
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

        Ok(Appointment {
            id: self.id,
            client_name: self.client_name,
            client_email: self.client_email,
            client_phone: self.client_phone,
            service: self.service,
            date: self.date,
            time: self.time,
            status,
            notes: self.notes,
            total_price: self.total_price,
            created_at: self.created_at,
            reminder_sent: self.reminder_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> AppointmentEntity {
        AppointmentEntity {
            id: "a1".to_string(),
            client_name: "María García".to_string(),
            client_email: "maria@example.com".to_string(),
            client_phone: "12345678".to_string(),
            service: "Corte de Cabello".to_string(),
            date: "2026-09-01".to_string(),
            time: "10:00".to_string(),
            status: "confirmed".to_string(),
            notes: None,
            total_price: 25.0,
            created_at: Utc::now(),
            reminder_sent: false,
        }
    }

    #[test]
    fn test_into_model() {
        let model = entity().into_model().expect("valid entity");
        assert_eq!(model.status, AppointmentStatus::Confirmed);
        assert_eq!(model.id, "a1");
    }

    #[test]
    fn test_unknown_status_is_a_decode_error() {
        let mut bad = entity();
        bad.status = "scheduled".to_string();
        assert!(matches!(bad.into_model(), Err(sqlx::Error::Decode(_))));
    }
}
