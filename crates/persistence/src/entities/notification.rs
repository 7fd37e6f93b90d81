//! Notification entity definitions.

use chrono::{DateTime, Utc};
use domain::models::{Notification, NotificationKind, Priority};
use sqlx::FromRow;

/// Database entity for the `notifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub appointment_id: Option<String>,
    pub client_name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub priority: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationEntity {
    pub fn into_model(self) -> Result<Notification, sqlx::Error> {
        let kind: NotificationKind = self
            .kind
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;
        let priority: Priority = self
            .priority
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?;

        Ok(Notification {
            id: self.id,
            kind,
            title: self.title,
            message: self.message,
            appointment_id: self.appointment_id,
            client_name: self.client_name,
            date: self.date,
            time: self.time,
            created_at: self.created_at,
            read: self.read,
            priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_model() {
        let entity = NotificationEntity {
            id: "upcoming-a1".to_string(),
            kind: "upcoming".to_string(),
            title: "Upcoming appointment".to_string(),
            message: "María García has an appointment in 3 hours".to_string(),
            appointment_id: Some("a1".to_string()),
            client_name: Some("María García".to_string()),
            date: Some("2026-09-01".to_string()),
            time: Some("10:00".to_string()),
            priority: "medium".to_string(),
            read: false,
            created_at: Utc::now(),
        };
        let model = entity.into_model().expect("valid entity");
        assert_eq!(model.kind, NotificationKind::Upcoming);
        assert_eq!(model.priority, Priority::Medium);
    }

    #[test]
    fn test_unknown_kind_is_a_decode_error() {
        let entity = NotificationEntity {
            id: "x".to_string(),
            kind: "broadcast".to_string(),
            title: String::new(),
            message: String::new(),
            appointment_id: None,
            client_name: None,
            date: None,
            time: None,
            priority: "low".to_string(),
            read: false,
            created_at: Utc::now(),
        };
        assert!(entity.into_model().is_err());
    }
}
