//! Unified notification model.
//!
//! The salon previously grew two separate notification taxonomies (one for
//! the reminder toasts, one for the admin panel feed). This module merges
//! them into a single tagged kind with one priority scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::appointment::Appointment;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Confirmed appointment within the next 24 hours.
    Upcoming,
    /// Confirmed appointment within the next hour.
    Reminder,
    /// Confirmed appointment past its scheduled start.
    Overdue,
    /// Pending appointment waiting more than 24 hours for confirmation.
    Confirmation,
    /// A booking just came in.
    NewAppointment,
    /// Operational message from the service itself.
    System,
    /// Entered by hand from the admin panel.
    Manual,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Upcoming => "upcoming",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Overdue => "overdue",
            NotificationKind::Confirmation => "confirmation",
            NotificationKind::NewAppointment => "new_appointment",
            NotificationKind::System => "system",
            NotificationKind::Manual => "manual",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(NotificationKind::Upcoming),
            "reminder" => Ok(NotificationKind::Reminder),
            "overdue" => Ok(NotificationKind::Overdue),
            "confirmation" => Ok(NotificationKind::Confirmation),
            "new_appointment" => Ok(NotificationKind::NewAppointment),
            "system" => Ok(NotificationKind::System),
            "manual" => Ok(NotificationKind::Manual),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

/// Escalation level. Drives alert surfacing, not routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    // "normal" survives from the old admin-panel scale.
    #[serde(alias = "normal")]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            // "normal" survives from the old admin-panel scale.
            "normal" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

/// An entry in the notification log.
///
/// Appointment-derived notifications carry a deterministic id of the form
/// `<kind>-<appointmentId>`, which is what makes ingestion idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    // The pre-merge notification feed called this field "type".
    #[serde(alias = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    pub priority: Priority,
}

impl Notification {
    /// Builds an appointment-derived notification with the composite id.
    pub fn for_appointment(
        kind: NotificationKind,
        appointment: &Appointment,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: format!("{}-{}", kind.as_str(), appointment.id),
            kind,
            title: title.into(),
            message: message.into(),
            appointment_id: Some(appointment.id.clone()),
            client_name: Some(appointment.client_name.clone()),
            date: Some(appointment.date.clone()),
            time: Some(appointment.time.clone()),
            created_at: now,
            read: false,
            priority,
        }
    }

    /// Builds a standalone system notification with an explicit id.
    pub fn system(id: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NotificationKind::System,
            title: title.into(),
            message: message.into(),
            appointment_id: None,
            client_name: None,
            date: None,
            time: None,
            created_at: Utc::now(),
            read: false,
            priority: Priority::Low,
        }
    }
}
