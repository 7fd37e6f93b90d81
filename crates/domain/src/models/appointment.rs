//! Appointment domain model and lifecycle state machine.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of an appointment.
///
/// Transitions are enforced: `pending -> {confirmed, cancelled}`,
/// `confirmed -> {completed, cancelled}`. `cancelled` and `completed`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Error returned when a status change violates the transition table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
}

impl AppointmentStatus {
    /// Returns true when `self -> next` is an allowed transition.
    /// A no-op transition to the same status is always allowed.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }

    /// Validates `self -> next`, returning the transition error on violation.
    pub fn transition_to(self, next: AppointmentStatus) -> Result<AppointmentStatus, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(format!("Unknown appointment status: {}", other)),
        }
    }
}

/// A booked salon service with client contact info, schedule, status and price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub service: String,
    /// ISO 8601 calendar date (YYYY-MM-DD).
    pub date: String,
    /// Wall-clock time (HH:MM), no timezone.
    pub time: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reminder_sent: bool,
}

impl Appointment {
    /// Builds a new appointment from a validated booking request.
    ///
    /// Assigns a fresh id and `created_at`; new appointments always start
    /// `pending` with `reminder_sent` unset.
    pub fn new(request: CreateAppointmentRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_name: request.client_name,
            client_email: request.client_email,
            client_phone: request.client_phone,
            service: request.service,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
            notes: request.notes,
            total_price: request.total_price,
            created_at: Utc::now(),
            reminder_sent: false,
        }
    }

    /// The scheduled moment as a naive local datetime, or None when the
    /// stored date/time strings are malformed.
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M").ok()?;
        Some(date.and_time(time))
    }
}

/// Request payload for booking an appointment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 2, max = 100, message = "Client name must be between 2 and 100 characters"))]
    pub client_name: String,

    #[validate(email(message = "Client email must be a valid email address"))]
    pub client_email: String,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub client_phone: String,

    #[validate(length(min = 1, max = 100, message = "Service is required"))]
    pub service: String,

    #[validate(custom(function = "shared::validation::validate_iso_date"))]
    pub date: String,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub time: String,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    #[validate(custom(function = "shared::validation::validate_price"))]
    #[serde(default)]
    pub total_price: f64,
}

/// Partial-field payload for editing an appointment.
///
/// `id` and `created_at` are never updatable; absent fields are left as-is.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 2, max = 100, message = "Client name must be between 2 and 100 characters"))]
    pub client_name: Option<String>,

    #[validate(email(message = "Client email must be a valid email address"))]
    pub client_email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub client_phone: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Service is required"))]
    pub service: Option<String>,

    #[validate(custom(function = "shared::validation::validate_iso_date"))]
    pub date: Option<String>,

    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub time: Option<String>,

    pub status: Option<AppointmentStatus>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    #[validate(custom(function = "shared::validation::validate_price"))]
    pub total_price: Option<f64>,

    pub reminder_sent: Option<bool>,
}

impl Appointment {
    /// Merges an update into this appointment.
    ///
    /// Status changes go through the transition table; any other field is a
    /// plain overwrite. Returns the transition error without applying any
    /// field when the status change is invalid.
    pub fn apply_update(&mut self, update: UpdateAppointmentRequest) -> Result<(), InvalidTransition> {
        if let Some(next) = update.status {
            self.status = self.status.transition_to(next)?;
        }
        if let Some(v) = update.client_name {
            self.client_name = v;
        }
        if let Some(v) = update.client_email {
            self.client_email = v;
        }
        if let Some(v) = update.client_phone {
            self.client_phone = v;
        }
        if let Some(v) = update.service {
            self.service = v;
        }
        if let Some(v) = update.date {
            self.date = v;
        }
        if let Some(v) = update.time {
            self.time = v;
        }
        if let Some(v) = update.notes {
            self.notes = Some(v);
        }
        if let Some(v) = update.total_price {
            self.total_price = v;
        }
        if let Some(v) = update.reminder_sent {
            self.reminder_sent = v;
        }
        Ok(())
    }
}
