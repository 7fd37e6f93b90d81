//! Outbox entity definitions.
//!
//! Every local mutation that needs to reach the remote collaborator is
//! recorded as an intent row here and drained by a background job.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Database entity for the `outbox_entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct OutboxEntity {
    pub id: i64,
    pub operation: String,
    pub record_id: String,
    /// JSON payload for create/update operations; None for deletes.
    pub payload: Option<String>,
    pub status: String,
    pub attempts: i64,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub next_retry_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The remote operations an outbox entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxOperation {
    CreateAppointment,
    UpdateAppointment,
    DeleteAppointment,
    MarkNotificationRead,
}

impl OutboxOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxOperation::CreateAppointment => "create_appointment",
            OutboxOperation::UpdateAppointment => "update_appointment",
            OutboxOperation::DeleteAppointment => "delete_appointment",
            OutboxOperation::MarkNotificationRead => "mark_notification_read",
        }
    }
}

impl fmt::Display for OutboxOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutboxOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create_appointment" => Ok(OutboxOperation::CreateAppointment),
            "update_appointment" => Ok(OutboxOperation::UpdateAppointment),
            "delete_appointment" => Ok(OutboxOperation::DeleteAppointment),
            "mark_notification_read" => Ok(OutboxOperation::MarkNotificationRead),
            other => Err(format!("Unknown outbox operation: {}", other)),
        }
    }
}

/// Entry status values.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";

/// Maximum number of delivery attempts before an entry is marked failed.
pub const MAX_SYNC_ATTEMPTS: i64 = 4;

/// Backoff intervals in seconds for each retry attempt.
/// Attempt 1: immediate, attempt 2: 60s, attempt 3: 300s, attempt 4: 900s.
pub const RETRY_BACKOFF_SECONDS: [i64; 4] = [0, 60, 300, 900];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_round_trip() {
        for op in [
            OutboxOperation::CreateAppointment,
            OutboxOperation::UpdateAppointment,
            OutboxOperation::DeleteAppointment,
            OutboxOperation::MarkNotificationRead,
        ] {
            assert_eq!(op.as_str().parse::<OutboxOperation>().unwrap(), op);
        }
        assert!("sync_everything".parse::<OutboxOperation>().is_err());
    }

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(RETRY_BACKOFF_SECONDS[0], 0);
        assert_eq!(RETRY_BACKOFF_SECONDS[1], 60);
        assert_eq!(RETRY_BACKOFF_SECONDS[2], 300);
        assert_eq!(RETRY_BACKOFF_SECONDS[3], 900);
        assert_eq!(MAX_SYNC_ATTEMPTS as usize, RETRY_BACKOFF_SECONDS.len());
    }
}
