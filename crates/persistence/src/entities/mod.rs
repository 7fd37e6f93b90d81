//! Database row mappings.

pub mod appointment;
pub mod notification;
pub mod outbox;

pub use appointment::AppointmentEntity;
pub use notification::NotificationEntity;
pub use outbox::{
    OutboxEntity, OutboxOperation, MAX_SYNC_ATTEMPTS, RETRY_BACKOFF_SECONDS, STATUS_FAILED,
    STATUS_PENDING, STATUS_SUCCESS,
};
