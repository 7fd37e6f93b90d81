//! Repository implementations over the local store.

pub mod appointment;
pub mod notification;
pub mod outbox;

pub use appointment::AppointmentRepository;
pub use notification::NotificationRepository;
pub use outbox::OutboxRepository;
