//! Background jobs: reminder scanning, outbox draining, remote polling.

pub mod outbox_drain;
pub mod remote_poll;
pub mod reminder_scan;
pub mod scheduler;

pub use outbox_drain::OutboxDrainJob;
pub use remote_poll::RemotePollJob;
pub use reminder_scan::ReminderScanJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
