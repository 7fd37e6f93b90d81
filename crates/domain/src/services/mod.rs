//! Domain services: reminder evaluation and slot availability.

pub mod availability;
pub mod reminders;
