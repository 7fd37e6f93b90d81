//! Domain layer for the salon backend.
//!
//! This crate contains:
//! - Domain models (Appointment, Notification, the service catalog)
//! - Business logic services (reminder evaluation, slot availability)
//! - Domain error types

pub mod models;
pub mod services;
