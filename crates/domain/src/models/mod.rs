//! Domain model definitions.

pub mod appointment;
pub mod notification;
pub mod service_catalog;

pub use appointment::{
    Appointment, AppointmentStatus, CreateAppointmentRequest, InvalidTransition,
    UpdateAppointmentRequest,
};
pub use notification::{Notification, NotificationKind, Priority};
pub use service_catalog::{service_catalog, SalonService};
