pub mod appointments;
pub mod health;
pub mod notifications;
pub mod services;
pub mod slots;
