//! Persistence layer for the salon backend.
//!
//! This crate contains:
//! - Local store connection management (embedded SQLite)
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Bootstrap seeding for first-run local-only installs

pub mod db;
pub mod entities;
pub mod repositories;
pub mod seed;
