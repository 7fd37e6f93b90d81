//! Shared utilities for the salon backend.
//!
//! This crate provides common functionality used across the other crates:
//! - Validation helpers for booking payloads (dates, times, prices)

pub mod validation;
