//! # AccrediFy Common Library
//!
//! Shared code for the AccrediFy compliance portal services including:
//! - Common error types
//! - Configuration loading
//! - Canonical frequency vocabulary
//! - Period and due-date calendar arithmetic
//! - Indicator idempotency-key derivation

pub mod config;
pub mod error;
pub mod frequency;
pub mod indicator_key;
pub mod schedule;

pub use error::{Error, Result};
pub use frequency::{Frequency, ScheduleType};
