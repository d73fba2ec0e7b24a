//! # Unhyped Common Library
//!
//! Shared code for Unhyped services:
//! - Error and result types
//! - TOML configuration schema and loading
//! - Injectable clock for time-dependent components

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
pub use time::{Clock, ManualClock, SystemClock};
