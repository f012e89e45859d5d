//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, cache lifetimes, query parameter names)
//! - Library configuration (`Config`)
//! - CLI option types and parsing (`Opt`)

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt};
