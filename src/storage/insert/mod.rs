//! Database insertion operations.
//!
//! This module provides functions to write discovery sessions, their endpoint
//! breakdown and records, analytics, and composite reports.

mod analytics;
mod report;
mod session;
mod utils;

pub use report::{get_composite_reports, store_composite_report};
pub use session::{session_exists, store_discovery_session};
