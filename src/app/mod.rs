//! Main application modules.
//!
//! This module provides the statistics and summary printing used at the end
//! of a discovery run.

pub mod statistics;

// Re-export public API
pub use statistics::{print_analytics, print_error_statistics, print_session_summary};
