//! Error handling and discovery statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, database, record, endpoint)
//! - Categorization of transport errors
//! - Discovery statistics tracking (runs, successes, failures by kind)
//!
//! Endpoint and record errors are never fatal to a discovery run; they are
//! recorded on the session and counted here.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::DiscoveryStats;
pub use types::{DatabaseError, EndpointError, EndpointErrorKind, InitializationError, RecordError};
