//! Durable storage of discovery sessions.
//!
//! SQLite via `sqlx`: connection pool setup, schema migrations, the
//! transactional session writer, analytics accumulation and read-back
//! queries.

pub mod insert;
pub mod migrations;
pub mod models;
pub mod pool;
pub mod query;
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use insert::{
    get_composite_reports, session_exists, store_composite_report, store_discovery_session,
};
pub use migrations::run_migrations;
pub use models::{
    CompositeReport, DiscoveryAnalytic, NewCompositeReport, SessionRecord, SessionSummary,
    StoredDiscoverySession, StoredEndpointResult,
};
pub use pool::init_db_pool_with_path;
pub use query::{
    get_discovery_analytics, get_discovery_session, get_session_records, list_recent_sessions,
};
