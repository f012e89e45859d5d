//! cdr_discovery library: call detail record discovery and aggregation
//!
//! This library queries every record endpoint that a set of search criteria
//! can address, merges and deduplicates the schema-less records they return,
//! keeps the assembled session in a TTL cache, and persists the session, its
//! per-endpoint breakdown and usage analytics to SQLite.
//!
//! # Example
//!
//! ```no_run
//! use cdr_discovery::{run_discovery, Config, SearchCriteria};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     base_url: "https://api.example.com".to_string(),
//!     access_token: std::env::var("NETSAPIENS_ACCESS_TOKEN")?,
//!     ..Default::default()
//! };
//! let criteria = SearchCriteria {
//!     domain: Some("example.com".to_string()),
//!     ..Default::default()
//! };
//!
//! let report = run_discovery(config, criteria).await?;
//! println!(
//!     "Session {}: {} unique records ({} total)",
//!     report.session.session_id, report.session.unique_records, report.session.total_records
//! );
//! # Ok(())
//! # }
//! ```
//!
//! For long-lived services, build a [`DiscoveryEngine`] once and share it
//! together with its [`ResultsCache`].
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod aggregate;
mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error_handling;
pub mod executor;
pub mod initialization;
pub mod models;
pub mod record;
pub mod selector;
pub mod storage;

// Re-export public API
pub use app::{print_analytics, print_error_statistics, print_session_summary};
pub use cache::ResultsCache;
pub use catalog::{default_catalog, EndpointConfig};
pub use config::{Config, LogFormat, LogLevel};
pub use discovery::{DiscoveryEngine, DiscoveryOutcome, Persistence};
pub use error_handling::{DatabaseError, DiscoveryStats, EndpointError, RecordError};
pub use executor::QueryExecutor;
pub use models::{DiscoverySession, EndpointResult, SearchCriteria};
pub use record::{FieldValue, Record};
pub use run::{run_discovery, DiscoveryReport};
pub use storage::{
    get_discovery_analytics, get_discovery_session, get_session_records, init_db_pool_with_path,
    list_recent_sessions, run_migrations, store_discovery_session,
};

// Internal run module (one-shot discovery with full setup and teardown)
mod run {
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::{Context, Result};

    use crate::app::{print_error_statistics, print_session_summary};
    use crate::cache::ResultsCache;
    use crate::config::Config;
    use crate::discovery::{DiscoveryEngine, Persistence};
    use crate::error_handling::DiscoveryStats;
    use crate::models::{DiscoverySession, SearchCriteria};
    use crate::storage::{init_db_pool_with_path, run_migrations};

    /// Results of a one-shot discovery run.
    #[derive(Debug, Clone)]
    pub struct DiscoveryReport {
        /// The assembled session
        pub session: Arc<DiscoverySession>,
        /// Whether the session reached the database
        pub persisted: bool,
        /// Persistence error text, if the write was rolled back
        pub persistence_error: Option<String>,
        /// Path to the SQLite database holding the session
        pub db_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs one discovery with the provided configuration.
    ///
    /// Opens (and migrates) the database at `config.db_path`, builds the HTTP
    /// client, queries every eligible endpoint for `criteria`, and stores the
    /// session. Endpoint failures and a failed session write are reported in
    /// the returned [`DiscoveryReport`], not as errors.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The database cannot be opened or migrated
    /// - The HTTP client cannot be initialized
    pub async fn run_discovery(config: Config, criteria: SearchCriteria) -> Result<DiscoveryReport> {
        let started = std::time::Instant::now();

        let pool = init_db_pool_with_path(&config.db_path)
            .await
            .context("Failed to initialize database pool")?;
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        let cache = Arc::new(ResultsCache::new(config.cache_ttl));
        let sweeper = cache.start_sweeper(config.cache_sweep_interval);
        let stats = Arc::new(DiscoveryStats::new());

        let engine = DiscoveryEngine::from_config(&config, cache)
            .context("Failed to initialize HTTP client")?
            .with_store(pool)
            .with_stats(Arc::clone(&stats));

        let outcome = engine.run(criteria).await;
        sweeper.cancel();

        print_session_summary(&outcome.session);
        print_error_statistics(&stats);

        let (persisted, persistence_error) = match outcome.persistence {
            Persistence::Stored => (true, None),
            Persistence::Disabled => (false, None),
            Persistence::Failed(e) => (false, Some(e.to_string())),
        };

        Ok(DiscoveryReport {
            session: outcome.session,
            persisted,
            persistence_error,
            db_path: config.db_path,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        })
    }
}
