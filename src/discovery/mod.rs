//! Discovery run orchestration.
//!
//! A run takes one [`SearchCriteria`], selects the eligible endpoints, queries
//! them one after another, merges the records, caches the assembled
//! [`DiscoverySession`] and persists it. Endpoint failures and persistence
//! failures are reported in the outcome; neither aborts the run.

mod session_id;

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use sqlx::SqlitePool;

use crate::aggregate::aggregate;
use crate::cache::ResultsCache;
use crate::catalog::{default_catalog, EndpointConfig};
use crate::config::{Config, DEFAULT_PAGE_LIMIT};
use crate::error_handling::{DatabaseError, DiscoveryStats, InitializationError};
use crate::executor::QueryExecutor;
use crate::initialization::init_client;
use crate::models::{DiscoverySession, SearchCriteria};
use crate::selector::select_endpoints;
use crate::storage::store_discovery_session;

pub use session_id::next_session_id;

/// What happened to the session on its way to the database.
#[derive(Debug)]
pub enum Persistence {
    /// Written in full.
    Stored,
    /// The engine has no database attached.
    Disabled,
    /// Rolled back; nothing of the session was written.
    Failed(DatabaseError),
}

impl Persistence {
    pub fn is_stored(&self) -> bool {
        matches!(self, Persistence::Stored)
    }
}

/// Result of one discovery run.
///
/// `session` is valid (and cached) whatever `persistence` says.
#[derive(Debug)]
pub struct DiscoveryOutcome {
    pub session: Arc<DiscoverySession>,
    pub persistence: Persistence,
}

/// Runs discoveries against one record API account.
///
/// Cheap to share: clone the `Arc`s it was built from, or wrap the engine
/// itself in an `Arc`. Concurrent runs share only the cache, the statistics
/// and the database pool.
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    executor: QueryExecutor,
    catalog: &'static [EndpointConfig],
    cache: Arc<ResultsCache>,
    pool: Option<Arc<SqlitePool>>,
    stats: Arc<DiscoveryStats>,
    default_limit: u32,
}

impl DiscoveryEngine {
    /// An engine over the built-in catalog, without persistence.
    pub fn new(executor: QueryExecutor, cache: Arc<ResultsCache>) -> Self {
        DiscoveryEngine {
            executor,
            catalog: default_catalog(),
            cache,
            pool: None,
            stats: Arc::new(DiscoveryStats::new()),
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Builds the HTTP client and executor described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn from_config(
        config: &Config,
        cache: Arc<ResultsCache>,
    ) -> Result<Self, InitializationError> {
        let client = init_client(config)?;
        let executor = QueryExecutor::new(client, &config.base_url, &config.access_token);
        Ok(Self::new(executor, cache).with_default_limit(config.default_limit))
    }

    /// Persists every session to `pool` (migrations must already be applied).
    pub fn with_store(mut self, pool: Arc<SqlitePool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_stats(mut self, stats: Arc<DiscoveryStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_catalog(mut self, catalog: &'static [EndpointConfig]) -> Self {
        self.catalog = catalog;
        self
    }

    /// Page size used when the criteria leave `limit` at 0.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        if limit > 0 {
            self.default_limit = limit;
        }
        self
    }

    pub fn cache(&self) -> &Arc<ResultsCache> {
        &self.cache
    }

    pub fn stats(&self) -> &Arc<DiscoveryStats> {
        &self.stats
    }

    /// A cached session, if it has not expired.
    pub fn get_session(&self, session_id: &str) -> Option<Arc<DiscoverySession>> {
        self.cache.get(session_id)
    }

    /// Runs one discovery for `criteria`.
    ///
    /// Raw mode is always requested, and a zero `limit` is replaced with the
    /// engine's default page size. Endpoints are queried sequentially in
    /// catalog order.
    pub async fn run(&self, mut criteria: SearchCriteria) -> DiscoveryOutcome {
        criteria.raw = true;
        if criteria.limit == 0 {
            criteria.limit = self.default_limit;
        }

        let session_id = next_session_id();
        let start_time = Utc::now();
        info!("Starting discovery session {}", session_id);
        debug!("Search criteria: {:?}", criteria);

        let endpoints = select_endpoints(&criteria, self.catalog);
        info!(
            "Querying {} endpoint(s): {}",
            endpoints.len(),
            endpoints.iter().map(|e| e.name).collect::<Vec<_>>().join(", ")
        );

        let mut endpoint_results = Vec::with_capacity(endpoints.len());
        let mut errors = Vec::new();
        for endpoint in endpoints {
            let result = self.executor.query_endpoint(endpoint, &criteria).await;
            if result.success {
                self.stats.record_success(result.record_count);
                info!(
                    "✓ {}: {} records in {}ms",
                    result.endpoint_name,
                    result.record_count,
                    result.query_time.as_millis()
                );
            } else {
                if let Some(kind) = result.error_kind {
                    self.stats.increment_error(kind);
                }
                let message = result.error.as_deref().unwrap_or("unknown error");
                warn!("✗ {}: {}", result.endpoint_name, message);
                errors.push(format!("{}: {}", result.endpoint_name, message));
            }
            endpoint_results.push(result);
        }

        let merged = aggregate(&endpoint_results);
        let session = Arc::new(DiscoverySession {
            session_id,
            search_criteria: criteria,
            start_time,
            end_time: Utc::now(),
            total_records: merged.total_records,
            unique_records: merged.unique_records(),
            records: merged.records,
            records_by_endpoint: merged.records_by_endpoint,
            endpoint_results,
            errors,
        });
        self.stats.record_run();
        log_session_summary(&session);

        self.cache.store(Arc::clone(&session));

        let persistence = match &self.pool {
            None => Persistence::Disabled,
            Some(pool) => match store_discovery_session(pool, &session).await {
                Ok(()) => {
                    debug!("Session {} persisted", session.session_id);
                    Persistence::Stored
                }
                Err(e) => {
                    warn!(
                        "Failed to persist session {} (still cached): {}",
                        session.session_id, e
                    );
                    Persistence::Failed(e)
                }
            },
        };

        DiscoveryOutcome {
            session,
            persistence,
        }
    }
}

fn log_session_summary(session: &DiscoverySession) {
    info!(
        "Session {}: {} unique of {} total records ({} duplicates) from {}/{} endpoints in {:.2}s",
        session.session_id,
        session.unique_records,
        session.total_records,
        session.duplicates_removed(),
        session.successful_endpoints(),
        session.endpoint_results.len(),
        session.elapsed().as_secs_f64()
    );
    for (endpoint, records) in &session.records_by_endpoint {
        debug!("   {}: {} records", endpoint, records.len());
    }
}
