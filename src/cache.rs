//! In-memory results cache.
//!
//! Maps a session id to its full [`DiscoverySession`] for a limited time.
//! Expiry is checked lazily on every read; [`ResultsCache::start_sweeper`]
//! optionally runs one background task that drops expired entries so memory
//! is reclaimed even for sessions nobody reads again.
//!
//! A miss (unknown or expired session) is a normal outcome, not an error.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use log::debug;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::config::DEFAULT_CACHE_TTL;
use crate::models::DiscoverySession;

#[derive(Debug)]
struct CacheEntry {
    session: Arc<DiscoverySession>,
    /// `None` when the TTL is too large to represent; such entries never expire.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Shortest period the sweeper will tick at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// TTL-scoped store of completed discovery sessions.
///
/// Shared between whoever runs discoveries and whoever serves results, usually
/// as an `Arc<ResultsCache>`. Readers never block each other.
#[derive(Debug)]
pub struct ResultsCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: RwLock<Duration>,
}

impl Default for ResultsCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ResultsCache {
    pub fn new(ttl: Duration) -> Self {
        ResultsCache {
            entries: RwLock::new(HashMap::new()),
            ttl: RwLock::new(ttl),
        }
    }

    // The maps hold plain data, so a panic while a guard was held cannot leave
    // them half-updated; recover the guard instead of propagating poison.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ttl(&self) -> Duration {
        *self.ttl.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the lifetime given to entries stored from now on.
    ///
    /// Entries already in the cache keep their original expiry.
    pub fn update_ttl(&self, ttl: Duration) {
        *self.ttl.write().unwrap_or_else(PoisonError::into_inner) = ttl;
    }

    /// Stores `session` under its own id, replacing any previous entry.
    pub fn store(&self, session: Arc<DiscoverySession>) {
        let expires_at = Instant::now().checked_add(self.ttl());
        let id = session.session_id.clone();
        self.write().insert(id, CacheEntry { session, expires_at });
    }

    /// Looks up a live session. Expired entries read as absent.
    pub fn get(&self, session_id: &str) -> Option<Arc<DiscoverySession>> {
        let now = Instant::now();
        self.read()
            .get(session_id)
            .filter(|entry| entry.is_live(now))
            .map(|entry| Arc::clone(&entry.session))
    }

    /// Removes a session. Returns whether a live entry was removed.
    pub fn delete(&self, session_id: &str) -> bool {
        let now = Instant::now();
        self.write()
            .remove(session_id)
            .is_some_and(|entry| entry.is_live(now))
    }

    /// Snapshot of every live session, keyed by id.
    pub fn get_all(&self) -> HashMap<String, Arc<DiscoverySession>> {
        let now = Instant::now();
        self.read()
            .iter()
            .filter(|(_, entry)| entry.is_live(now))
            .map(|(id, entry)| (id.clone(), Arc::clone(&entry.session)))
            .collect()
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        let now = Instant::now();
        self.read().values().filter(|e| e.is_live(now)).count()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Starts the background sweep task.
    ///
    /// Runs [`purge_expired`](Self::purge_expired) every `every` until the
    /// returned token is cancelled. A zero period is raised to one
    /// millisecond. Must be called inside a Tokio runtime.
    pub fn start_sweeper(self: &Arc<Self>, every: Duration) -> CancellationToken {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let cache = Arc::clone(self);
        let mut ticker = interval(every.max(MIN_SWEEP_INTERVAL));

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!("Results cache sweep removed {} expired session(s)", removed);
                        }
                    }
                    _ = token.cancelled() => {
                        debug!("Results cache sweeper shutting down");
                        break;
                    }
                }
            }
        });

        shutdown
    }
}
