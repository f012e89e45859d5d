//! Discovery statistics tracking.
//!
//! This module provides thread-safe counters for discovery runs, endpoint
//! successes, and endpoint failures by category.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::EndpointErrorKind;

/// Thread-safe discovery statistics tracker.
///
/// Uses atomic counters so one instance can be shared across concurrent
/// discovery runs with `Arc`. All error kinds are initialized to zero on
/// creation.
#[derive(Debug)]
pub struct DiscoveryStats {
    runs: AtomicUsize,
    endpoint_successes: AtomicUsize,
    records_collected: AtomicUsize,
    errors: HashMap<EndpointErrorKind, AtomicUsize>,
}

impl Default for DiscoveryStats {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for kind in EndpointErrorKind::iter() {
            errors.insert(kind, AtomicUsize::new(0));
        }

        DiscoveryStats {
            runs: AtomicUsize::new(0),
            endpoint_successes: AtomicUsize::new(0),
            records_collected: AtomicUsize::new(0),
            errors,
        }
    }

    pub fn record_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one successful endpoint query and the records it returned.
    pub fn record_success(&self, records: usize) {
        self.endpoint_successes.fetch_add(1, Ordering::Relaxed);
        self.records_collected.fetch_add(records, Ordering::Relaxed);
    }

    /// Increment an error counter.
    pub fn increment_error(&self, kind: EndpointErrorKind) {
        if let Some(counter) = self.errors.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map. \
                 This indicates a bug in DiscoveryStats initialization.",
                kind
            );
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    pub fn endpoint_successes(&self) -> usize {
        self.endpoint_successes.load(Ordering::SeqCst)
    }

    pub fn records_collected(&self) -> usize {
        self.records_collected.load(Ordering::SeqCst)
    }

    /// Get the count for an error kind.
    pub fn get_error_count(&self, kind: EndpointErrorKind) -> usize {
        self.errors
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error kinds.
    pub fn total_errors(&self) -> usize {
        EndpointErrorKind::iter()
            .map(|k| self.get_error_count(k))
            .sum()
    }
}
