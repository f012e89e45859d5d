//! Discovery session identifiers.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::config::SESSION_ID_PREFIX;

static LAST_NANOS: AtomicI64 = AtomicI64::new(0);

/// Returns a fresh `cdr_session_<nanos>` identifier.
///
/// The numeric part is wall-clock nanoseconds, bumped past the previous value
/// whenever the clock has not advanced (or moved backwards), so ids handed out
/// within one process are strictly increasing even under concurrent runs.
pub fn next_session_id() -> String {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
    let mut last = LAST_NANOS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last.saturating_add(1));
        match LAST_NANOS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return format!("{SESSION_ID_PREFIX}{next}"),
            Err(current) => last = current,
        }
    }
}
