//! Configuration constants.
//!
//! This module defines the defaults used throughout the engine: timeouts,
//! cache lifetimes, page sizes and identifiers.

use std::time::Duration;

/// Base URL of the record API when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://ns-api.com";

/// Default SQLite database path.
pub const DB_PATH: &str = "./data/cdr_discovery.db";

/// Per-request timeout in seconds.
///
/// Endpoint queries run sequentially, so one unresponsive endpoint delays the
/// whole run by at most this much.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Lifetime of a cached discovery session.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// How often the cache sweeper removes expired sessions.
pub const DEFAULT_CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Records requested per endpoint when the criteria leave `limit` unset.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Prefix of every discovery session identifier.
pub const SESSION_ID_PREFIX: &str = "cdr_session_";

/// User-Agent sent with every endpoint request.
pub const DEFAULT_USER_AGENT: &str = concat!("cdr_discovery/", env!("CARGO_PKG_VERSION"));

/// Number of analytics rows listed by default.
pub const DEFAULT_ANALYTICS_LIMIT: usize = 20;

// Query parameter names understood by the record API.
// `start` is overloaded: pagination offset or ISO date range bound.
pub const PARAM_START: &str = "start";
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_RAW: &str = "raw";
pub const PARAM_END: &str = "end";
pub const PARAM_CALL_ID: &str = "call_id";
pub const PARAM_ORIG_NUMBER: &str = "orig_number";
pub const PARAM_TERM_NUMBER: &str = "term_number";

/// Value sent for `raw` when full-fidelity records are requested.
pub const RAW_ENABLED_VALUE: &str = "yes";

/// Date layout for the `start`/`end` range bounds.
pub const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";
