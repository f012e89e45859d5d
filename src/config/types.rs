//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DB_PATH, DEFAULT_BASE_URL, DEFAULT_CACHE_SWEEP_INTERVAL, DEFAULT_CACHE_TTL,
    DEFAULT_PAGE_LIMIT, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::models::SearchCriteria;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use cdr_discovery::Config;
///
/// let config = Config {
///     base_url: "https://api.example.com".to_string(),
///     access_token: "token".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the record API
    pub base_url: String,

    /// Bearer token sent verbatim with every endpoint request
    pub access_token: String,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// How long a discovery session stays in the results cache
    pub cache_ttl: Duration,

    /// Interval of the background cache sweep
    pub cache_sweep_interval: Duration,

    /// Records per endpoint when the criteria leave `limit` at 0
    pub default_limit: u32,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: String::new(),
            db_path: PathBuf::from(DB_PATH),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_sweep_interval: DEFAULT_CACHE_SWEEP_INTERVAL,
            default_limit: DEFAULT_PAGE_LIMIT,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options for the `cdr_discovery` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cdr_discovery",
    about = "Queries every eligible CDR endpoint, merges the records and stores the session."
)]
pub struct Opt {
    /// Base URL of the record API
    #[arg(long, env = "NETSAPIENS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API access token (sent as a bearer token)
    #[arg(long, env = "NETSAPIENS_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,

    /// Database path (SQLite file)
    #[arg(long, env = "DATABASE_PATH", value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    #[arg(long)]
    pub domain: Option<String>,

    #[arg(long)]
    pub user: Option<String>,

    #[arg(long)]
    pub site: Option<String>,

    #[arg(long)]
    pub call_id: Option<String>,

    /// First day of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub orig_number: Option<String>,

    #[arg(long)]
    pub term_number: Option<String>,

    #[arg(long)]
    pub any_number: Option<String>,

    /// Pagination offset
    #[arg(long, default_value_t = 0)]
    pub start: u32,

    /// Max records per endpoint
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    pub limit: u32,

    /// Print the most productive parameter/endpoint combinations after the run
    #[arg(long)]
    pub show_analytics: bool,
}

impl Opt {
    /// Splits the options into library configuration and search criteria.
    pub fn into_parts(self) -> (Config, SearchCriteria) {
        let config = Config {
            base_url: self.base_url,
            access_token: self.access_token,
            db_path: self.db_path,
            request_timeout_secs: self.timeout_seconds,
            log_level: self.log_level,
            log_format: self.log_format,
            ..Default::default()
        };
        let criteria = SearchCriteria {
            domain: self.domain,
            user: self.user,
            site: self.site,
            call_id: self.call_id,
            start_date: self.start_date,
            end_date: self.end_date,
            start: self.start,
            limit: self.limit,
            raw: true,
            originating_number: self.orig_number,
            terminating_number: self.term_number,
            any_phone_number: self.any_number,
        };
        (config, criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.default_limit, 100);
        assert_eq!(config.db_path, PathBuf::from("./data/cdr_discovery.db"));
        assert!(config.access_token.is_empty());
    }

    #[test]
    fn test_opt_into_parts() {
        let opt = Opt::parse_from([
            "cdr_discovery",
            "--base-url",
            "https://api.test",
            "--access-token",
            "secret",
            "--domain",
            "a.com",
            "--start-date",
            "2024-03-01",
            "--limit",
            "25",
        ]);
        let (config, criteria) = opt.into_parts();
        assert_eq!(config.base_url, "https://api.test");
        assert_eq!(config.access_token, "secret");
        assert_eq!(criteria.domain(), Some("a.com"));
        assert_eq!(criteria.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(criteria.limit, 25);
        assert!(criteria.user.is_none());
    }
}
