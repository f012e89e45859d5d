//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cdr_discovery` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use cdr_discovery::config::{Opt, DEFAULT_ANALYTICS_LIMIT};
use cdr_discovery::initialization::init_logger_with;
use cdr_discovery::{get_discovery_analytics, init_db_pool_with_path, print_analytics, run_discovery};

#[tokio::main]
async fn main() -> Result<()> {
    // Load NETSAPIENS_* settings from .env in the working directory, if present
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    let show_analytics = opt.show_analytics;
    let (config, criteria) = opt.into_parts();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if config.access_token.is_empty() {
        log::warn!("No access token configured; endpoints will likely answer 401");
    }
    if !criteria.has_search_fields() {
        log::info!("No search fields given; querying the global record endpoint only");
    }

    let report = match run_discovery(config, criteria).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("cdr_discovery error: {:#}", e);
            process::exit(1);
        }
    };

    let session = &report.session;
    println!(
        "✅ Session {}: {} unique record{} ({} total) from {} of {} endpoint{} in {:.1}s",
        session.session_id,
        session.unique_records,
        if session.unique_records == 1 { "" } else { "s" },
        session.total_records,
        session.successful_endpoints(),
        session.endpoint_results.len(),
        if session.endpoint_results.len() == 1 { "" } else { "s" },
        report.elapsed_seconds
    );
    for error in &session.errors {
        println!("   ⚠ {}", error);
    }
    match &report.persistence_error {
        None => println!("Results saved in {}", report.db_path.display()),
        Some(e) => eprintln!("Session was not saved: {}", e),
    }

    if show_analytics {
        let pool = init_db_pool_with_path(&report.db_path)
            .await
            .context("Failed to reopen database")?;
        let analytics = get_discovery_analytics(&pool, DEFAULT_ANALYTICS_LIMIT)
            .await
            .context("Failed to read discovery analytics")?;
        print_analytics(&analytics);
    }

    Ok(())
}
