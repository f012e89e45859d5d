//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{DiscoveryStats, EndpointErrorKind};
use crate::models::DiscoverySession;
use crate::storage::DiscoveryAnalytic;

/// Logs the per-endpoint breakdown and totals of a finished session.
pub fn print_session_summary(session: &DiscoverySession) {
    info!("Discovery session {}", session.session_id);
    for result in &session.endpoint_results {
        if result.success {
            info!(
                "   {:<14} {:>6} records  {:>6}ms  raw={}",
                result.endpoint_name,
                result.record_count,
                result.query_time.as_millis(),
                if result.raw_data_used { "yes" } else { "no" }
            );
        } else {
            info!(
                "   {:<14} failed: {}",
                result.endpoint_name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    info!(
        "✅ {} unique record{} ({} total, {} duplicate{}) from {} of {} endpoint{} in {:.1}s",
        session.unique_records,
        if session.unique_records == 1 { "" } else { "s" },
        session.total_records,
        session.duplicates_removed(),
        if session.duplicates_removed() == 1 { "" } else { "s" },
        session.successful_endpoints(),
        session.endpoint_results.len(),
        if session.endpoint_results.len() == 1 { "" } else { "s" },
        session.elapsed().as_secs_f64()
    );
}

/// Prints endpoint error counts to the log.
pub fn print_error_statistics(stats: &DiscoveryStats) {
    let total_errors = stats.total_errors();
    info!(
        "Runs: {}, endpoint successes: {}, records collected: {}",
        stats.runs(),
        stats.endpoint_successes(),
        stats.records_collected()
    );

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for kind in EndpointErrorKind::iter() {
            let count = stats.get_error_count(kind);
            if count > 0 {
                info!("   {}: {}", kind.as_str(), count);
            }
        }
    }
}

/// Logs the most productive parameter/endpoint pairings.
pub fn print_analytics(analytics: &[DiscoveryAnalytic]) {
    if analytics.is_empty() {
        info!("No discovery analytics recorded yet");
        return;
    }
    info!("Top parameter/endpoint combinations:");
    for a in analytics {
        info!(
            "   {:<14} value={:.2} rec/s  successes={}  records={}  avg={:.0}ms  params={}",
            a.endpoint_name,
            a.discovery_value,
            a.success_count,
            a.total_records_found,
            a.avg_query_time_ms,
            a.parameter_combination
        );
    }
}
