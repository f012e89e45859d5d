//! Discovery analytics accumulation.

use sqlx::{Sqlite, Transaction};

use crate::error_handling::DatabaseError;
use crate::models::EndpointResult;

use super::utils::{duration_to_millis, usize_to_i64};

/// Adds one successful query of `result.endpoint_name` to its analytics row.
///
/// The row for (`parameter_combination`, endpoint) is created on first use.
/// Every later call increments `success_count`, adds to the record and time
/// totals, and recomputes the average query time and the discovery value
/// (records found per second of query time) from the new totals, all in one
/// statement, so concurrent writers never lose an update.
pub(crate) async fn upsert_analytics(
    tx: &mut Transaction<'_, Sqlite>,
    parameter_combination: &str,
    result: &EndpointResult,
    stamp_ms: i64,
) -> Result<(), DatabaseError> {
    let records = usize_to_i64(result.record_count);
    let query_ms = duration_to_millis(result.query_time);

    sqlx::query(
        "INSERT INTO discovery_analytics (
            parameter_combination, endpoint_name, success_count, total_records_found,
            total_query_time_ms, avg_query_time_ms, discovery_value,
            last_successful_use_ms, updated_at_ms
        ) VALUES (?, ?, 1, ?, ?, CAST(? AS REAL), CAST(? AS REAL) * 1000.0 / MAX(?, 1), ?, ?)
        ON CONFLICT(parameter_combination, endpoint_name) DO UPDATE SET
            success_count = success_count + 1,
            total_records_found = total_records_found + excluded.total_records_found,
            total_query_time_ms = total_query_time_ms + excluded.total_query_time_ms,
            avg_query_time_ms = CAST(total_query_time_ms + excluded.total_query_time_ms AS REAL)
                / (success_count + 1),
            discovery_value = CAST(total_records_found + excluded.total_records_found AS REAL)
                * 1000.0 / MAX(total_query_time_ms + excluded.total_query_time_ms, 1),
            last_successful_use_ms = excluded.last_successful_use_ms,
            updated_at_ms = excluded.updated_at_ms",
    )
    .bind(parameter_combination)
    .bind(&result.endpoint_name)
    .bind(records)
    .bind(query_ms)
    .bind(query_ms)
    .bind(records)
    .bind(query_ms)
    .bind(stamp_ms)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}
