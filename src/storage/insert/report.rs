//! Composite report storage.
//!
//! Reports are rendered elsewhere; this module only keeps the text alongside
//! the session it was built from.

use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::storage::models::{CompositeReport, NewCompositeReport};

use super::utils::{duration_to_millis, usize_to_i64};

/// Stores a rendered report for `session_id`.
///
/// The session must already be persisted. `file_size_bytes` is taken from
/// the length of the report data.
pub async fn store_composite_report(
    pool: &SqlitePool,
    session_id: &str,
    report: &NewCompositeReport,
) -> Result<(), DatabaseError> {
    let selected_fields = serde_json::to_string(&report.selected_fields)?;
    let filter_criteria = serde_json::to_string(&report.filter_criteria)?;

    sqlx::query(
        "INSERT INTO composite_reports (
            session_id, report_name, report_type, selected_fields, filter_criteria,
            output_format, report_data, record_count, file_size_bytes, generation_time_ms,
            created_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(session_id)
    .bind(&report.name)
    .bind(&report.report_type)
    .bind(selected_fields)
    .bind(filter_criteria)
    .bind(&report.output_format)
    .bind(&report.data)
    .bind(usize_to_i64(report.record_count))
    .bind(usize_to_i64(report.data.len()))
    .bind(duration_to_millis(report.generation_time))
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}

/// Reports stored for `session_id`, oldest first.
pub async fn get_composite_reports(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<CompositeReport>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT session_id, report_name, report_type, selected_fields, filter_criteria,
                output_format, report_data, record_count, file_size_bytes, generation_time_ms,
                created_at_ms
         FROM composite_reports
         WHERE session_id = ?
         ORDER BY id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    let mut reports = Vec::with_capacity(rows.len());
    for row in rows {
        let selected_fields: String = row.get("selected_fields");
        let filter_criteria: String = row.get("filter_criteria");
        reports.push(CompositeReport {
            session_id: row.get("session_id"),
            report_name: row.get("report_name"),
            report_type: row.get("report_type"),
            selected_fields: serde_json::from_str(&selected_fields)?,
            filter_criteria: serde_json::from_str(&filter_criteria)?,
            output_format: row.get("output_format"),
            report_data: row.get("report_data"),
            record_count: row.get("record_count"),
            file_size_bytes: row.get("file_size_bytes"),
            generation_time_ms: row.get("generation_time_ms"),
            created_at_ms: row.get("created_at_ms"),
        });
    }
    Ok(reports)
}
