//! Read-back queries over persisted discovery data.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::record::Record;

use super::models::{
    DiscoveryAnalytic, SessionRecord, SessionSummary, StoredDiscoverySession,
    StoredEndpointResult,
};

/// Loads a persisted session and its endpoint results.
///
/// Returns `Ok(None)` if no session with this id was stored.
pub async fn get_discovery_session(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Option<StoredDiscoverySession>, DatabaseError> {
    let Some(row) = sqlx::query(
        "SELECT session_id, search_criteria, start_time_ms, end_time_ms, total_records,
                unique_records, endpoints_queried, successful_endpoints, failed_endpoints,
                total_query_time_ms, raw_data_used, raw_data_summary, errors, created_at_ms
         FROM discovery_sessions
         WHERE session_id = ?",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
    .map_err(DatabaseError::SqlError)?
    else {
        return Ok(None);
    };

    let endpoint_rows = sqlx::query(
        "SELECT endpoint_name, endpoint_url, record_count, success, error_message, query_time_ms,
                http_status, raw_data_used, parameter_count, discovered_data
         FROM endpoint_results
         WHERE session_id = ?
         ORDER BY id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    let endpoint_results = endpoint_rows
        .iter()
        .map(|r| StoredEndpointResult {
            endpoint_name: r.get("endpoint_name"),
            endpoint_url: r.get("endpoint_url"),
            record_count: r.get("record_count"),
            success: r.get("success"),
            error_message: r.get("error_message"),
            query_time_ms: r.get("query_time_ms"),
            http_status: r.get("http_status"),
            raw_data_used: r.get("raw_data_used"),
            parameter_count: r.get("parameter_count"),
            discovered_data: r.get("discovered_data"),
        })
        .collect();

    let criteria: String = row.get("search_criteria");
    let raw_summary: String = row.get("raw_data_summary");
    let errors: String = row.get("errors");

    Ok(Some(StoredDiscoverySession {
        session_id: row.get("session_id"),
        search_criteria: serde_json::from_str(&criteria)?,
        start_time_ms: row.get("start_time_ms"),
        end_time_ms: row.get("end_time_ms"),
        total_records: row.get("total_records"),
        unique_records: row.get("unique_records"),
        endpoints_queried: row.get("endpoints_queried"),
        successful_endpoints: row.get("successful_endpoints"),
        failed_endpoints: row.get("failed_endpoints"),
        total_query_time_ms: row.get("total_query_time_ms"),
        raw_data_used: row.get("raw_data_used"),
        raw_data_summary: serde_json::from_str(&raw_summary)?,
        errors: serde_json::from_str(&errors)?,
        created_at_ms: row.get("created_at_ms"),
        endpoint_results,
    }))
}

/// Records stored for a session, in the order the endpoints were queried.
pub async fn get_session_records(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<SessionRecord>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT record_id, endpoint_source, record_data, field_count
         FROM session_records
         WHERE session_id = ?
         ORDER BY id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let data: String = row.get("record_data");
        let value: serde_json::Value = serde_json::from_str(&data)?;
        match Record::from_json(&value) {
            Ok(record) => records.push(SessionRecord {
                record_id: row.get("record_id"),
                endpoint_source: row.get("endpoint_source"),
                field_count: row.get("field_count"),
                record,
            }),
            Err(e) => log::warn!("Skipping stored record of session {session_id}: {e}"),
        }
    }
    Ok(records)
}

/// Most recent sessions first.
pub async fn list_recent_sessions(
    pool: &SqlitePool,
    limit: usize,
) -> Result<Vec<SessionSummary>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT session_id, start_time_ms, end_time_ms, total_records, unique_records,
                successful_endpoints, failed_endpoints
         FROM discovery_sessions
         ORDER BY start_time_ms DESC, session_id DESC
         LIMIT ?",
    )
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(rows
        .into_iter()
        .map(|row| SessionSummary {
            session_id: row.get("session_id"),
            start_time_ms: row.get("start_time_ms"),
            end_time_ms: row.get("end_time_ms"),
            total_records: row.get("total_records"),
            unique_records: row.get("unique_records"),
            successful_endpoints: row.get("successful_endpoints"),
            failed_endpoints: row.get("failed_endpoints"),
        })
        .collect())
}

/// The most productive (criteria, endpoint) pairings.
///
/// Ordered by discovery value, then success count, highest first.
pub async fn get_discovery_analytics(
    pool: &SqlitePool,
    limit: usize,
) -> Result<Vec<DiscoveryAnalytic>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT parameter_combination, endpoint_name, success_count, total_records_found,
                total_query_time_ms, avg_query_time_ms, discovery_value,
                last_successful_use_ms, updated_at_ms
         FROM discovery_analytics
         ORDER BY discovery_value DESC, success_count DESC
         LIMIT ?",
    )
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(rows.iter().map(analytic_from_row).collect())
}

fn analytic_from_row(row: &SqliteRow) -> DiscoveryAnalytic {
    DiscoveryAnalytic {
        parameter_combination: row.get("parameter_combination"),
        endpoint_name: row.get("endpoint_name"),
        success_count: row.get("success_count"),
        total_records_found: row.get("total_records_found"),
        total_query_time_ms: row.get("total_query_time_ms"),
        avg_query_time_ms: row.get("avg_query_time_ms"),
        discovery_value: row.get("discovery_value"),
        last_successful_use_ms: row.get("last_successful_use_ms"),
        updated_at_ms: row.get("updated_at_ms"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store_discovery_session;
    use crate::storage::test_helpers::{create_test_pool, test_session};
    use std::time::Duration;

    #[tokio::test]
    async fn test_session_round_trip() {
        let pool = create_test_pool().await;
        let session = test_session("cdr_session_q1");
        store_discovery_session(&pool, &session).await.unwrap();

        let stored = get_discovery_session(&pool, "cdr_session_q1")
            .await
            .unwrap()
            .expect("stored");
        assert_eq!(stored.search_criteria, session.search_criteria);
        assert_eq!(stored.start_time_ms, 1_704_067_200_000);
        assert_eq!(stored.total_records, 3);
        assert_eq!(stored.unique_records, 2);
        assert_eq!(stored.endpoints_queried, 3);
        assert_eq!(stored.total_query_time_ms, 600);
        assert!(stored.raw_data_used);
        assert_eq!(stored.raw_data_summary.get("site_cdrs"), Some(&false));
        assert_eq!(stored.errors.len(), 1);

        let names: Vec<&str> = stored
            .endpoint_results
            .iter()
            .map(|r| r.endpoint_name.as_str())
            .collect();
        assert_eq!(names, vec!["global_cdrs", "domain_cdrs", "site_cdrs"]);
        assert!(!stored.endpoint_results[2].success);
        assert_eq!(stored.endpoint_results[0].http_status, Some(200));
        assert!(stored.endpoint_results[0].discovered_data);
    }

    #[tokio::test]
    async fn test_unknown_session_is_none() {
        let pool = create_test_pool().await;
        assert!(get_discovery_session(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_records_are_decoded() {
        let pool = create_test_pool().await;
        store_discovery_session(&pool, &test_session("cdr_session_q2"))
            .await
            .unwrap();

        let records = get_session_records(&pool, "cdr_session_q2").await.unwrap();
        assert_eq!(records.len(), 3);
        let sources: Vec<&str> = records.iter().map(|r| r.endpoint_source.as_str()).collect();
        assert_eq!(sources, vec!["global_cdrs", "global_cdrs", "domain_cdrs"]);
        assert!(records
            .iter()
            .all(|r| r.field_count == r.record.field_count() as i64));
        let from_domain: Vec<_> = records
            .iter()
            .filter(|r| r.endpoint_source == "domain_cdrs")
            .collect();
        assert_eq!(from_domain.len(), 1);
        assert_eq!(from_domain[0].record_id, "rec-1");
        assert_eq!(from_domain[0].record.domain(), "a.com");
        assert_eq!(from_domain[0].record.call_duration(), 42);
    }

    #[tokio::test]
    async fn test_list_recent_sessions_newest_first() {
        let pool = create_test_pool().await;
        let older = test_session("cdr_session_old");
        let mut newer = test_session("cdr_session_new");
        newer.start_time += chrono::Duration::seconds(60);
        newer.end_time += chrono::Duration::seconds(60);
        store_discovery_session(&pool, &older).await.unwrap();
        store_discovery_session(&pool, &newer).await.unwrap();

        let listed = list_recent_sessions(&pool, 10).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["cdr_session_new", "cdr_session_old"]);
        assert_eq!(list_recent_sessions(&pool, 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_analytics_ordering() {
        let pool = create_test_pool().await;
        let mut session = test_session("cdr_session_q3");
        // global: 2 records in 250ms; domain: 1 record in 1000ms
        session.endpoint_results[1].query_time = Duration::from_millis(1000);
        store_discovery_session(&pool, &session).await.unwrap();

        let analytics = get_discovery_analytics(&pool, 10).await.unwrap();
        assert_eq!(analytics.len(), 2);
        assert_eq!(analytics[0].endpoint_name, "global_cdrs");
        assert!((analytics[0].discovery_value - 8.0).abs() < 1e-9);
        assert!((analytics[1].discovery_value - 1.0).abs() < 1e-9);
        assert_eq!(
            analytics[0].last_successful_use_ms,
            Some(session.end_time.timestamp_millis())
        );
        assert_eq!(get_discovery_analytics(&pool, 1).await.unwrap().len(), 1);
    }
}
