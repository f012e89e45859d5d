//! Discovery session persistence.

use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::error_handling::DatabaseError;
use crate::models::DiscoverySession;

use super::analytics::upsert_analytics;
use super::utils::{bool_to_i64, duration_to_millis, usize_to_i64};

/// Persists a completed discovery session.
///
/// Writes, inside a single transaction:
/// 1. the `discovery_sessions` row (replaced if the id already exists)
/// 2. one `endpoint_results` row per endpoint queried
/// 3. one `session_records` row per (record id, source endpoint), in query
///    order; exact repeats of that key are ignored
/// 4. the analytics of every endpoint that returned data
///
/// Storing the same session again replaces its rows instead of appending,
/// and does not count its analytics a second time.
///
/// If any step fails nothing is written.
pub async fn store_discovery_session(
    pool: &SqlitePool,
    session: &DiscoverySession,
) -> Result<(), DatabaseError> {
    log::debug!("Persisting discovery session {}", session.session_id);

    let mut tx = pool.begin().await.map_err(DatabaseError::SqlError)?;

    // The first statement must be a write: a WAL read snapshot cannot be
    // upgraded once another session has committed.
    let already_stored = sqlx::query(
        "INSERT OR IGNORE INTO discovery_sessions
            (session_id, search_criteria, start_time_ms, end_time_ms, created_at_ms)
         VALUES (?, '{}', 0, 0, ?)",
    )
    .bind(&session.session_id)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(&mut *tx)
    .await
    .map_err(DatabaseError::SqlError)?
    .rows_affected()
        == 0;

    upsert_session_row(&mut tx, session).await?;

    if already_stored {
        for table in ["endpoint_results", "session_records"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE session_id = ?"))
                .bind(&session.session_id)
                .execute(&mut *tx)
                .await
                .map_err(DatabaseError::SqlError)?;
        }
    }

    insert_endpoint_results(&mut tx, session).await?;
    insert_session_records(&mut tx, session).await?;

    if !already_stored {
        let parameter_combination = serde_json::to_string(&session.search_criteria)?;
        let stamp_ms = session.end_time.timestamp_millis();
        for result in session.endpoint_results.iter().filter(|r| r.discovered_data()) {
            upsert_analytics(&mut tx, &parameter_combination, result, stamp_ms).await?;
        }
    }

    tx.commit().await.map_err(DatabaseError::SqlError)?;
    Ok(())
}

async fn upsert_session_row(
    tx: &mut Transaction<'_, Sqlite>,
    session: &DiscoverySession,
) -> Result<(), DatabaseError> {
    let criteria = serde_json::to_string(&session.search_criteria)?;
    let raw_summary = serde_json::to_string(&session.raw_data_summary())?;
    let errors = serde_json::to_string(&session.errors)?;

    sqlx::query(
        "INSERT INTO discovery_sessions (
            session_id, search_criteria, start_time_ms, end_time_ms, total_records,
            unique_records, endpoints_queried, successful_endpoints, failed_endpoints,
            total_query_time_ms, raw_data_used, raw_data_summary, errors, created_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(session_id) DO UPDATE SET
            search_criteria=excluded.search_criteria,
            start_time_ms=excluded.start_time_ms,
            end_time_ms=excluded.end_time_ms,
            total_records=excluded.total_records,
            unique_records=excluded.unique_records,
            endpoints_queried=excluded.endpoints_queried,
            successful_endpoints=excluded.successful_endpoints,
            failed_endpoints=excluded.failed_endpoints,
            total_query_time_ms=excluded.total_query_time_ms,
            raw_data_used=excluded.raw_data_used,
            raw_data_summary=excluded.raw_data_summary,
            errors=excluded.errors",
    )
    .bind(&session.session_id)
    .bind(criteria)
    .bind(session.start_time.timestamp_millis())
    .bind(session.end_time.timestamp_millis())
    .bind(usize_to_i64(session.total_records))
    .bind(usize_to_i64(session.unique_records))
    .bind(usize_to_i64(session.endpoint_results.len()))
    .bind(usize_to_i64(session.successful_endpoints()))
    .bind(usize_to_i64(session.failed_endpoints()))
    .bind(duration_to_millis(session.total_query_time()))
    .bind(bool_to_i64(session.raw_data_used()))
    .bind(raw_summary)
    .bind(errors)
    .bind(chrono::Utc::now().timestamp_millis())
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::SqlError)?;

    Ok(())
}

async fn insert_endpoint_results(
    tx: &mut Transaction<'_, Sqlite>,
    session: &DiscoverySession,
) -> Result<(), DatabaseError> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    for result in &session.endpoint_results {
        sqlx::query(
            "INSERT INTO endpoint_results (
                session_id, endpoint_name, endpoint_url, record_count, success, error_message,
                query_time_ms, http_status, raw_data_used, parameter_count, discovered_data,
                created_at_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.session_id)
        .bind(&result.endpoint_name)
        .bind(&result.url)
        .bind(usize_to_i64(result.record_count))
        .bind(bool_to_i64(result.success))
        .bind(result.error.as_deref())
        .bind(duration_to_millis(result.query_time))
        .bind(result.http_status.map(i64::from))
        .bind(bool_to_i64(result.raw_data_used))
        .bind(usize_to_i64(result.parameter_count))
        .bind(bool_to_i64(result.discovered_data()))
        .bind(now_ms)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::SqlError)?;
    }
    Ok(())
}

async fn insert_session_records(
    tx: &mut Transaction<'_, Sqlite>,
    session: &DiscoverySession,
) -> Result<(), DatabaseError> {
    let now_ms = chrono::Utc::now().timestamp_millis();
    let mut inserted = 0u64;
    let by_endpoint = session.endpoint_results.iter().filter_map(|result| {
        session
            .records_by_endpoint
            .get_key_value(&result.endpoint_name)
    });
    for (endpoint, records) in by_endpoint {
        for record in records {
            let data = serde_json::to_string(record.as_ref())?;
            let done = sqlx::query(
                "INSERT OR IGNORE INTO session_records (
                    session_id, record_id, endpoint_source, record_data, field_count,
                    created_at_ms
                ) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&session.session_id)
            .bind(record.id())
            .bind(endpoint)
            .bind(data)
            .bind(usize_to_i64(record.field_count()))
            .bind(now_ms)
            .execute(&mut **tx)
            .await
            .map_err(DatabaseError::SqlError)?;
            inserted += done.rows_affected();
        }
    }
    log::debug!(
        "Stored {} record row(s) for session {}",
        inserted,
        session.session_id
    );
    Ok(())
}

/// Whether a session with this id has been persisted.
pub async fn session_exists(pool: &SqlitePool, session_id: &str) -> Result<bool, DatabaseError> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM discovery_sessions WHERE session_id = ?")
        .bind(session_id)
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::SqlError)?;
    Ok(row.get::<i64, _>("n") > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{create_test_pool, test_session};

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query(&format!("SELECT COUNT(*) AS n FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
            .get("n")
    }

    #[tokio::test]
    async fn test_store_writes_every_table() {
        let pool = create_test_pool().await;
        let session = test_session("cdr_session_1");

        store_discovery_session(&pool, &session).await.unwrap();

        assert!(session_exists(&pool, "cdr_session_1").await.unwrap());
        assert_eq!(count(&pool, "endpoint_results").await, 3);
        // rec-1 from two endpoints is two rows; rec-2 one row
        assert_eq!(count(&pool, "session_records").await, 3);
        // site_cdrs failed and records no analytics
        assert_eq!(count(&pool, "discovery_analytics").await, 2);

        let row = sqlx::query(
            "SELECT total_records, unique_records, successful_endpoints, failed_endpoints, errors
             FROM discovery_sessions WHERE session_id = ?",
        )
        .bind("cdr_session_1")
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(row.get::<i64, _>("total_records"), 3);
        assert_eq!(row.get::<i64, _>("unique_records"), 2);
        assert_eq!(row.get::<i64, _>("successful_endpoints"), 2);
        assert_eq!(row.get::<i64, _>("failed_endpoints"), 1);
        assert_eq!(
            row.get::<String, _>("errors"),
            r#"["site_cdrs: HTTP 500: Internal Server Error"]"#
        );
    }

    #[tokio::test]
    async fn test_restore_replaces_rows_and_keeps_analytics() {
        let pool = create_test_pool().await;
        let mut session = test_session("cdr_session_2");
        store_discovery_session(&pool, &session).await.unwrap();

        session.unique_records = 1;
        store_discovery_session(&pool, &session).await.unwrap();

        assert_eq!(count(&pool, "discovery_sessions").await, 1);
        assert_eq!(count(&pool, "endpoint_results").await, 3);
        assert_eq!(count(&pool, "session_records").await, 3);

        let success_count: i64 = sqlx::query(
            "SELECT success_count FROM discovery_analytics WHERE endpoint_name = 'global_cdrs'",
        )
        .fetch_one(&pool)
        .await
        .unwrap()
        .get(0);
        assert_eq!(success_count, 1);

        let unique: i64 = sqlx::query("SELECT unique_records FROM discovery_sessions")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get(0);
        assert_eq!(unique, 1);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_everything() {
        let pool = create_test_pool().await;
        sqlx::query("DROP TABLE session_records")
            .execute(&pool)
            .await
            .unwrap();

        let result = store_discovery_session(&pool, &test_session("cdr_session_3")).await;
        assert!(matches!(result, Err(DatabaseError::SqlError(_))));

        assert!(!session_exists(&pool, "cdr_session_3").await.unwrap());
        assert_eq!(count(&pool, "endpoint_results").await, 0);
        assert_eq!(count(&pool, "discovery_analytics").await, 0);
    }

    #[tokio::test]
    async fn test_records_follow_query_order() {
        let pool = create_test_pool().await;
        store_discovery_session(&pool, &test_session("cdr_session_5"))
            .await
            .unwrap();

        let rows = sqlx::query(
            "SELECT endpoint_source, record_id, field_count FROM session_records ORDER BY id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let keys: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.get("endpoint_source"), r.get("record_id")))
            .collect();
        // global_cdrs was queried before domain_cdrs
        assert_eq!(
            keys,
            vec![
                ("global_cdrs".to_string(), "rec-1".to_string()),
                ("global_cdrs".to_string(), "rec-2".to_string()),
                ("domain_cdrs".to_string(), "rec-1".to_string()),
            ]
        );
        assert!(rows.iter().all(|r| r.get::<i64, _>("field_count") > 0));

        let queried: i64 = sqlx::query("SELECT endpoints_queried FROM discovery_sessions")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get(0);
        assert_eq!(queried, 3);
    }

    #[tokio::test]
    async fn test_duplicate_record_key_is_ignored() {
        let pool = create_test_pool().await;
        let mut session = test_session("cdr_session_4");
        let global = session.records_by_endpoint.get_mut("global_cdrs").unwrap();
        let first = global[0].clone();
        global.push(first);

        store_discovery_session(&pool, &session).await.unwrap();
        assert_eq!(count(&pool, "session_records").await, 3);
    }
}
