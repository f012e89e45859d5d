//! Shared test helpers for storage module tests.
//!
//! This module provides common utilities for database setup and test data
//! creation used across storage module tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;

use crate::models::{DiscoverySession, EndpointResult, SearchCriteria};
use crate::record::{FieldValue, Record};
use crate::storage::run_migrations;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
pub async fn create_test_pool() -> SqlitePool {
    // One connection: every new connection to `sqlite::memory:` is a fresh database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn test_record(id: &str, domain: &str) -> Arc<Record> {
    Arc::new(Record::from_fields([
        ("id", FieldValue::String(id.to_string())),
        ("domain", FieldValue::String(domain.to_string())),
        ("call-total-duration-seconds", FieldValue::Int(42)),
    ]))
}

pub fn test_endpoint_result(name: &str, records: Vec<Arc<Record>>) -> EndpointResult {
    let mut result = EndpointResult::new(name);
    result.url = format!("https://api.test/{name}");
    result.success = true;
    result.record_count = records.len();
    result.records = records;
    result.query_time = Duration::from_millis(250);
    result.http_status = Some(200);
    result.raw_data_used = true;
    result.parameter_count = 2;
    result
}

pub fn failed_endpoint_result(name: &str, error: &str) -> EndpointResult {
    let mut result = EndpointResult::new(name);
    result.url = format!("https://api.test/{name}");
    result.error = Some(error.to_string());
    result.query_time = Duration::from_millis(100);
    result
}

/// A two-endpoint session: `global_cdrs` returns rec-1 and rec-2,
/// `domain_cdrs` returns rec-1 again, `site_cdrs` failed.
pub fn test_session(session_id: &str) -> DiscoverySession {
    let rec1 = test_record("rec-1", "a.com");
    let rec2 = test_record("rec-2", "a.com");
    let global = test_endpoint_result("global_cdrs", vec![rec1.clone(), rec2.clone()]);
    let domain = test_endpoint_result("domain_cdrs", vec![rec1.clone()]);
    let site = failed_endpoint_result("site_cdrs", "HTTP 500: Internal Server Error");

    let mut records_by_endpoint = BTreeMap::new();
    records_by_endpoint.insert("global_cdrs".to_string(), global.records.clone());
    records_by_endpoint.insert("domain_cdrs".to_string(), domain.records.clone());

    DiscoverySession {
        session_id: session_id.to_string(),
        search_criteria: SearchCriteria {
            domain: Some("a.com".into()),
            limit: 100,
            raw: true,
            ..Default::default()
        },
        start_time: Utc.timestamp_millis_opt(1_704_067_200_000).unwrap(),
        end_time: Utc.timestamp_millis_opt(1_704_067_201_500).unwrap(),
        total_records: 3,
        unique_records: 2,
        endpoint_results: vec![global, domain, site],
        records: vec![rec1, rec2],
        records_by_endpoint,
        errors: vec!["site_cdrs: HTTP 500: Internal Server Error".to_string()],
    }
}
