// Shared test helpers for integration tests.
//
// This module provides mock record endpoints and database setup used across
// multiple test files.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use sqlx::SqlitePool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cdr_discovery::{init_db_pool_with_path, run_migrations, Config, LogFormat, LogLevel};

/// Creates a file-backed test database with migrations applied.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool_with_path(db_path: &Path) -> Arc<SqlitePool> {
    let pool = init_db_pool_with_path(db_path)
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Library configuration pointed at a mock server and a temp database.
#[allow(dead_code)]
pub fn test_config(base_url: &str, db_path: &Path) -> Config {
    Config {
        base_url: base_url.to_string(),
        access_token: "integration-token".to_string(),
        db_path: db_path.to_path_buf(),
        request_timeout_secs: 2,
        log_level: LogLevel::Error, // Reduce noise in tests
        log_format: LogFormat::Plain,
        ..Default::default()
    }
}

/// A call detail record as the API returns it.
#[allow(dead_code)]
pub fn cdr(id: &str, domain: &str) -> Value {
    json!({
        "id": id,
        "domain": domain,
        "call-direction": 1,
        "call-start-datetime": "2024-01-15T10:30:00Z",
        "call-total-duration-seconds": "95",
        "call-orig-user": "1001",
        "call-term-user": "1002",
    })
}

/// Mounts a `200` JSON response for `endpoint_path`.
#[allow(dead_code)]
pub async fn mount_records(server: &MockServer, endpoint_path: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a response for `endpoint_path` that takes `delay` to arrive.
#[allow(dead_code)]
pub async fn mount_slow(server: &MockServer, endpoint_path: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(endpoint_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}
