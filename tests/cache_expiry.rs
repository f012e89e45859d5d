//! Results cache behaviour as seen through a discovery engine.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use cdr_discovery::{DiscoveryEngine, QueryExecutor, ResultsCache, SearchCriteria};

async fn engine_with_ttl(server: &MockServer, ttl: Duration) -> DiscoveryEngine {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "r1"}])))
        .mount(server)
        .await;
    let client = Arc::new(reqwest::Client::new());
    DiscoveryEngine::new(
        QueryExecutor::new(client, server.uri(), "t"),
        Arc::new(ResultsCache::new(ttl)),
    )
}

#[tokio::test]
async fn test_session_readable_until_ttl_elapses() {
    let server = MockServer::start().await;
    let engine = engine_with_ttl(&server, Duration::from_millis(50)).await;

    let outcome = engine.run(SearchCriteria::default()).await;
    let id = outcome.session.session_id.clone();

    let cached = engine.get_session(&id).expect("readable right after the run");
    assert!(Arc::ptr_eq(&cached, &outcome.session));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(engine.get_session(&id).is_none());
}

#[tokio::test]
async fn test_sweeper_reclaims_unread_sessions() {
    let server = MockServer::start().await;
    let engine = engine_with_ttl(&server, Duration::from_millis(20)).await;
    let shutdown = engine.cache().start_sweeper(Duration::from_millis(10));

    engine.run(SearchCriteria::default()).await;
    engine.run(SearchCriteria::default()).await;

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.cache().purge_expired(), 0);
    assert_eq!(engine.cache().count(), 0);
    shutdown.cancel();
}

#[tokio::test]
async fn test_explicit_delete() {
    let server = MockServer::start().await;
    let engine = engine_with_ttl(&server, Duration::from_secs(60)).await;
    let outcome = engine.run(SearchCriteria::default()).await;

    assert!(engine.cache().delete(&outcome.session.session_id));
    assert!(engine.get_session(&outcome.session.session_id).is_none());
}
