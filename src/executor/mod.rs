//! Query execution against individual endpoints.
//!
//! One call to [`QueryExecutor::query_endpoint`] performs one HTTP request and
//! always returns an [`EndpointResult`]; failures are captured in the result
//! rather than propagated, so one endpoint can never abort a discovery run.

mod endpoint_url;

use std::sync::Arc;
use std::time::Instant;

use log::{debug, warn};
use reqwest::header::ACCEPT;

use crate::catalog::EndpointConfig;
use crate::error_handling::EndpointError;
use crate::models::{EndpointResult, SearchCriteria};
use crate::record::{decode_response, Record};

pub use endpoint_url::build_endpoint_url;

/// Issues endpoint requests with a shared client and fixed credentials.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    client: Arc<reqwest::Client>,
    base_url: String,
    access_token: String,
}

impl QueryExecutor {
    /// `access_token` is passed through verbatim as a bearer credential.
    pub fn new(
        client: Arc<reqwest::Client>,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        QueryExecutor {
            client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Queries one endpoint and reports its outcome.
    ///
    /// The request is bounded by the client's timeout. On success the result
    /// carries every record that decoded; malformed individual records are
    /// dropped without failing the call.
    pub async fn query_endpoint(
        &self,
        endpoint: &EndpointConfig,
        criteria: &SearchCriteria,
    ) -> EndpointResult {
        let mut result = EndpointResult::new(endpoint.name);
        result.raw_data_used = endpoint.supports_raw && criteria.raw;

        let started = Instant::now();
        let outcome = self.fetch(endpoint, criteria, &mut result).await;
        result.query_time = started.elapsed();

        match outcome {
            Ok(records) => {
                result.record_count = records.len();
                result.records = records.into_iter().map(Arc::new).collect();
                result.success = true;
                debug!(
                    "{}: {} records in {:?} (HTTP {})",
                    endpoint.name,
                    result.record_count,
                    result.query_time,
                    result.http_status.unwrap_or_default()
                );
            }
            Err(e) => {
                warn!("{}: {}", endpoint.name, e);
                result.error_kind = Some(e.kind());
                result.error = Some(e.to_string());
            }
        }

        result
    }

    async fn fetch(
        &self,
        endpoint: &EndpointConfig,
        criteria: &SearchCriteria,
        result: &mut EndpointResult,
    ) -> Result<Vec<Record>, EndpointError> {
        let (url, parameter_count) = build_endpoint_url(&self.base_url, endpoint, criteria)?;
        result.url = url.to_string();
        result.parameter_count = parameter_count;

        debug!("Querying {} at {}", endpoint.name, result.url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(EndpointError::from_reqwest)?;

        let status = response.status();
        result.http_status = Some(status.as_u16());
        if !status.is_success() {
            return Err(EndpointError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await.map_err(EndpointError::from_reqwest)?;
        let json: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| EndpointError::Decode(e.to_string()))?;

        Ok(decode_response(&json)?)
    }
}
