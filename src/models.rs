//! Discovery data model.
//!
//! `SearchCriteria` is supplied by the caller for each run. `EndpointResult`
//! and `DiscoverySession` are assembled once per run and never mutated after
//! the run returns; records are shared between them through `Arc`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error_handling::EndpointErrorKind;
use crate::record::Record;

/// Search criteria for one discovery run. Every field is optional.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Site/location filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Pagination offset
    #[serde(default)]
    pub start: u32,
    /// Max records per endpoint (0 selects the engine default)
    #[serde(default)]
    pub limit: u32,
    /// Request full-fidelity records (forced on for every discovery run)
    #[serde(default)]
    pub raw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originating_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminating_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub any_phone_number: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl SearchCriteria {
    pub fn domain(&self) -> Option<&str> {
        non_empty(&self.domain)
    }

    pub fn user(&self) -> Option<&str> {
        non_empty(&self.user)
    }

    pub fn site(&self) -> Option<&str> {
        non_empty(&self.site)
    }

    pub fn call_id(&self) -> Option<&str> {
        non_empty(&self.call_id)
    }

    pub fn originating_number(&self) -> Option<&str> {
        non_empty(&self.originating_number)
    }

    pub fn terminating_number(&self) -> Option<&str> {
        non_empty(&self.terminating_number)
    }

    pub fn any_phone_number(&self) -> Option<&str> {
        non_empty(&self.any_phone_number)
    }

    /// Value of a named path parameter (`domain`, `user`, `site`).
    ///
    /// Unknown names and empty values return `None`.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        match name {
            "domain" => self.domain(),
            "user" => self.user(),
            "site" => self.site(),
            _ => None,
        }
    }

    /// Whether any non-pagination search field is set.
    pub fn has_search_fields(&self) -> bool {
        self.domain().is_some()
            || self.user().is_some()
            || self.site().is_some()
            || self.call_id().is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.originating_number().is_some()
            || self.terminating_number().is_some()
            || self.any_phone_number().is_some()
    }
}

/// Outcome of querying a single endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointResult {
    pub endpoint_name: String,
    /// Resolved request URL (empty if the URL could not be built)
    pub url: String,
    pub record_count: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub error_kind: Option<EndpointErrorKind>,
    #[serde(rename = "query_time_ms", serialize_with = "serialize_duration_ms")]
    pub query_time: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Whether `raw=yes` was sent
    pub raw_data_used: bool,
    /// Number of query parameters sent
    pub parameter_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<Arc<Record>>,
}

impl EndpointResult {
    /// A fresh, not-yet-successful result for the named endpoint.
    pub fn new(endpoint_name: impl Into<String>) -> Self {
        EndpointResult {
            endpoint_name: endpoint_name.into(),
            url: String::new(),
            record_count: 0,
            success: false,
            error: None,
            error_kind: None,
            query_time: Duration::ZERO,
            http_status: None,
            raw_data_used: false,
            parameter_count: 0,
            records: Vec::new(),
        }
    }

    /// Succeeded and returned at least one record.
    pub fn discovered_data(&self) -> bool {
        self.success && self.record_count > 0
    }
}

/// Complete result of one discovery run.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverySession {
    pub session_id: String,
    pub search_criteria: SearchCriteria,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Records returned by successful endpoints, duplicates included
    pub total_records: usize,
    /// Records left after deduplication by identity
    pub unique_records: usize,
    pub endpoint_results: Vec<EndpointResult>,
    /// Deduplicated records in endpoint, then arrival, order
    pub records: Vec<Arc<Record>>,
    pub records_by_endpoint: BTreeMap<String, Vec<Arc<Record>>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl DiscoverySession {
    pub fn elapsed(&self) -> Duration {
        (self.end_time - self.start_time)
            .to_std()
            .unwrap_or_default()
    }

    pub fn successful_endpoints(&self) -> usize {
        self.endpoint_results.iter().filter(|r| r.success).count()
    }

    pub fn failed_endpoints(&self) -> usize {
        self.endpoint_results.len() - self.successful_endpoints()
    }

    /// Sum of per-endpoint query times.
    pub fn total_query_time(&self) -> Duration {
        self.endpoint_results.iter().map(|r| r.query_time).sum()
    }

    /// Whether raw mode was applied to at least one endpoint.
    pub fn raw_data_used(&self) -> bool {
        self.endpoint_results.iter().any(|r| r.raw_data_used)
    }

    /// Endpoint name to whether raw mode was applied for it.
    pub fn raw_data_summary(&self) -> BTreeMap<String, bool> {
        self.endpoint_results
            .iter()
            .map(|r| (r.endpoint_name.clone(), r.raw_data_used))
            .collect()
    }

    pub fn duplicates_removed(&self) -> usize {
        self.total_records.saturating_sub(self.unique_records)
    }
}

fn serialize_duration_ms<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
