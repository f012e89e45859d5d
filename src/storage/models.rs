//! Rows read back from the discovery store.
//!
//! Timestamps are milliseconds since the Unix epoch, as stored.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::models::SearchCriteria;
use crate::record::Record;

/// A persisted discovery session with its endpoint breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct StoredDiscoverySession {
    pub session_id: String,
    pub search_criteria: SearchCriteria,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    pub total_records: i64,
    pub unique_records: i64,
    pub endpoints_queried: i64,
    pub successful_endpoints: i64,
    pub failed_endpoints: i64,
    pub total_query_time_ms: i64,
    pub raw_data_used: bool,
    pub raw_data_summary: BTreeMap<String, bool>,
    pub errors: Vec<String>,
    pub created_at_ms: i64,
    /// In the order the endpoints were queried.
    pub endpoint_results: Vec<StoredEndpointResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredEndpointResult {
    pub endpoint_name: String,
    pub endpoint_url: String,
    pub record_count: i64,
    pub success: bool,
    pub error_message: Option<String>,
    pub query_time_ms: i64,
    pub http_status: Option<i64>,
    pub raw_data_used: bool,
    pub parameter_count: i64,
    pub discovered_data: bool,
}

/// Summary row for session listings.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    pub total_records: i64,
    pub unique_records: i64,
    pub successful_endpoints: i64,
    pub failed_endpoints: i64,
}

/// One stored record and the endpoint it came from.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub record_id: String,
    pub endpoint_source: String,
    pub field_count: i64,
    pub record: Record,
}

/// Accumulated productivity of one (criteria, endpoint) pairing.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryAnalytic {
    /// Serialized `SearchCriteria` (compact JSON).
    pub parameter_combination: String,
    pub endpoint_name: String,
    pub success_count: i64,
    pub total_records_found: i64,
    pub total_query_time_ms: i64,
    pub avg_query_time_ms: f64,
    /// Records found per second of query time.
    pub discovery_value: f64,
    pub last_successful_use_ms: Option<i64>,
    pub updated_at_ms: i64,
}

/// A report already rendered by a caller, ready to be stored.
#[derive(Debug, Clone, Default)]
pub struct NewCompositeReport {
    pub name: String,
    /// csv, json, xml, custom ...
    pub report_type: String,
    pub selected_fields: Vec<String>,
    /// Extra filters the caller applied, kept as given.
    pub filter_criteria: Value,
    pub output_format: String,
    pub data: String,
    pub record_count: usize,
    pub generation_time: Duration,
}

/// A stored report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeReport {
    pub session_id: String,
    pub report_name: String,
    pub report_type: String,
    pub selected_fields: Vec<String>,
    pub filter_criteria: Value,
    pub output_format: String,
    pub report_data: String,
    pub record_count: i64,
    /// Length of `report_data` in bytes.
    pub file_size_bytes: i64,
    pub generation_time_ms: i64,
    pub created_at_ms: i64,
}
