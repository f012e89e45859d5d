//! Endpoint catalog.
//!
//! A static, read-only table of the record API resources a discovery run can
//! query. Entries are consulted by the selector (which endpoints qualify for a
//! set of criteria) and by the executor (how to build each request).

use serde::Serialize;

/// Name of the broadest record endpoint; it requires no path parameters.
pub const GLOBAL_RECORDS_ENDPOINT: &str = "global_cdrs";

const RECORD_QUERY_PARAMS: &[&str] = &["start", "limit", "raw"];

/// One queryable endpoint template.
///
/// `url_template` holds `{name}` placeholders for each entry of
/// `required_params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointConfig {
    pub name: &'static str,
    pub url_template: &'static str,
    pub required_params: &'static [&'static str],
    pub optional_params: &'static [&'static str],
    pub supports_raw: bool,
    pub description: &'static str,
}

impl EndpointConfig {
    /// Count/summary endpoints return aggregates, not records.
    pub fn is_summary(&self) -> bool {
        self.name.contains("count")
    }

    /// Whether every required parameter is satisfied by `lookup`.
    pub fn requirements_met<'a>(&self, lookup: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.required_params.iter().all(|p| lookup(*p).is_some())
    }
}

/// The built-in endpoint table, in selection order.
pub fn default_catalog() -> &'static [EndpointConfig] {
    DEFAULT_CATALOG
}

static DEFAULT_CATALOG: &[EndpointConfig] = &[
    EndpointConfig {
        name: GLOBAL_RECORDS_ENDPOINT,
        url_template: "/ns-api/v2/cdrs",
        required_params: &[],
        optional_params: RECORD_QUERY_PARAMS,
        supports_raw: true,
        description: "Call detail records across all domains",
    },
    EndpointConfig {
        name: "domain_cdrs",
        url_template: "/ns-api/v2/domains/{domain}/cdrs",
        required_params: &["domain"],
        optional_params: RECORD_QUERY_PARAMS,
        supports_raw: true,
        description: "Call detail records for one domain",
    },
    EndpointConfig {
        name: "user_cdrs",
        url_template: "/ns-api/v2/domains/{domain}/users/{user}/cdrs",
        required_params: &["domain", "user"],
        optional_params: RECORD_QUERY_PARAMS,
        supports_raw: true,
        description: "Call detail records for one user in a domain",
    },
    EndpointConfig {
        name: "site_cdrs",
        url_template: "/ns-api/v2/domains/{domain}/sites/{site}/cdrs",
        required_params: &["domain", "site"],
        optional_params: RECORD_QUERY_PARAMS,
        supports_raw: true,
        description: "Call detail records for one site in a domain",
    },
    EndpointConfig {
        name: "global_count",
        url_template: "/ns-api/v2/cdrs/count",
        required_params: &[],
        optional_params: &[],
        supports_raw: false,
        description: "Record count across all domains",
    },
    EndpointConfig {
        name: "domain_count",
        url_template: "/ns-api/v2/domains/{domain}/cdrs/count",
        required_params: &["domain"],
        optional_params: &[],
        supports_raw: false,
        description: "Record count for one domain",
    },
    EndpointConfig {
        name: "user_count",
        url_template: "/ns-api/v2/domains/{domain}/users/{user}/cdrs/count",
        required_params: &["domain", "user"],
        optional_params: &[],
        supports_raw: false,
        description: "Record count for one user in a domain",
    },
];

/// Looks up a catalog entry by name.
pub fn find_endpoint(name: &str) -> Option<&'static EndpointConfig> {
    DEFAULT_CATALOG.iter().find(|e| e.name == name)
}
