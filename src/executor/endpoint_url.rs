//! Request URL construction.

use url::Url;

use crate::catalog::EndpointConfig;
use crate::config::{
    PARAM_CALL_ID, PARAM_END, PARAM_LIMIT, PARAM_ORIG_NUMBER, PARAM_RAW, PARAM_START,
    PARAM_TERM_NUMBER, QUERY_DATE_FORMAT, RAW_ENABLED_VALUE,
};
use crate::error_handling::EndpointError;
use crate::models::SearchCriteria;

/// Builds the concrete request URL for `endpoint` under `base_url`.
///
/// Path placeholders are substituted from `criteria` (percent-encoded as path
/// segments). Query parameters are appended in a fixed order:
///
/// 1. `start` (pagination offset, when > 0)
/// 2. `limit` (when > 0)
/// 3. `raw=yes` (only when the endpoint supports raw mode and `criteria.raw` is set)
/// 4. `start` / `end` (date range bounds, `YYYY-MM-DD`)
/// 5. `call_id`, `orig_number`, `term_number`
///
/// `any_phone_number` has no query parameter and is never sent.
///
/// Returns the URL together with the number of query parameters appended.
///
/// # Errors
///
/// `EndpointError::UrlBuild` if the base URL is invalid or a placeholder has
/// no value in `criteria`.
pub fn build_endpoint_url(
    base_url: &str,
    endpoint: &EndpointConfig,
    criteria: &SearchCriteria,
) -> Result<(Url, usize), EndpointError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| EndpointError::UrlBuild(format!("invalid base URL {base_url:?}: {e}")))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| EndpointError::UrlBuild(format!("base URL {base_url:?} cannot carry a path")))?;
        segments.pop_if_empty();
        for part in endpoint.url_template.split('/').filter(|p| !p.is_empty()) {
            match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(name) => {
                    let value = criteria.path_param(name).ok_or_else(|| {
                        EndpointError::UrlBuild(format!(
                            "missing value for path parameter '{name}' of {}",
                            endpoint.name
                        ))
                    })?;
                    segments.push(value);
                }
                None => {
                    segments.push(part);
                }
            }
        }
    }

    let params = query_params(endpoint, criteria);
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }

    Ok((url, params.len()))
}

fn query_params(
    endpoint: &EndpointConfig,
    criteria: &SearchCriteria,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if criteria.start > 0 {
        params.push((PARAM_START, criteria.start.to_string()));
    }
    if criteria.limit > 0 {
        params.push((PARAM_LIMIT, criteria.limit.to_string()));
    }
    if endpoint.supports_raw && criteria.raw {
        params.push((PARAM_RAW, RAW_ENABLED_VALUE.to_string()));
    }
    if let Some(date) = criteria.start_date {
        params.push((PARAM_START, date.format(QUERY_DATE_FORMAT).to_string()));
    }
    if let Some(date) = criteria.end_date {
        params.push((PARAM_END, date.format(QUERY_DATE_FORMAT).to_string()));
    }
    if let Some(call_id) = criteria.call_id() {
        params.push((PARAM_CALL_ID, call_id.to_string()));
    }
    if let Some(number) = criteria.originating_number() {
        params.push((PARAM_ORIG_NUMBER, number.to_string()));
    }
    if let Some(number) = criteria.terminating_number() {
        params.push((PARAM_TERM_NUMBER, number.to_string()));
    }

    params
}
