//! Endpoint selection.

use log::debug;

use crate::catalog::{EndpointConfig, GLOBAL_RECORDS_ENDPOINT};
use crate::models::SearchCriteria;

/// Chooses the catalog entries a record-collection run should query.
///
/// Entries keep catalog order. Summary endpoints are never selected, and an
/// entry qualifies only when every required parameter is present (non-empty)
/// in `criteria`. If nothing qualifies, the broadest record endpoint (the one
/// with no required parameters) is returned on its own, so the result is
/// never empty for a catalog that contains one.
pub fn select_endpoints<'a>(
    criteria: &SearchCriteria,
    catalog: &'a [EndpointConfig],
) -> Vec<&'a EndpointConfig> {
    let selected: Vec<&EndpointConfig> = catalog
        .iter()
        .filter(|e| !e.is_summary())
        .filter(|e| e.requirements_met(|p| criteria.path_param(p)))
        .collect();

    if !selected.is_empty() {
        return selected;
    }

    debug!("No endpoint matched the criteria, falling back to the broadest record endpoint");
    catalog
        .iter()
        .find(|e| !e.is_summary() && e.required_params.is_empty())
        .or_else(|| catalog.iter().find(|e| e.name == GLOBAL_RECORDS_ENDPOINT))
        .into_iter()
        .collect()
}
