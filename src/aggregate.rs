//! Record aggregation across endpoints.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::models::EndpointResult;
use crate::record::Record;

/// Merged view of every endpoint's records for one run.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Deduplicated records, endpoint order then arrival order.
    pub records: Vec<Arc<Record>>,
    /// Records reported by successful endpoints, duplicates included.
    pub total_records: usize,
    /// Records exactly as each endpoint returned them, for endpoints that
    /// returned any.
    pub records_by_endpoint: BTreeMap<String, Vec<Arc<Record>>>,
}

impl Aggregate {
    pub fn unique_records(&self) -> usize {
        self.records.len()
    }
}

/// Unions the records of `results` and drops repeated identities.
///
/// The first occurrence of an identity wins; records without an identity are
/// dropped. Failed endpoints contribute neither records nor counts.
pub fn aggregate(results: &[EndpointResult]) -> Aggregate {
    let mut aggregate = Aggregate::default();

    for result in results.iter().filter(|r| r.success) {
        aggregate.total_records += result.record_count;
        if result.discovered_data() {
            aggregate
                .records_by_endpoint
                .insert(result.endpoint_name.clone(), result.records.clone());
        }
    }

    aggregate.records = dedup_records(
        results
            .iter()
            .filter(|r| r.success)
            .flat_map(|r| r.records.iter().cloned()),
    );
    aggregate
}

/// Keeps the first record seen for each non-empty identity, preserving order.
pub fn dedup_records(records: impl IntoIterator<Item = Arc<Record>>) -> Vec<Arc<Record>> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let id = record.id();
            !id.is_empty() && seen.insert(id)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn rec(id: &str, source: &str) -> Arc<Record> {
        Arc::new(Record::from_fields([
            ("id", FieldValue::String(id.into())),
            ("source", FieldValue::String(source.into())),
        ]))
    }

    fn ok(name: &str, records: Vec<Arc<Record>>) -> EndpointResult {
        let mut result = EndpointResult::new(name);
        result.success = true;
        result.record_count = records.len();
        result.records = records;
        result
    }

    fn failed(name: &str) -> EndpointResult {
        let mut result = EndpointResult::new(name);
        result.error = Some("HTTP 500: Internal Server Error".into());
        result
    }

    #[test]
    fn test_same_identity_from_two_endpoints() {
        let results = vec![
            ok("global_cdrs", vec![rec("rec-1", "global")]),
            ok("domain_cdrs", vec![rec("rec-1", "domain")]),
        ];
        let agg = aggregate(&results);
        assert_eq!(agg.unique_records(), 1);
        assert_eq!(agg.total_records, 2);
        assert_eq!(agg.records[0].string("source"), "global");
        assert_eq!(agg.records_by_endpoint["domain_cdrs"].len(), 1);
    }

    #[test]
    fn test_failed_endpoints_are_ignored() {
        let results = vec![
            failed("global_cdrs"),
            ok("domain_cdrs", vec![rec("a", "d"), rec("b", "d"), rec("c", "d")]),
        ];
        let agg = aggregate(&results);
        assert_eq!(agg.total_records, 3);
        assert_eq!(agg.unique_records(), 3);
        assert!(!agg.records_by_endpoint.contains_key("global_cdrs"));
    }

    #[test]
    fn test_order_is_endpoint_then_arrival() {
        let results = vec![
            ok("global_cdrs", vec![rec("b", "g"), rec("a", "g")]),
            ok("domain_cdrs", vec![rec("c", "d"), rec("b", "d")]),
        ];
        let ids: Vec<String> = aggregate(&results).records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicates_within_one_endpoint() {
        let agg = aggregate(&[ok("global_cdrs", vec![rec("x", "1"), rec("x", "2")])]);
        assert_eq!(agg.unique_records(), 1);
        assert_eq!(agg.total_records, 2);
    }

    #[test]
    fn test_records_without_identity_are_dropped() {
        let anonymous =
            |d: &str| Arc::new(Record::from_fields([("domain", FieldValue::String(d.into()))]));
        let agg = aggregate(&[ok(
            "global_cdrs",
            vec![anonymous("a"), rec("x", "g"), anonymous("b"), anonymous("c")],
        )]);
        assert_eq!(agg.unique_records(), 1);
        assert_eq!(agg.records[0].id(), "x");
        assert_eq!(agg.total_records, 4);
        assert_eq!(agg.records_by_endpoint["global_cdrs"].len(), 4);
    }

    #[test]
    fn test_empty_endpoints_have_no_record_entry() {
        let agg = aggregate(&[
            ok("global_cdrs", vec![rec("a", "g")]),
            ok("domain_cdrs", Vec::new()),
            failed("site_cdrs"),
        ]);
        assert_eq!(agg.records_by_endpoint.len(), 1);
        assert!(agg.records_by_endpoint.contains_key("global_cdrs"));
        assert!(!agg.records_by_endpoint.contains_key("domain_cdrs"));
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let once = dedup_records(vec![
            rec("a", "1"),
            rec("b", "1"),
            rec("a", "2"),
            rec("c", "2"),
            rec("b", "3"),
        ]);
        let twice = dedup_records(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_unique_never_exceeds_total() {
        let results = vec![
            ok("global_cdrs", vec![rec("a", "g"), rec("b", "g")]),
            ok("domain_cdrs", vec![rec("b", "d"), rec("c", "d")]),
            failed("site_cdrs"),
        ];
        let agg = aggregate(&results);
        assert!(agg.unique_records() <= agg.total_records);
        assert_eq!((agg.unique_records(), agg.total_records), (3, 4));
    }
}
