//! Response body decoding.

use serde_json::Value;

use super::{json_type_name, Record};
use crate::error_handling::RecordError;

/// Key under which some endpoints wrap their payload.
const DATA_KEY: &str = "data";

/// Decodes an endpoint response body into records.
///
/// Accepted shapes:
/// - a bare array of record objects
/// - a single record object
/// - an object wrapping either of the above under `data` (unwrapped recursively)
///
/// Array elements that are not objects are skipped; the remaining records are
/// still returned.
///
/// # Errors
///
/// Returns `RecordError::UnexpectedShape` when the top-level body is neither an
/// array nor an object.
pub fn decode_response(body: &Value) -> Result<Vec<Record>, RecordError> {
    match body {
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for (position, item) in items.iter().enumerate() {
                match Record::from_json(item) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        log::debug!("Skipping malformed record at position {position}: {e}");
                    }
                }
            }
            Ok(records)
        }
        Value::Object(map) => match map.get(DATA_KEY) {
            Some(inner) => decode_response(inner),
            None => Ok(vec![Record::from_json(body)?]),
        },
        other => Err(RecordError::UnexpectedShape(json_type_name(other))),
    }
}
