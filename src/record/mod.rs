//! Schema-less record envelope.
//!
//! A [`Record`] is one externally sourced item (typically a call detail
//! record) decoded from a JSON object. Field names vary across endpoint
//! versions, so the record keeps every field it received, in arrival order,
//! and exposes best-effort typed accessors that never fail: absent or
//! unparseable values come back as the type's zero value.

mod decode;
pub mod fields;
mod value;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error_handling::RecordError;

pub use decode::decode_response;
pub use value::FieldValue;

/// Modern name of the identity field.
pub const ID_FIELD: &str = "id";
/// Legacy name of the identity field, used by older endpoint versions.
pub const LEGACY_ID_FIELD: &str = "cdr_id";

/// Timestamp layouts tried in order by [`Record::time`].
///
/// A trailing zone annotation in brackets (`2024-01-15T10:30:00Z[UTC]`) is
/// stripped before these are attempted; RFC 3339 is tried last.
const TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%d %H:%M:%S"];

/// One decoded, immutable record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl Record {
    /// Builds a record from `(name, value)` pairs.
    ///
    /// A repeated name replaces the earlier value but keeps its position.
    pub fn from_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        let mut record = Record {
            fields: Vec::new(),
            index: HashMap::new(),
        };
        for (name, value) in fields {
            let name = name.into();
            match record.index.get(&name) {
                Some(&pos) => record.fields[pos].1 = value,
                None => {
                    record.index.insert(name.clone(), record.fields.len());
                    record.fields.push((name, value));
                }
            }
        }
        record
    }

    /// Decodes a single JSON object into a record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotAnObject` for any other JSON shape.
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Ok(Record::from_fields(
                map.iter().map(|(k, v)| (k.clone(), FieldValue::from(v))),
            )),
            other => Err(RecordError::NotAnObject(json_type_name(other))),
        }
    }

    /// Raw value for a field, `None` when the field is absent.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.index.get(field).map(|&pos| &self.fields[pos].1)
    }

    /// Whether the field was present in the response (even if `null`).
    pub fn has_field(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Field names in the order they were received.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields and values in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn string(&self, field: &str) -> String {
        self.get(field).map(FieldValue::to_text).unwrap_or_default()
    }

    /// Integer accessor; values outside the `i32` range saturate.
    pub fn int(&self, field: &str) -> i32 {
        let v = self.int64(field);
        v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// 64-bit integer accessor, used for phone numbers and caller ids.
    pub fn int64(&self, field: &str) -> i64 {
        self.get(field)
            .and_then(FieldValue::coerce_i64)
            .unwrap_or_default()
    }

    pub fn float(&self, field: &str) -> f64 {
        self.get(field)
            .and_then(FieldValue::coerce_f64)
            .unwrap_or_default()
    }

    pub fn bool(&self, field: &str) -> bool {
        self.get(field)
            .and_then(FieldValue::coerce_bool)
            .unwrap_or_default()
    }

    /// Parses a timestamp field.
    ///
    /// Returns `None` when the field is absent, empty, or matches none of
    /// the known layouts.
    pub fn time(&self, field: &str) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.string(field))
    }

    /// Identity of the record: `id`, falling back to the legacy `cdr_id`.
    ///
    /// Empty when neither is present.
    pub fn id(&self) -> String {
        let id = self.string(ID_FIELD);
        if !id.is_empty() {
            return id;
        }
        self.string(LEGACY_ID_FIELD)
    }

    /// The record as a JSON object, fields in arrival order.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl TryFrom<&Value> for Record {
    type Error = RecordError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Record::from_json(value)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let base = match raw.find("Z[") {
        Some(pos) if raw.ends_with(']') => &raw[..=pos],
        _ => raw,
    };

    for format in TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(base, format) {
            return Some(naive.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
