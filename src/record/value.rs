//! Variant value type stored in a [`Record`](super::Record).
//!
//! Remote endpoints return loosely typed JSON: the same semantic field may
//! arrive as a native integer, a floating point number, or a string depending
//! on the endpoint version. `FieldValue` keeps whatever was received and the
//! coercion helpers below turn it into the type a caller asks for.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// A single decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number that fits in a signed 64-bit integer
    Int(i64),
    /// Any other JSON number
    Float(f64),
    /// JSON string
    String(String),
    /// Nested array or object, kept verbatim
    Composite(Value),
}

impl FieldValue {
    /// Returns true for JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Renders the value as text.
    ///
    /// Strings are returned as-is, numbers and booleans use their natural
    /// textual form, nested values are rendered as compact JSON and `null`
    /// becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::String(s) => s.clone(),
            FieldValue::Composite(v) => v.to_string(),
        }
    }

    /// Coerces the value into an `i64`.
    ///
    /// Floats are truncated toward zero, strings are parsed as base-10
    /// integers. Anything else yields `None`.
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            FieldValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Coerces the value into an `f64`.
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Coerces the value into a `bool`.
    ///
    /// Numbers are true when non-zero; strings are true for `"true"`, `"1"`
    /// and `"yes"` (case-insensitive).
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Int(i) => Some(*i != 0),
            FieldValue::Float(f) => Some(*f != 0.0),
            FieldValue::String(s) => {
                let s = s.trim();
                Some(
                    s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes"),
                )
            }
            _ => None,
        }
    }

    /// Converts back into a `serde_json::Value`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Composite(v) => v.clone(),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => FieldValue::Composite(value.clone()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Composite(v) => v.serialize(serializer),
        }
    }
}
