//! Call detail record field names and convenience accessors.

use chrono::{DateTime, Utc};

use super::{FieldValue, Record, ID_FIELD};

pub const DOMAIN: &str = "domain";
pub const CALL_DIRECTION: &str = "call-direction";
pub const CALL_START_DATETIME: &str = "call-start-datetime";
pub const CALL_TOTAL_DURATION_SECONDS: &str = "call-total-duration-seconds";
/// Legacy duration field used by older endpoint versions
pub const LEGACY_DURATION: &str = "duration";
pub const CALL_ORIG_CALLER_ID: &str = "call-orig-caller-id";
pub const CALL_TERM_CALLER_ID: &str = "call-term-caller-id";
pub const CALL_ORIG_USER: &str = "call-orig-user";
pub const CALL_TERM_USER: &str = "call-term-user";
pub const CALL_DISCONNECT_REASON: &str = "call-disconnect-reason-text";
pub const CALL_INTELLIGENCE_JOB_ID: &str = "call-intelligence-job-id";
pub const CALL_INTELLIGENCE_PERCENT_POSITIVE: &str = "call-intelligence-percent-positive";

/// Fields every report checks for, in report column order.
pub const ESSENTIAL_REPORT_FIELDS: &[&str] = &[
    ID_FIELD,
    DOMAIN,
    CALL_DIRECTION,
    CALL_START_DATETIME,
    CALL_TOTAL_DURATION_SECONDS,
    CALL_ORIG_USER,
    CALL_TERM_USER,
    CALL_DISCONNECT_REASON,
    CALL_ORIG_CALLER_ID,
    CALL_TERM_CALLER_ID,
];

impl Record {
    pub fn domain(&self) -> String {
        self.string(DOMAIN)
    }

    pub fn call_direction(&self) -> i32 {
        self.int(CALL_DIRECTION)
    }

    pub fn call_start_time(&self) -> Option<DateTime<Utc>> {
        self.time(CALL_START_DATETIME)
    }

    /// Call duration in seconds, preferring the modern field name.
    pub fn call_duration(&self) -> i32 {
        let duration = self.int(CALL_TOTAL_DURATION_SECONDS);
        if duration > 0 {
            return duration;
        }
        self.int(LEGACY_DURATION)
    }

    pub fn orig_caller_id(&self) -> i64 {
        self.int64(CALL_ORIG_CALLER_ID)
    }

    pub fn term_caller_id(&self) -> i64 {
        self.int64(CALL_TERM_CALLER_ID)
    }

    pub fn orig_user(&self) -> String {
        self.string(CALL_ORIG_USER)
    }

    pub fn term_user(&self) -> String {
        self.string(CALL_TERM_USER)
    }

    pub fn disconnect_reason(&self) -> String {
        self.string(CALL_DISCONNECT_REASON)
    }

    pub fn has_transcription_data(&self) -> bool {
        self.has_field(CALL_INTELLIGENCE_JOB_ID)
    }

    pub fn has_sentiment_data(&self) -> bool {
        self.has_field(CALL_INTELLIGENCE_PERCENT_POSITIVE)
    }

    /// Essential report fields this record actually carries.
    pub fn available_report_fields(&self) -> Vec<&'static str> {
        ESSENTIAL_REPORT_FIELDS
            .iter()
            .copied()
            .filter(|field| self.has_field(field))
            .collect()
    }

    /// Every field as a `[name, value]` pair in arrival order.
    ///
    /// `null` values are rendered as the literal `"null"`.
    pub fn to_key_value_pairs(&self) -> Vec<[String; 2]> {
        self.iter()
            .map(|(name, value)| {
                let text = match value {
                    FieldValue::Null => "null".to_string(),
                    other => other.to_text(),
                };
                [name.to_string(), text]
            })
            .collect()
    }

    /// Essential call information as label/value rows, header row first.
    pub fn call_summary(&self) -> Vec<[String; 2]> {
        let start = self
            .call_start_time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        vec![
            ["Field".into(), "Value".into()],
            ["Call ID".into(), self.id()],
            ["Domain".into(), self.domain()],
            ["Direction".into(), self.call_direction().to_string()],
            ["Start Time".into(), start],
            ["Duration (seconds)".into(), self.call_duration().to_string()],
            ["Origin User".into(), self.orig_user()],
            ["Term User".into(), self.term_user()],
            ["Disconnect Reason".into(), self.disconnect_reason()],
            ["Field Count".into(), self.field_count().to_string()],
        ]
    }
}
