//! Error type definitions.
//!
//! This module defines all error types used throughout the discovery engine.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// Criteria, error lists or record payloads could not be (de)serialized.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// A single record that could not be decoded, or a response body of an
/// unsupported shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A record element was not a JSON object.
    #[error("expected a record object, got {0}")]
    NotAnObject(&'static str),

    /// The response body was neither an array nor an object.
    #[error("unexpected API response format: {0}")]
    UnexpectedShape(&'static str),
}

/// Failure of one endpoint query.
///
/// None of these abort a discovery run: the failure is recorded on the
/// endpoint's result and in the session error list.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// The request URL could not be built from the template and criteria.
    #[error("URL build error: {0}")]
    UrlBuild(String),

    /// The request did not complete within the client timeout.
    #[error("HTTP request timed out: {0}")]
    Timeout(#[source] ReqwestError),

    /// Connection or other transport-level failure.
    #[error("HTTP request error: {0}")]
    Transport(#[source] ReqwestError),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The body could not be read or decoded as JSON.
    #[error("JSON decode error: {0}")]
    Decode(String),

    /// The JSON body had an unsupported shape.
    #[error("record conversion error: {0}")]
    Conversion(#[from] RecordError),
}

impl EndpointError {
    /// Classifies a transport error from `reqwest`.
    pub fn from_reqwest(error: ReqwestError) -> Self {
        if error.is_timeout() {
            EndpointError::Timeout(error)
        } else {
            EndpointError::Transport(error)
        }
    }

    pub fn kind(&self) -> EndpointErrorKind {
        match self {
            EndpointError::UrlBuild(_) => EndpointErrorKind::UrlBuild,
            EndpointError::Timeout(_) => EndpointErrorKind::Timeout,
            EndpointError::Transport(e) => super::categorize_reqwest_error(e),
            EndpointError::Status { status, .. } => EndpointErrorKind::from_status(*status),
            EndpointError::Decode(_) => EndpointErrorKind::Decode,
            EndpointError::Conversion(_) => EndpointErrorKind::Conversion,
        }
    }
}

/// Categories of endpoint failures, used for per-process statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum EndpointErrorKind {
    UrlBuild,
    Timeout,
    Connect,
    Transport,
    // Specific HTTP status code errors (common ones for better debugging)
    Unauthorized, // 401
    Forbidden,    // 403
    NotFound,     // 404
    TooManyRequests,
    ServerError, // any 5xx
    OtherStatus,
    Decode,
    Conversion,
}

impl EndpointErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => EndpointErrorKind::Unauthorized,
            403 => EndpointErrorKind::Forbidden,
            404 => EndpointErrorKind::NotFound,
            429 => EndpointErrorKind::TooManyRequests,
            500..=599 => EndpointErrorKind::ServerError,
            _ => EndpointErrorKind::OtherStatus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointErrorKind::UrlBuild => "URL build error",
            EndpointErrorKind::Timeout => "HTTP request timeout",
            EndpointErrorKind::Connect => "HTTP connect error",
            EndpointErrorKind::Transport => "HTTP transport error",
            EndpointErrorKind::Unauthorized => "Unauthorized (401)",
            EndpointErrorKind::Forbidden => "Forbidden (403)",
            EndpointErrorKind::NotFound => "Not Found (404)",
            EndpointErrorKind::TooManyRequests => "Too many requests (429)",
            EndpointErrorKind::ServerError => "Server error (5xx)",
            EndpointErrorKind::OtherStatus => "Other non-2xx status",
            EndpointErrorKind::Decode => "JSON decode error",
            EndpointErrorKind::Conversion => "Record conversion error",
        }
    }
}

impl std::fmt::Display for EndpointErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_status_error_display() {
        let err = EndpointError::Status {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert_eq!(err.kind(), EndpointErrorKind::NotFound);
    }

    #[test]
    fn test_from_status_mapping() {
        assert_eq!(
            EndpointErrorKind::from_status(401),
            EndpointErrorKind::Unauthorized
        );
        assert_eq!(
            EndpointErrorKind::from_status(503),
            EndpointErrorKind::ServerError
        );
        assert_eq!(
            EndpointErrorKind::from_status(302),
            EndpointErrorKind::OtherStatus
        );
    }

    #[test]
    fn test_conversion_error_wraps_record_error() {
        let err = EndpointError::from(RecordError::UnexpectedShape("string"));
        assert_eq!(
            err.to_string(),
            "record conversion error: unexpected API response format: string"
        );
        assert_eq!(err.kind(), EndpointErrorKind::Conversion);
    }

    #[test]
    fn test_all_error_kinds_have_string_representation() {
        for kind in EndpointErrorKind::iter() {
            assert!(!kind.as_str().is_empty(), "{:?} should have a label", kind);
        }
    }
}
