//! Error categorization.
//!
//! This module maps transport errors onto [`EndpointErrorKind`] so the same
//! classification is used for logging and statistics.

use super::types::EndpointErrorKind;

/// Categorizes a `reqwest::Error` into an `EndpointErrorKind`.
///
/// Status codes (if the error carries one) win over the error class.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> EndpointErrorKind {
    if let Some(status) = error.status() {
        return EndpointErrorKind::from_status(status.as_u16());
    }

    if error.is_timeout() {
        EndpointErrorKind::Timeout
    } else if error.is_connect() {
        EndpointErrorKind::Connect
    } else if error.is_builder() {
        EndpointErrorKind::UrlBuild
    } else if error.is_decode() || error.is_body() {
        EndpointErrorKind::Decode
    } else {
        EndpointErrorKind::Transport
    }
}
