//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DEFAULT_USER_AGENT};
use crate::error_handling::InitializationError;
use reqwest::ClientBuilder;

/// Initializes the HTTP client shared by every endpoint query.
///
/// Creates a `reqwest::Client` configured with:
/// - Timeout from `config.request_timeout_secs` (covers connect, headers and body)
/// - The crate's User-Agent
///
/// Credentials are not baked into the client; the executor attaches the bearer
/// token per request so one client can serve several accounts.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(DEFAULT_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}
