//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for favicon fetches.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - A whole-request timeout from the config (connect, TLS, headers, body)
/// - Redirect following (reqwest default, up to 10 hops)
/// - Certificate and hostname verification disabled, so hosts with
///   self-signed, expired, or mismatched certificates can still be hashed
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()?;
    Ok(Arc::new(client))
}
