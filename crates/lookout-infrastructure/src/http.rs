//! Shared HTTP client construction.

use std::time::Duration;

use lookout_core::{LookoutError, Result};
use reqwest::Client;

/// Browser-like user agent; the HTML search endpoint rejects unknown agents.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Builds a client with the given request timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|err| LookoutError::http(format!("Failed to build HTTP client: {err}")))
}

/// Describes a request failure for logs.
pub fn describe_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request error: {err}")
    }
}
