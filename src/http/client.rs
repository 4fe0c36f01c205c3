//! Authenticated API client
//!
//! A single-attempt JSON client: GET calls carry credentials as cookies,
//! POST calls carry them as a form-encoded body. TLS certificates are
//! always verified.

use reqwest::{
    header::{HeaderValue, COOKIE},
    Client,
};
use serde_json::Value;
use std::error::Error as _;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Default per-call timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request error occurred: {0}")]
    Transport(String),

    #[error("HTTP error occurred: {status} {reason}")]
    Http { status: u16, reason: String },

    #[error("Error parsing JSON response: {0}")]
    Decode(String),
}

/// How credentials travel with a call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMethod {
    /// Credentials sent as cookies
    Get,
    /// Credentials sent as a form-encoded body
    Post,
}

impl fmt::Display for CallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallMethod::Get => write!(f, "GET"),
            CallMethod::Post => write!(f, "POST"),
        }
    }
}

/// JSON API client with a fixed per-call timeout
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    timeout_secs: u64,
}

impl ApiClient {
    /// Create client with custom timeout
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Issue one call and decode the JSON body.
    ///
    /// No retries are attempted; the caller owns any retry policy.
    pub async fn call(
        &self,
        url: &str,
        auth: &[(&str, &str)],
        method: CallMethod,
    ) -> Result<Value, ApiError> {
        if url.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "the URL must be a non-empty string".to_string(),
            ));
        }

        debug!("Calling {} {}", method, url);

        let request = match method {
            CallMethod::Get => {
                let builder = self.client.get(url);
                match cookie_header(auth)? {
                    Some(cookie) => builder.header(COOKIE, cookie),
                    None => builder,
                }
            }
            CallMethod::Post => self.client.post(url).form(auth),
        };

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                reason,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;

        info!("API status: {} {}", status.as_u16(), reason);
        debug!("API return: {}", body);

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.timeout_secs)
        } else {
            ApiError::Transport(error_chain(&err))
        }
    }
}

/// Error message followed by every distinct cause, joined with `: `
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Render credential pairs as a single `Cookie` header value
fn cookie_header(auth: &[(&str, &str)]) -> Result<Option<HeaderValue>, ApiError> {
    if auth.is_empty() {
        return Ok(None);
    }

    let joined = auth
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ");

    HeaderValue::from_str(&joined)
        .map(Some)
        .map_err(|_| ApiError::InvalidArgument("credential is not a valid cookie value".to_string()))
}
