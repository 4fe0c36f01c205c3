//! HTTP client module
//!
//! Provides the authenticated JSON client used against the Proxmox API.

mod client;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::{ApiClient, ApiError, CallMethod, DEFAULT_TIMEOUT_SECS};
