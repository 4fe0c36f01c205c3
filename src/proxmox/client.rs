//! Proxmox VE API client
//!
//! Two calls: `POST /access/ticket` for a session ticket, then
//! `GET /cluster/resources` with the ticket as `PVEAuthCookie`.

use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::http::{ApiClient, ApiError, CallMethod};
use crate::models::Resource;

/// Default Proxmox VE API port
pub const DEFAULT_PORT: u16 = 8006;

/// Cookie carrying the session ticket
const AUTH_COOKIE: &str = "PVEAuthCookie";

/// Proxmox API errors
#[derive(Error, Debug)]
pub enum ProxmoxError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    #[error("Unexpected response shape: {0}")]
    InvalidResponse(String),
}

/// Session ticket returned by the authentication endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct Ticket(String);

impl Ticket {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ticket(***)")
    }
}

/// Client for the Proxmox VE JSON API
#[derive(Clone, Debug)]
pub struct ProxmoxClient {
    api: ApiClient,
    base_url: String,
}

impl ProxmoxClient {
    /// Client for `https://{host}:{port}/api2/json`
    pub fn new(host: &str, port: u16, timeout_secs: u64) -> Result<Self, ProxmoxError> {
        let api = ApiClient::with_timeout(timeout_secs)?;
        Ok(Self::with_base_url(api, format!("https://{host}:{port}/api2/json")))
    }

    pub fn with_base_url(api: ApiClient, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate and return the session ticket
    pub async fn login(&self, credentials: &Credentials) -> Result<Ticket, ProxmoxError> {
        let url = self.endpoint("/access/ticket");
        info!("Authenticating as {} against {}", credentials.username, url);

        let form = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self.api.call(&url, &form, CallMethod::Post).await?;

        extract_ticket(&response)
    }

    /// Fetch every cluster resource visible to the session
    pub async fn cluster_resources(&self, ticket: &Ticket) -> Result<Vec<Resource>, ProxmoxError> {
        let url = self.endpoint("/cluster/resources");
        let response = self
            .api
            .call(&url, &[(AUTH_COOKIE, ticket.as_str())], CallMethod::Get)
            .await?;

        extract_resources(response)
    }
}

fn extract_ticket(response: &Value) -> Result<Ticket, ProxmoxError> {
    response
        .pointer("/data/ticket")
        .and_then(Value::as_str)
        .map(Ticket::new)
        .ok_or(ProxmoxError::MissingField("data.ticket"))
}

/// Guest records from `data`; a missing or null `data` is an empty list.
///
/// Only `qemu` and `lxc` entries are decoded, other resource types are
/// skipped untouched.
fn extract_resources(mut response: Value) -> Result<Vec<Resource>, ProxmoxError> {
    let records = match response.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(ProxmoxError::InvalidResponse(
                "'data' is not an array".to_string(),
            ))
        }
    };

    let total = records.len();
    let guests = records
        .into_iter()
        .filter(is_guest_record)
        .map(|record| {
            serde_json::from_value(record).map_err(|e| ProxmoxError::InvalidResponse(e.to_string()))
        })
        .collect::<Result<Vec<Resource>, _>>()?;

    debug!("Kept {} guest records of {}", guests.len(), total);
    Ok(guests)
}

fn is_guest_record(record: &Value) -> bool {
    matches!(
        record.get("type").and_then(Value::as_str),
        Some("qemu") | Some("lxc")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::{json_response, serve};
    use crate::models::ResourceKind;
    use serde_json::json;

    fn credentials() -> Credentials {
        Credentials {
            username: "root@pam".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_default_base_url() {
        let client = ProxmoxClient::new("proxmox0", DEFAULT_PORT, 10).unwrap();
        assert_eq!(client.base_url(), "https://proxmox0:8006/api2/json");
        assert_eq!(
            client.endpoint("/access/ticket"),
            "https://proxmox0:8006/api2/json/access/ticket"
        );
    }

    #[test]
    fn test_ticket_debug_is_redacted() {
        let ticket = Ticket::new("PVE:root@pam:SECRET");
        assert_eq!(format!("{ticket:?}"), "Ticket(***)");
        assert_eq!(ticket.as_str(), "PVE:root@pam:SECRET");
    }

    #[test]
    fn test_extract_ticket() {
        let ticket = extract_ticket(&json!({"data": {"ticket": "abc", "CSRFPreventionToken": "x"}}))
            .unwrap();
        assert_eq!(ticket.as_str(), "abc");

        let err = extract_ticket(&json!({"data": null})).unwrap_err();
        assert!(matches!(err, ProxmoxError::MissingField("data.ticket")));
    }

    #[test]
    fn test_extract_resources() {
        let resources = extract_resources(json!({"data": [
            {"type": "qemu", "name": "web01", "node": "pve1", "tags": "prod"},
            {"type": "node", "node": "pve1"},
            {"type": "lxc", "name": "db01", "node": "pve2"}
        ]}))
        .unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].kind, ResourceKind::Qemu);
        assert_eq!(resources[1].kind, ResourceKind::Lxc);
    }

    #[test]
    fn test_extract_resources_skips_odd_non_guest_records() {
        let resources = extract_resources(json!({"data": [
            {"type": "qemu", "name": "web01", "node": "pve1"},
            {"type": "storage", "name": 7, "node": "pve1"},
            {"type": "node", "node": ["pve1"], "tags": {"x": 1}},
            "not-an-object",
            {"name": "untyped"}
        ]}))
        .unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name.as_deref(), Some("web01"));
    }

    #[test]
    fn test_extract_resources_rejects_malformed_guest() {
        let err = extract_resources(json!({"data": [
            {"type": "lxc", "name": 7, "node": "pve1"}
        ]}))
        .unwrap_err();
        assert!(matches!(err, ProxmoxError::InvalidResponse(_)));
    }

    #[test]
    fn test_extract_resources_missing_data_is_empty() {
        assert!(extract_resources(json!({})).unwrap().is_empty());
        assert!(extract_resources(json!({"data": null})).unwrap().is_empty());
    }

    #[test]
    fn test_extract_resources_rejects_non_array() {
        let err = extract_resources(json!({"data": {"type": "qemu"}})).unwrap_err();
        assert!(matches!(err, ProxmoxError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_login_then_fetch_resources() {
        let (base, mut requests) = serve(vec![
            json_response(200, r#"{"data":{"ticket":"PVE:root@pam:T1","username":"root@pam"}}"#),
            json_response(
                200,
                r#"{"data":[{"id":"lxc/200","type":"lxc","name":"db01","node":"pve2","tags":"db"}]}"#,
            ),
        ])
        .await;
        let client = ProxmoxClient::with_base_url(ApiClient::with_timeout(10).unwrap(), format!("{base}/api2/json/"));

        let ticket = client.login(&credentials()).await.unwrap();
        assert_eq!(ticket.as_str(), "PVE:root@pam:T1");

        let resources = client.cluster_resources(&ticket).await.unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name.as_deref(), Some("db01"));

        let login = requests.recv().await.unwrap();
        assert!(login.starts_with("POST /api2/json/access/ticket "));
        assert!(login.ends_with("username=root%40pam&password=s3cret"));

        let fetch = requests.recv().await.unwrap();
        assert!(fetch.starts_with("GET /api2/json/cluster/resources "));
        assert!(fetch.contains("PVEAuthCookie=PVE:root@pam:T1"));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let (base, _requests) = serve(vec![json_response(401, r#"{"data":null}"#)]).await;
        let client = ProxmoxClient::with_base_url(ApiClient::with_timeout(10).unwrap(), base);

        let err = client.login(&credentials()).await.unwrap_err();
        assert!(matches!(err, ProxmoxError::Api(ApiError::Http { status: 401, .. })));
    }
}
