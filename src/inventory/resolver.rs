//! Hostname to address lookup

use std::net::{IpAddr, SocketAddr};
use tracing::trace;

use super::InventoryError;

/// Resolves a guest name to the address Ansible should connect to
#[allow(async_fn_in_trait)]
pub trait HostResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, InventoryError>;
}

/// System resolver; prefers an IPv4 address and falls back to IPv6
#[derive(Clone, Copy, Debug, Default)]
pub struct DnsResolver;

impl HostResolver for DnsResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr, InventoryError> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, 0))
            .await
            .map_err(|e| InventoryError::Resolution {
                host: host.to_string(),
                reason: e.to_string(),
            })?
            .collect();

        let addr = pick_address(&addrs).ok_or_else(|| InventoryError::Resolution {
            host: host.to_string(),
            reason: "no addresses returned".to_string(),
        })?;

        trace!("Resolved {} to {}", host, addr);
        Ok(addr)
    }
}

fn pick_address(addrs: &[SocketAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .map(SocketAddr::ip)
}
