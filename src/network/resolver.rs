//! Hostname resolution

use crate::ScanError;
use async_trait::async_trait;
use std::net::IpAddr;

/// Turns a hostname or address literal into the IP to scan
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve_hostname(&self, name: &str) -> crate::Result<IpAddr>;
}

/// Resolver backed by the operating system
///
/// Prefers an IPv4 address when the name has several, falling back to the
/// first IPv6 one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve_hostname(&self, name: &str) -> crate::Result<IpAddr> {
        if let Ok(ip) = name.parse::<IpAddr>() {
            return Ok(ip);
        }

        let resolution_error = || ScanError::ResolutionError { host: name.to_string() };

        let addrs: Vec<IpAddr> = tokio::net::lookup_host((name, 0))
            .await
            .map_err(|e| {
                log::debug!("lookup of {} failed: {}", name, e);
                resolution_error()
            })?
            .map(|addr| addr.ip())
            .collect();

        addrs
            .iter()
            .find(|ip| ip.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(resolution_error)
    }
}
