//! TCP connect probing

use super::{ProbeOutcome, ServiceDatabase, ServiceNameResolver};
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// A single bounded-time attempt to decide whether a port accepts connections
///
/// Implementations must not fail: any I/O error is reported as a closed port.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, ip: IpAddr, port: u16, timeout: Duration) -> ProbeOutcome;
}

/// Full TCP handshake probe
#[derive(Clone)]
pub struct TcpConnectProber {
    services: Arc<dyn ServiceNameResolver>,
}

impl TcpConnectProber {
    pub fn new(services: Arc<dyn ServiceNameResolver>) -> Self {
        Self { services }
    }
}

impl Default for TcpConnectProber {
    fn default() -> Self {
        Self::new(Arc::new(ServiceDatabase::new()))
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, ip: IpAddr, port: u16, timeout: Duration) -> ProbeOutcome {
        let addr = SocketAddr::new(ip, port);

        // The stream, or the pending connect future on timeout, is dropped
        // before returning, which closes the socket on every path.
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                let service = self
                    .services
                    .name_for_port(port)
                    .unwrap_or_else(|_| "unknown".to_string());
                ProbeOutcome::open(port, service)
            }
            Ok(Err(e)) => {
                log::trace!("{}: connect failed: {}", addr, e);
                ProbeOutcome::closed(port)
            }
            Err(_) => {
                log::trace!("{}: timed out after {:?}", addr, timeout);
                ProbeOutcome::closed(port)
            }
        }
    }
}
