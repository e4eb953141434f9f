//! Network module: single-port probes, service names and host resolution

pub mod probe;
pub mod resolver;
pub mod services;

use serde::{Deserialize, Serialize};

pub use probe::{Prober, TcpConnectProber};
pub use resolver::{HostResolver, SystemResolver};
pub use services::{ServiceDatabase, ServiceNameResolver};

/// Port state enumeration
///
/// Refused, timed-out and unreachable connections all collapse into `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Open,
    Closed,
}

impl std::fmt::Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortState::Open => write!(f, "open"),
            PortState::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of probing a single port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub port: u16,
    pub is_open: bool,
    /// Service name for open ports, empty for closed ones
    pub service: String,
}

impl ProbeOutcome {
    pub fn open(port: u16, service: impl Into<String>) -> Self {
        Self {
            port,
            is_open: true,
            service: service.into(),
        }
    }

    pub fn closed(port: u16) -> Self {
        Self {
            port,
            is_open: false,
            service: String::new(),
        }
    }

    pub fn state(&self) -> PortState {
        if self.is_open {
            PortState::Open
        } else {
            PortState::Closed
        }
    }
}
