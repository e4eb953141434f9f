//! tcpsweep - bounded-concurrency TCP connect port scanner
//!
//! A scan resolves the target, fans connection attempts out over a capped
//! number of concurrent probes, and returns the open ports in ascending order
//! together with timing information.

pub mod api;
pub mod config;
pub mod error;
pub mod network;
pub mod output;
pub mod ports;
pub mod scanner;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use config::{ScanConfig, Settings};
pub use error::{LookupError, ScanError};
pub use network::{HostResolver, ProbeOutcome, Prober, ServiceNameResolver};
pub use output::ScanReport;
pub use ports::{PortRange, PortSet, COMMON_PORTS};
pub use scanner::{aggregate, ScanResult, ScanScheduler};
pub use service::{ScanRequest, ScanService};

pub type Result<T> = std::result::Result<T, ScanError>;
