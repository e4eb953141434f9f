//! Scanner module: the bounded fan-out and result aggregation

pub mod engine;

use crate::network::ProbeOutcome;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

pub use engine::ScanScheduler;

/// Complete result of one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Target as supplied by the caller
    pub target: String,

    /// Address that was actually probed
    pub target_ip: IpAddr,

    /// Wall-clock time from dispatch to join
    pub scan_duration: Duration,

    /// Local time at dispatch
    pub started_at: DateTime<Local>,

    /// Open ports, strictly ascending
    pub open_ports: Vec<ProbeOutcome>,

    pub total_open: usize,
}

impl ScanResult {
    /// Open port numbers in ascending order
    pub fn port_numbers(&self) -> Vec<u16> {
        self.open_ports.iter().map(|outcome| outcome.port).collect()
    }
}

/// Assemble the final result from unordered probe outcomes
///
/// Closed outcomes are dropped, the rest sorted by port with duplicates
/// removed (the first outcome for a port wins).
pub fn aggregate(
    target: &str,
    target_ip: IpAddr,
    outcomes: Vec<ProbeOutcome>,
    elapsed: Duration,
    started_at: DateTime<Local>,
) -> ScanResult {
    let mut open_ports: Vec<ProbeOutcome> = outcomes
        .into_iter()
        .filter(|outcome| outcome.is_open)
        .collect();
    open_ports.sort_by_key(|outcome| outcome.port);
    open_ports.dedup_by_key(|outcome| outcome.port);

    ScanResult {
        target: target.to_string(),
        target_ip,
        scan_duration: elapsed,
        started_at,
        total_open: open_ports.len(),
        open_ports,
    }
}
