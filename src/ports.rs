//! Port ranges and the default common-ports list

use crate::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ports scanned when no explicit range is requested
pub const COMMON_PORTS: [u16; 20] = [
    21, 22, 23, 25, 53, 80, 110, 111, 135, 139,
    143, 443, 445, 993, 995, 1723, 3306, 3389, 5900, 8080,
];

/// Inclusive port range, always `1 <= start <= end <= 65535`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Build a range from already-parsed bounds
    pub fn new(start: i64, end: i64) -> crate::Result<Self> {
        if start < 1 || end > 65535 || start > end {
            return Err(ScanError::InvalidPortRange("Invalid port range".to_string()));
        }
        Ok(Self {
            start: start as u16,
            end: end as u16,
        })
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports covered by the range
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses `"START-END"` or a single port `"N"`
impl FromStr for PortRange {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || ScanError::InvalidPortRange("Invalid port range format".to_string());
        let (start, end) = match s.trim().split_once('-') {
            Some((start, end)) => (start.trim(), end.trim()),
            None => (s.trim(), s.trim()),
        };
        let start: i64 = start.parse().map_err(|_| format_error())?;
        let end: i64 = end.parse().map_err(|_| format_error())?;
        Self::new(start, end)
    }
}

/// Which ports a scan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortSet {
    /// The canonical [`COMMON_PORTS`] list
    Common,
    Range(PortRange),
}

impl Default for PortSet {
    fn default() -> Self {
        PortSet::Common
    }
}

impl PortSet {
    /// Expand to an ascending list without duplicates
    pub fn to_ports(&self) -> Vec<u16> {
        match self {
            PortSet::Common => {
                let mut ports = COMMON_PORTS.to_vec();
                ports.sort_unstable();
                ports.dedup();
                ports
            }
            PortSet::Range(range) => range.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PortSet::Common => COMMON_PORTS.len(),
            PortSet::Range(range) => range.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PortSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSet::Common => write!(f, "common ports"),
            PortSet::Range(range) => write!(f, "ports {}", range),
        }
    }
}
