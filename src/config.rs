//! Configuration module for the tcpsweep scanner

use crate::ports::PortSet;
use crate::ScanError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default per-probe connect timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 1.0;

/// Default number of probes allowed in flight
pub const DEFAULT_THREADS: usize = 100;

/// Default listen address for `tcpsweep serve`
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Validated parameters of a single scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Hostname or IP address as supplied by the caller
    pub target: String,

    /// Ports to probe
    pub ports: PortSet,

    /// Timeout for each connection attempt
    pub timeout: Duration,

    /// Maximum number of probes in flight
    pub max_concurrency: usize,
}

impl ScanConfig {
    /// Create a configuration for `target` with default ports, timeout and concurrency
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ports: PortSet::Common,
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            max_concurrency: DEFAULT_THREADS,
        }
    }

    /// Set the ports to scan
    pub fn with_ports(mut self, ports: PortSet) -> Self {
        self.ports = ports;
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of concurrent probes
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.target.trim().is_empty() {
            return Err(ScanError::InvalidInput("Missing required parameters".to_string()));
        }

        if self.timeout.is_zero() {
            return Err(ScanError::InvalidInput("Timeout must be greater than 0".to_string()));
        }

        if self.max_concurrency == 0 {
            return Err(ScanError::InvalidInput("Thread count must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Defaults loaded from `~/.tcpsweep.toml` or `--config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-probe timeout in seconds when a request omits one
    pub timeout_secs: f64,

    /// Concurrency when a request omits one
    pub threads: usize,

    /// Listen address for the HTTP API
    pub bind: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            threads: DEFAULT_THREADS,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ScanError::ConfigError(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;

        let settings: Settings = toml::from_str(&content)
            .map_err(|e| ScanError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// `~/.tcpsweep.toml`
    pub fn default_path() -> PathBuf {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home_dir.join(".tcpsweep.toml")
    }

    /// Load from an explicit path, or from the default location when it exists
    ///
    /// An explicit path must exist. A broken file at the default location is
    /// reported as an error rather than silently ignored.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    let settings = Self::from_toml_file(&default_path)?;
                    log::info!("Loaded config from {}", default_path.display());
                    Ok(settings)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        let representable = Duration::try_from_secs_f64(self.timeout_secs).is_ok_and(|d| !d.is_zero());
        if !(self.timeout_secs.is_finite() && self.timeout_secs > 0.0 && representable) {
            return Err(ScanError::ConfigError("timeout_secs must be a positive number of seconds".to_string()));
        }
        if self.threads == 0 {
            return Err(ScanError::ConfigError("threads must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Default timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }
}
