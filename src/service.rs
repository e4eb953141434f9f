//! Boundary-facing scan service: validation, resolution, scan, aggregation

use crate::config::{ScanConfig, Settings};
use crate::network::{HostResolver, Prober, SystemResolver, TcpConnectProber};
use crate::ports::{PortRange, PortSet};
use crate::scanner::{aggregate, ScanResult, ScanScheduler};
use crate::utils::Logger;
use crate::ScanError;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Raw scan parameters as received from a client
///
/// Numeric fields stay untyped so that strings such as `"2"` are accepted the
/// same way numbers are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default, rename = "portRange")]
    pub port_range: Option<Value>,

    #[serde(default)]
    pub timeout: Option<Value>,

    #[serde(default)]
    pub threads: Option<Value>,
}

/// Lifecycle of one `run_scan` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Validating,
    Resolving,
    Scanning,
    Aggregating,
    Done,
    Failed,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanPhase::Validating => "validating",
            ScanPhase::Resolving => "resolving",
            ScanPhase::Scanning => "scanning",
            ScanPhase::Aggregating => "aggregating",
            ScanPhase::Done => "done",
            ScanPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Validates requests and runs scans
///
/// Holds no per-scan state; one instance can serve any number of concurrent
/// calls.
#[derive(Clone)]
pub struct ScanService {
    resolver: Arc<dyn HostResolver>,
    scheduler: ScanScheduler,
    default_timeout: Duration,
    default_threads: usize,
}

impl ScanService {
    /// Service using the system resolver and real TCP probes
    pub fn new(settings: &Settings) -> Self {
        Self::with_components(
            Arc::new(SystemResolver),
            Arc::new(TcpConnectProber::default()),
            settings,
        )
    }

    pub fn with_components(
        resolver: Arc<dyn HostResolver>,
        prober: Arc<dyn Prober>,
        settings: &Settings,
    ) -> Self {
        Self {
            resolver,
            scheduler: ScanScheduler::new(prober),
            default_timeout: settings.timeout(),
            default_threads: settings.threads,
        }
    }

    /// Validate a raw request and run the scan it describes
    pub async fn run_scan(&self, request: ScanRequest) -> crate::Result<ScanResult> {
        log::debug!("scan phase: {}", ScanPhase::Validating);
        let config = self.validate(&request).map_err(|e| {
            log::debug!("scan phase: {} ({})", ScanPhase::Failed, e);
            e
        })?;
        self.execute(config).await
    }

    /// Turn a raw request into a [`ScanConfig`], applying defaults
    pub fn validate(&self, request: &ScanRequest) -> crate::Result<ScanConfig> {
        let target = request
            .target
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .ok_or_else(|| ScanError::InvalidInput("Missing required parameters".to_string()))?;

        let ports = parse_port_range(request.port_range.as_ref())?;

        let timeout = match present(request.timeout.as_ref()) {
            None => self.default_timeout,
            Some(value) => coerce_float(value)
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .filter(|timeout| !timeout.is_zero())
                .ok_or_else(|| ScanError::InvalidInput("Invalid timeout value".to_string()))?,
        };

        let max_concurrency = match present(request.threads.as_ref()) {
            None => self.default_threads,
            Some(value) => coerce_int(value)
                .filter(|threads| *threads > 0)
                .and_then(|threads| usize::try_from(threads).ok())
                .ok_or_else(|| ScanError::InvalidInput("Invalid threads value".to_string()))?,
        };

        let config = ScanConfig::new(target)
            .with_ports(ports)
            .with_timeout(timeout)
            .with_max_concurrency(max_concurrency);
        config.validate()?;
        Ok(config)
    }

    /// Resolve, scan and aggregate an already-validated configuration
    pub async fn execute(&self, config: ScanConfig) -> crate::Result<ScanResult> {
        config.validate()?;

        log::debug!("scan phase: {}", ScanPhase::Resolving);
        let target_ip = match self.resolver.resolve_hostname(&config.target).await {
            Ok(ip) => ip,
            Err(e) => {
                log::debug!("scan phase: {} ({})", ScanPhase::Failed, e);
                return Err(e);
            }
        };

        let ports = config.ports.to_ports();
        Logger::log_scan_start(&config.target, target_ip, ports.len(), config.max_concurrency);

        log::debug!("scan phase: {}", ScanPhase::Scanning);
        let started_at = Local::now();
        let start = Instant::now();
        let outcomes = self
            .scheduler
            .scan(target_ip, &ports, config.timeout, config.max_concurrency)
            .await?;
        let elapsed = start.elapsed();

        log::debug!("scan phase: {}", ScanPhase::Aggregating);
        let result = aggregate(&config.target, target_ip, outcomes, elapsed, started_at);

        Logger::log_scan_complete(elapsed, result.total_open, ports.len());
        log::debug!("scan phase: {}", ScanPhase::Done);
        Ok(result)
    }
}

/// JSON `null` counts as absent
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

/// Absent, `null`, `false` or `[]` selects the common ports
fn parse_port_range(value: Option<&Value>) -> crate::Result<PortSet> {
    let format_error = || ScanError::InvalidPortRange("Invalid port range format".to_string());

    let bounds = match value {
        // Empty or zero-valued input means no range was asked for
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(PortSet::Common),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => return Ok(PortSet::Common),
        Some(Value::String(s)) if s.is_empty() => return Ok(PortSet::Common),
        Some(Value::Object(map)) if map.is_empty() => return Ok(PortSet::Common),
        Some(Value::Array(bounds)) if bounds.is_empty() => return Ok(PortSet::Common),
        Some(Value::Array(bounds)) if bounds.len() == 2 => bounds,
        Some(_) => return Err(format_error()),
    };

    let start = coerce_int(&bounds[0]).ok_or_else(format_error)?;
    let end = coerce_int(&bounds[1]).ok_or_else(format_error)?;
    Ok(PortSet::Range(PortRange::new(start, end)?))
}

/// Integers and integer strings; floats are truncated toward zero
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Numbers and numeric strings
fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
