//! Output formatting: the JSON wire report and terminal rendering

use crate::network::PortState;
use crate::scanner::ScanResult;
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp layout used for `start_time`
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One open port in a [`ScanReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    pub port: u16,
    pub state: PortState,
    pub service: String,
}

/// Serialized form of a [`ScanResult`], as returned by `POST /api/scan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub target_ip: String,
    /// Seconds
    pub scan_time: f64,
    pub start_time: String,
    pub open_ports: Vec<PortEntry>,
    pub total_open_ports: usize,
}

impl From<&ScanResult> for ScanReport {
    fn from(result: &ScanResult) -> Self {
        Self {
            target: result.target.clone(),
            target_ip: result.target_ip.to_string(),
            scan_time: result.scan_duration.as_secs_f64(),
            start_time: result.started_at.format(START_TIME_FORMAT).to_string(),
            open_ports: result
                .open_ports
                .iter()
                .map(|outcome| PortEntry {
                    port: outcome.port,
                    state: outcome.state(),
                    service: outcome.service.clone(),
                })
                .collect(),
            total_open_ports: result.total_open,
        }
    }
}

/// Error body shared by the CLI's JSON mode and the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl ErrorReport {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Render a result in the requested format
pub fn render(result: &ScanResult, format: OutputFormat) -> crate::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&ScanReport::from(result))
            .map_err(|e| crate::ScanError::UnexpectedError(format!("Failed to encode report: {}", e))),
        OutputFormat::Text => Ok(render_text(result)),
    }
}

/// Human-readable table of open ports
pub fn render_text(result: &ScanResult) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {} ({})",
        "Scan report for".bright_blue(),
        result.target.bright_cyan().bold(),
        result.target_ip
    );
    let _ = writeln!(out, "Started at {}", result.started_at.format(START_TIME_FORMAT));

    if result.open_ports.is_empty() {
        let _ = writeln!(out, "{}", "No open ports found".yellow());
    } else {
        let _ = writeln!(out, "{:<9} {:<6} {}", "PORT", "STATE", "SERVICE");
        for outcome in &result.open_ports {
            let port = format!("{}/tcp", outcome.port);
            let _ = writeln!(
                out,
                "{:<9} {:<6} {}",
                port,
                outcome.state().to_string().green(),
                outcome.service
            );
        }
    }

    let _ = writeln!(
        out,
        "{} open port(s) found in {:.2}s",
        result.total_open.to_string().bright_green().bold(),
        result.scan_duration.as_secs_f64()
    );
    out
}
