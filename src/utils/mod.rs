//! Utility functions and helpers

use std::net::IpAddr;
use std::time::Duration;

/// Logging utilities
pub struct Logger;

impl Logger {
    /// Initialize logger with specified level
    ///
    /// `RUST_LOG` still takes precedence for individual modules.
    pub fn init(level: log::LevelFilter) {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp_secs()
            .init();
    }

    /// Map a `-v` count to a level filter
    pub fn level_for_verbosity(verbosity: u8) -> log::LevelFilter {
        match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Log scan start
    pub fn log_scan_start(target: &str, ip: IpAddr, ports: usize, concurrency: usize) {
        log::info!(
            "Starting scan of {} ({}): {} ports, {} concurrent probes",
            target,
            ip,
            ports,
            concurrency
        );
    }

    /// Log scan completion
    pub fn log_scan_complete(duration: Duration, open_ports: usize, total_ports: usize) {
        log::info!(
            "Scan completed in {:.2}s - {}/{} ports open",
            duration.as_secs_f64(),
            open_ports,
            total_ports
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Logger::level_for_verbosity(0), log::LevelFilter::Warn);
        assert_eq!(Logger::level_for_verbosity(2), log::LevelFilter::Debug);
        assert_eq!(Logger::level_for_verbosity(9), log::LevelFilter::Trace);
    }
}
