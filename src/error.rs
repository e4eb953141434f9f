//! Error handling for the tcpsweep scanner
//!
//! Validation and resolution failures short-circuit a scan before any socket
//! is opened. Per-port failures never appear here: a probe that cannot connect
//! is simply reported as closed.

use thiserror::Error;

/// Main error type for scanning operations
#[derive(Debug, Error)]
pub enum ScanError {
    /// Missing target or an uncoercible timeout/thread count
    #[error("{0}")]
    InvalidInput(String),

    /// Malformed or out-of-bounds port range
    #[error("{0}")]
    InvalidPortRange(String),

    /// The target hostname did not resolve to an address
    #[error("Could not resolve hostname '{host}'")]
    ResolutionError { host: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Any other failure while scheduling or aggregating a scan
    #[error("{0}")]
    UnexpectedError(String),
}

impl ScanError {
    /// Errors caused by the caller's input rather than by the scanner
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScanError::InvalidInput(_) | ScanError::InvalidPortRange(_))
    }
}

/// A port has no entry in the service table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no service registered for port {0}")]
pub struct LookupError(pub u16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_names_host() {
        let err = ScanError::ResolutionError { host: "nowhere.invalid".to_string() };
        assert_eq!(err.to_string(), "Could not resolve hostname 'nowhere.invalid'");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_client_errors() {
        assert!(ScanError::InvalidInput("Missing required parameters".into()).is_client_error());
        assert!(ScanError::InvalidPortRange("Invalid port range".into()).is_client_error());
        assert!(!ScanError::UnexpectedError("boom".into()).is_client_error());
    }
}
