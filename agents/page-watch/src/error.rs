//! Error types for the Page Watch Agent
//!
//! One enum per seam: fetching the page, the state file, the messaging API
//! and the poll loop itself.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a fingerprint for the monitored page
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("Client error: {0}")]
    Client(String),

    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Page answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body could not be read or decoded
    #[error("Body error: {0}")]
    Body(String),
}

impl FetchError {
    /// Transient failures are worth another try on the next tick
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Body(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Client(_) => false,
        }
    }
}

/// State file failure
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Messaging API failure
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

/// Poll loop failures that end monitoring
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Initial fetch failed: {0}")]
    InitialFetch(#[source] FetchError),

    #[error("Could not store baseline: {0}")]
    Baseline(#[source] StoreError),

    #[error("Monitor has not been initialized")]
    NotInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            status: 503,
            url: "https://example.com".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 from https://example.com");

        let err = NotifyError::Api {
            status: 400,
            message: "chat not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error 400: chat not found");
    }

    #[test]
    fn test_is_transient() {
        assert!(FetchError::Network("reset".to_string()).is_transient());
        assert!(FetchError::Status { status: 502, url: String::new() }.is_transient());
        assert!(FetchError::Status { status: 429, url: String::new() }.is_transient());
        assert!(!FetchError::Status { status: 404, url: String::new() }.is_transient());
        assert!(!FetchError::Client("tls".to_string()).is_transient());
    }

    #[test]
    fn test_monitor_error_wraps_source() {
        let err = MonitorError::InitialFetch(FetchError::Network("refused".to_string()));
        assert_eq!(err.to_string(), "Initial fetch failed: Network error: refused");
        assert!(std::error::Error::source(&err).is_some());
    }
}
