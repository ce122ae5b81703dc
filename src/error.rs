//! Error types for channel-recon
//!
//! This module provides the failure taxonomy for the library:
//! - `FetchError` — directory API failures, split into recoverable rate
//!   limiting and terminal transport/API failures
//! - `SourceError` — the candidate list could not be loaded
//! - `SinkError` — the tabular artifact could not be written
//! - `NotifyError` — a per-recipient notification failed
//!
//! Each kind stays distinguishable to the caller rather than collapsing into a
//! single generic log line. The top-level runner converts every failure into a
//! log entry plus a degraded continuation (empty set, partial mapping,
//! skip-and-continue); nothing propagates to a top-level handler.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for channel-recon operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for channel-recon
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "page_size")
        key: Option<String>,
    },

    /// Directory fetch failed
    #[error("directory error: {0}")]
    Fetch(#[from] FetchError),

    /// Candidate source could not be loaded
    #[error("candidate source error: {0}")]
    Source(#[from] SourceError),

    /// Tabular artifact could not be persisted
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// Notification could not be delivered
    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures raised by a [`DirectoryFetcher`](crate::directory::DirectoryFetcher)
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote API refused the request until a delay has elapsed
    ///
    /// Recoverable: the reconciliation loop suspends for the server-specified
    /// delay and retries the same cursor. Never surfaced to the caller as a
    /// failure unless the retry ceiling is exhausted.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Server-mandated delay in seconds before the next attempt
        retry_after_secs: u64,
    },

    /// Transport-level failure (connection, timeout, TLS, malformed body)
    ///
    /// Not retried: the loop terminates early and returns its partial result.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered but reported failure (e.g., `ok: false`)
    ///
    /// Not retried: the loop terminates early and returns its partial result.
    #[error("directory API error: {0}")]
    Api(String),
}

/// Failures loading the candidate list
#[derive(Debug, Error)]
pub enum SourceError {
    /// The candidate list file is missing or unreadable
    #[error("cannot read candidate list {}: {reason}", path.display())]
    Unreadable {
        /// Path to the candidate list file
        path: PathBuf,
        /// Underlying I/O failure
        reason: String,
    },
}

/// Failures persisting the tabular artifact
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sheet file could not be opened or written
    #[error("cannot write sheet {}: {reason}", path.display())]
    WriteFailed {
        /// Path to the sheet file
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },
}

/// Failures delivering a notification to one recipient
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure sending the message
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The messaging API answered but reported failure
    #[error("messaging API error: {0}")]
    Api(String),
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display_includes_delay() {
        let err = FetchError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(err.to_string(), "rate limited: retry after 30s");
    }

    #[test]
    fn fetch_error_converts_to_crate_error() {
        let err: Error = FetchError::Api("invalid_cursor".to_string()).into();
        assert!(matches!(err, Error::Fetch(FetchError::Api(_))));
        assert!(err.to_string().contains("invalid_cursor"));
    }

    #[test]
    fn source_error_display_includes_path() {
        let err = SourceError::Unreadable {
            path: PathBuf::from("channel_names.txt"),
            reason: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("channel_names.txt"));
    }
}
