//! Error type definitions.
//!
//! This module defines the typed errors used throughout the application and the
//! error categories counted in per-run statistics.

use std::path::PathBuf;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Fingerprint database could not be loaded.
///
/// Always fatal: a run never proceeds with a partially loaded table.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The database file could not be read.
    #[error("Failed to read fingerprint database {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The database file is not a JSON object of string labels.
    #[error("Malformed fingerprint database {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a failed favicon fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Network,
    Timeout,
    Other,
}

/// Why a favicon could not be retrieved.
///
/// Every variant is recovered locally as a failed outcome for its target and
/// never aborts the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request exceeded the per-request timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection refused, DNS failure, or host unreachable.
    #[error("connection failed: {0}")]
    Connect(String),

    /// TLS handshake failure. Certificate validity is never checked, so this
    /// only covers protocol-level failures.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The connection failed while streaming the body.
    #[error("body read failed: {0}")]
    Body(String),

    /// The favicon exceeded the configured size cap.
    #[error("favicon exceeds {limit} byte limit")]
    BodyTooLarge { limit: usize },

    /// Anything else (invalid URL, redirect loop, worker failure).
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Coarse kind reported alongside the detail message.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Timeout(_) => FetchErrorKind::Timeout,
            FetchError::Connect(_) | FetchError::Tls(_) | FetchError::Body(_) => {
                FetchErrorKind::Network
            }
            FetchError::HttpStatus(_) | FetchError::BodyTooLarge { .. } | FetchError::Other(_) => {
                FetchErrorKind::Other
            }
        }
    }

    /// Statistics bucket for this failure.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::Timeout(_) => ErrorType::HttpRequestTimeoutError,
            FetchError::Connect(_) => ErrorType::HttpRequestConnectError,
            FetchError::Tls(_) => ErrorType::TlsHandshakeError,
            FetchError::HttpStatus(403) => ErrorType::HttpRequestForbidden,
            FetchError::HttpStatus(404) => ErrorType::HttpRequestNotFound,
            FetchError::HttpStatus(code) if *code >= 500 => ErrorType::HttpRequestServerError,
            FetchError::HttpStatus(_) => ErrorType::HttpRequestStatusError,
            FetchError::Body(_) => ErrorType::HttpRequestBodyError,
            FetchError::BodyTooLarge { .. } => ErrorType::FaviconTooLarge,
            FetchError::Other(_) => ErrorType::HttpRequestOtherError,
        }
    }
}

/// Secondary service scan failure. Recorded in the target's report, never fatal.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The scanner executable is not installed or not on `PATH`.
    #[error("{0} is not installed or not on PATH")]
    NotInstalled(String),

    /// The scanner could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The scanner exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The scanner ran past its time budget and was killed.
    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// The host would be read as a command-line option.
    #[error("refusing to scan host that looks like an option: {0}")]
    InvalidHost(String),

    /// The run was interrupted before the scan finished.
    #[error("scan cancelled")]
    Cancelled,
}

/// Failure categories counted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    TlsHandshakeError,
    HttpRequestForbidden,     // 403
    HttpRequestNotFound,      // 404
    HttpRequestServerError,   // 5xx
    HttpRequestStatusError,   // any other non-2xx
    HttpRequestBodyError,
    FaviconTooLarge,
    HttpRequestOtherError,
    ServiceScanError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::TlsHandshakeError => "TLS handshake error",
            ErrorType::HttpRequestForbidden => "Forbidden (403)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestServerError => "Server error (5xx)",
            ErrorType::HttpRequestStatusError => "HTTP request status error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::FaviconTooLarge => "Favicon too large",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::ServiceScanError => "Service scan error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_fetch_error_kind() {
        assert_eq!(
            FetchError::Timeout("5s".into()).kind(),
            FetchErrorKind::Timeout
        );
        assert_eq!(
            FetchError::Connect("refused".into()).kind(),
            FetchErrorKind::Network
        );
        assert_eq!(
            FetchError::Tls("handshake".into()).kind(),
            FetchErrorKind::Network
        );
        assert_eq!(FetchError::HttpStatus(404).kind(), FetchErrorKind::Other);
        assert_eq!(
            FetchError::BodyTooLarge { limit: 10 }.kind(),
            FetchErrorKind::Other
        );
    }

    #[test]
    fn test_fetch_error_status_buckets() {
        assert_eq!(
            FetchError::HttpStatus(403).error_type(),
            ErrorType::HttpRequestForbidden
        );
        assert_eq!(
            FetchError::HttpStatus(404).error_type(),
            ErrorType::HttpRequestNotFound
        );
        assert_eq!(
            FetchError::HttpStatus(503).error_type(),
            ErrorType::HttpRequestServerError
        );
        assert_eq!(
            FetchError::HttpStatus(410).error_type(),
            ErrorType::HttpRequestStatusError
        );
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::HttpStatus(404).to_string(), "HTTP status 404");
        assert_eq!(
            FetchError::BodyTooLarge { limit: 1024 }.to_string(),
            "favicon exceeds 1024 byte limit"
        );
    }

    #[test]
    fn test_all_error_types_have_string_representation() {
        for error_type in ErrorType::iter() {
            let str_repr = error_type.as_str();
            assert!(
                !str_repr.is_empty(),
                "{:?} should have non-empty string",
                error_type
            );
        }
    }

    #[test]
    fn test_config_error_display_names_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("missing.json"));
    }
}
