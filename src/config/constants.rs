//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including timeouts, size limits, and fingerprint conventions.

/// Default number of concurrent favicon fetches.
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Per-request favicon fetch timeout in seconds.
///
/// This is the only backpressure mechanism keeping one unresponsive host from
/// holding a worker slot forever, so it applies to the whole request
/// (connect, TLS handshake, headers, and body).
pub const FAVICON_FETCH_TIMEOUT_SECS: u64 = 5;

/// Maximum favicon size in bytes (4MB).
/// Bodies larger than this are abandoned mid-stream to prevent memory exhaustion.
pub const MAX_FAVICON_SIZE: usize = 4 * 1024 * 1024;

/// Maximum input line length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Default fingerprint database location, relative to the working directory.
pub const FINGERPRINT_DB_PATH: &str = "finger.json";

/// Conventional favicon path appended to every target.
pub const FAVICON_PATH: &str = "favicon.ico";

/// Shodan query prefix for favicon hash pivoting.
pub const SHODAN_DORK_PREFIX: &str = "http.favicon.hash:";

/// Label reported for hashes with no fingerprint database entry.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Progress logging interval in seconds.
pub const LOGGING_INTERVAL: u64 = 5;

/// Upper bound on a single secondary service scan.
pub const SERVICE_SCAN_TIMEOUT_SECS: u64 = 300;

/// Maximum service scans running at once.
pub const MAX_CONCURRENT_SERVICE_SCANS: usize = 4;

/// Executable used for the secondary service scan.
pub const SERVICE_SCAN_PROGRAM: &str = "nmap";

/// Default User-Agent string for favicon requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Exit code used when the run is interrupted (128 + SIGINT).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;
