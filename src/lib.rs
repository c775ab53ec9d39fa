//! favmap library: favicon hash based asset mapping
//!
//! Fetches the favicon of every target host concurrently, hashes it the way
//! Shodan does, groups hosts that share a hash, and labels each hash from a
//! fingerprint database of known technologies. Optionally emits Shodan dorks
//! and runs an `nmap` service scan against hosts that answered.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use favmap::{run_scan, CancellationToken, Config, FingerprintDb};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("hosts.txt"),
//!     shodan: true,
//!     ..Default::default()
//! };
//! let fingerprints = Arc::new(FingerprintDb::load(&config.fingerprints)?);
//!
//! let result = run_scan(&config, fingerprints, CancellationToken::new()).await?;
//! for matched in result.fingerprint_matches() {
//!     println!("{}: {}", matched.label, matched.hash);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Call
//! [`initialization::init_crypto_provider`] once before the first scan.

mod aggregate;
pub mod config;
mod dispatch;
mod dork;
mod error_handling;
mod favicon;
mod fingerprint;
pub mod initialization;
mod model;
pub mod output;
mod run;
mod service_scan;
mod target;

// Re-export public API
pub use aggregate::Aggregator;
pub use config::{Config, LogFormat, LogLevel};
pub use dispatch::{dispatch, TargetOutcome};
pub use dork::{dork, dorks};
pub use error_handling::{
    ConfigError, ErrorType, FetchError, FetchErrorKind, InitializationError, ProcessingStats,
    ScanError,
};
pub use favicon::{encode_mime_base64, favicon_hash, FaviconFetcher, FetchOutcome, HttpFetcher};
pub use fingerprint::FingerprintDb;
pub use model::{
    FingerprintMatch, HashGroup, RunSummary, ScanResult, ServiceScanRecord, TargetReport,
    TargetStatus,
};
pub use run::{read_targets, read_targets_from, run_scan, scan_targets, ScanContext};
pub use service_scan::{
    parse_nmap_output, HostReport, NmapScanner, PortInfo, ServiceScanOutput, ServiceScanner,
};
pub use target::{parse_targets, Target};
pub use tokio_util::sync::CancellationToken;
