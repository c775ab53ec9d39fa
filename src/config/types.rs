//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_CONCURRENCY, DEFAULT_USER_AGENT, FAVICON_FETCH_TIMEOUT_SECS, FINGERPRINT_DB_PATH,
    MAX_FAVICON_SIZE,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Run configuration.
///
/// Parsed from the command line by the binary, or built directly by library
/// users via `Default` and struct update syntax.
///
/// # Examples
///
/// ```no_run
/// use favmap::Config;
///
/// let config = Config {
///     target: Some("https://example.com".to_string()),
///     shodan: true,
///     ..Default::default()
/// };
/// ```
///
/// ```bash
/// # Hash every host listed on stdin and print Shodan dorks
/// cat hosts.txt | favmap --shodan
///
/// # Single host, with a service scan and a JSON report
/// favmap --target https://example.com --json report.json
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "favmap",
    version,
    about = "Favicon hash based asset mapper: groups hosts by favicon hash and identifies known technologies.",
    group(ArgGroup::new("report_destination").args(["output", "json"]).multiple(true))
)]
pub struct Config {
    /// File with one host or base URL per line ("-" reads stdin)
    #[arg(long, value_parser, default_value = "-")]
    pub file: PathBuf,

    /// Fingerprint a single target instead of reading a list
    ///
    /// A secondary service scan is always run for a single target. Requires
    /// `--output` or `--json`.
    #[arg(long, requires = "report_destination")]
    pub target: Option<String>,

    /// Directory to write one `<hash>.txt` file per favicon hash
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the full result as a JSON document to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Print Shodan dorks for every non-zero hash
    #[arg(long)]
    pub shodan: bool,

    /// Run a secondary service scan against every host whose favicon was fetched
    #[arg(long)]
    pub service_scan: bool,

    /// Fingerprint database (JSON object mapping hash to technology label)
    #[arg(long, value_parser, default_value = FINGERPRINT_DB_PATH)]
    pub fingerprints: PathBuf,

    /// Maximum concurrent favicon fetches
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = FAVICON_FETCH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Largest favicon body accepted, in bytes
    #[arg(long, default_value_t = MAX_FAVICON_SIZE)]
    pub max_favicon_bytes: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    /// Whether a service scan should run for fetched targets.
    pub fn service_scan_enabled(&self) -> bool {
        self.service_scan || self.target.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("-"),
            target: None,
            output: None,
            json: None,
            shodan: false,
            service_scan: false,
            fingerprints: PathBuf::from(FINGERPRINT_DB_PATH),
            max_concurrency: DEFAULT_CONCURRENCY,
            timeout_seconds: FAVICON_FETCH_TIMEOUT_SECS,
            max_favicon_bytes: MAX_FAVICON_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 20);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.file, PathBuf::from("-"));
        assert_eq!(config.fingerprints, PathBuf::from("finger.json"));
        assert!(!config.shodan);
        assert!(!config.service_scan_enabled());
    }

    #[test]
    fn test_parse_defaults_match_default_impl() {
        let parsed = Config::try_parse_from(["favmap"]).expect("Should parse with no args");
        let default = Config::default();
        assert_eq!(parsed.file, default.file);
        assert_eq!(parsed.max_concurrency, default.max_concurrency);
        assert_eq!(parsed.timeout_seconds, default.timeout_seconds);
        assert_eq!(parsed.max_favicon_bytes, default.max_favicon_bytes);
        assert_eq!(parsed.user_agent, default.user_agent);
        assert_eq!(parsed.fingerprints, default.fingerprints);
    }

    #[test]
    fn test_parse_output_and_shodan() {
        let parsed = Config::try_parse_from(["favmap", "-o", "out", "--shodan"])
            .expect("Should parse output and shodan flags");
        assert_eq!(parsed.output, Some(PathBuf::from("out")));
        assert!(parsed.shodan);
    }

    #[test]
    fn test_single_target_enables_service_scan() {
        let parsed =
            Config::try_parse_from(["favmap", "--target", "https://example.com", "-o", "out"])
                .expect("Should parse target");
        assert_eq!(parsed.target.as_deref(), Some("https://example.com"));
        assert!(parsed.service_scan_enabled());
    }

    #[test]
    fn test_single_target_requires_report_destination() {
        let result = Config::try_parse_from(["favmap", "--target", "https://example.com"]);
        assert!(result.is_err());
        let parsed = Config::try_parse_from([
            "favmap",
            "--target",
            "https://example.com",
            "--json",
            "report.json",
        ])
        .expect("--json satisfies the requirement");
        assert!(parsed.output.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_log_level() {
        let result = Config::try_parse_from(["favmap", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
