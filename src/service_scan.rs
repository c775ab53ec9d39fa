//! Secondary service scan against hosts whose favicon was fetched.
//!
//! The scan runs an external `nmap` process. Its text output is always kept
//! verbatim; a structured `HostReport` is extracted on a best-effort basis and
//! is simply absent when the output does not look like an nmap report.

use std::future::Future;
use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use regex::Regex;
use serde::Serialize;
use tokio::process::Command;

use crate::config::{SERVICE_SCAN_PROGRAM, SERVICE_SCAN_TIMEOUT_SECS};
use crate::error_handling::ScanError;

/// One line of the port table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub port: u16,
    pub protocol: String,
    pub state: String,
    pub service: Option<String>,
    pub version: Option<String>,
}

/// Structured view of a scan of one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostReport {
    pub host_up: bool,
    pub ports: Vec<PortInfo>,
}

/// Scanner output as embedded in a target's report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceScanOutput {
    pub raw_output: String,
    /// `None` when the output could not be parsed. Not an error.
    pub report: Option<HostReport>,
}

impl ServiceScanOutput {
    pub fn from_raw(raw_output: String) -> Self {
        let report = parse_nmap_output(&raw_output);
        if report.is_none() {
            debug!("Service scan output did not parse as an nmap report");
        }
        Self { raw_output, report }
    }
}

/// Runs a service scan against a bare domain name.
pub trait ServiceScanner: Send + Sync + 'static {
    fn scan(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<ServiceScanOutput, ScanError>> + Send;
}

/// `nmap -sV -Pn <domain>` with a time budget.
#[derive(Debug, Clone)]
pub struct NmapScanner {
    program: String,
    timeout: Duration,
}

impl Default for NmapScanner {
    fn default() -> Self {
        Self::new(
            SERVICE_SCAN_PROGRAM,
            Duration::from_secs(SERVICE_SCAN_TIMEOUT_SECS),
        )
    }
}

impl NmapScanner {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl ServiceScanner for NmapScanner {
    async fn scan(&self, domain: &str) -> Result<ServiceScanOutput, ScanError> {
        if domain.is_empty() || domain.starts_with('-') {
            return Err(ScanError::InvalidHost(domain.to_string()));
        }
        debug!("Running {} -sV -Pn {}", self.program, domain);
        let child = Command::new(&self.program)
            .args(["-sV", "-Pn", domain])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ScanError::NotInstalled(self.program.clone()),
                _ => ScanError::Spawn {
                    program: self.program.clone(),
                    source,
                },
            })?;

        // Dropping the future on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScanError::Timeout {
                program: self.program.clone(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| ScanError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScanError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(ServiceScanOutput::from_raw(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

/// Extracts host status and the port table from nmap's normal output.
///
/// Returns `None` unless the text contains an nmap scan report header.
pub fn parse_nmap_output(output: &str) -> Option<HostReport> {
    if !output.lines().any(|l| l.starts_with("Nmap scan report for")) {
        return None;
    }

    let host_up = output.lines().any(|l| l.starts_with("Host is up"));
    let ports = output.lines().filter_map(parse_port_line).collect();

    Some(HostReport { host_up, ports })
}

// "443/tcp  open   ssl/http nginx 1.18.0 (Ubuntu)"
static PORT_LINE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,5})/(tcp|udp)\s+(\S+)(?:\s+(\S+))?(?:\s+(.+?))?\s*$").ok()
});

fn parse_port_line(line: &str) -> Option<PortInfo> {
    let caps = PORT_LINE.as_ref()?.captures(line)?;
    Some(PortInfo {
        port: caps[1].parse().ok()?,
        protocol: caps[2].to_string(),
        state: caps[3].to_string(),
        service: caps.get(4).map(|m| m.as_str().to_string()),
        version: caps.get(5).map(|m| m.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Starting Nmap 7.94 ( https://nmap.org ) at 2024-01-01 12:00 UTC
Nmap scan report for example.com (93.184.216.34)
Host is up (0.011s latency).
Not shown: 996 filtered tcp ports (no-response)
PORT     STATE  SERVICE  VERSION
22/tcp   open   ssh      OpenSSH 8.9p1 Ubuntu 3ubuntu0.6 (Ubuntu Linux; protocol 2.0)
80/tcp   open   http     nginx 1.18.0 (Ubuntu)
443/tcp  open   ssl/http nginx 1.18.0 (Ubuntu)
8443/tcp closed https-alt

Service detection performed. Please report any incorrect results at https://nmap.org/submit/ .
Nmap done: 1 IP address (1 host up) scanned in 14.52 seconds
";

    #[test]
    fn test_parse_port_table() {
        let report = parse_nmap_output(SAMPLE).expect("should parse");
        assert!(report.host_up);
        assert_eq!(report.ports.len(), 4);

        assert_eq!(report.ports[0].port, 22);
        assert_eq!(report.ports[0].protocol, "tcp");
        assert_eq!(report.ports[0].state, "open");
        assert_eq!(report.ports[0].service.as_deref(), Some("ssh"));
        assert_eq!(
            report.ports[0].version.as_deref(),
            Some("OpenSSH 8.9p1 Ubuntu 3ubuntu0.6 (Ubuntu Linux; protocol 2.0)")
        );

        assert_eq!(report.ports[2].service.as_deref(), Some("ssl/http"));
        assert_eq!(report.ports[3].state, "closed");
        assert_eq!(report.ports[3].version, None);
    }

    #[test]
    fn test_parse_host_down() {
        let output = "Nmap scan report for 10.0.0.1\nNote: Host seems down.\n";
        let report = parse_nmap_output(output).expect("should parse");
        assert!(!report.host_up);
        assert!(report.ports.is_empty());
    }

    #[test]
    fn test_unrecognized_output_is_unparsed_not_error() {
        let output = ServiceScanOutput::from_raw("garbage\n1/xyz nothing".to_string());
        assert_eq!(output.report, None);
        assert_eq!(output.raw_output, "garbage\n1/xyz nothing");
    }

    #[test]
    fn test_port_line_rejects_non_port_rows() {
        assert!(parse_port_line("PORT     STATE  SERVICE  VERSION").is_none());
        assert!(parse_port_line("Nmap done: 1 IP address").is_none());
        assert!(parse_port_line("99999/tcp open x").is_none());
    }

    #[tokio::test]
    async fn test_missing_program_is_not_installed() {
        let scanner = NmapScanner::new("favmap-no-such-scanner", Duration::from_secs(5));
        let result = scanner.scan("example.com").await;
        assert!(matches!(result, Err(ScanError::NotInstalled(_))));
    }

    #[tokio::test]
    async fn test_option_like_host_is_rejected_before_spawn() {
        // The program does not exist, so reaching spawn would yield NotInstalled.
        let scanner = NmapScanner::new("favmap-no-such-scanner", Duration::from_secs(5));
        let result = scanner.scan("--script=http-title").await;
        assert!(matches!(result, Err(ScanError::InvalidHost(h)) if h == "--script=http-title"));
    }

    #[tokio::test]
    #[ignore] // requires nmap and network access
    async fn test_nmap_scan_real_host() {
        let scanner = NmapScanner::default();
        let output = scanner.scan("scanme.nmap.org").await.expect("scan");
        assert!(output.report.is_some());
    }
}
