//! Report writers: console lines, per-hash text files, and a JSON document.
//!
//! The console format mirrors what favicon mappers traditionally print, so
//! existing grep pipelines keep working:
//!
//! ```text
//! Fetched https://a.example
//! Not Fetched https://b.example
//! Hash: 116323821
//! ^^^https://a.example
//! Spring Boot: 116323821
//! [Shodan Dorks]
//! [DORK] http.favicon.hash:116323821
//! ```

use std::io::{self, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::dispatch::TargetOutcome;
use crate::model::{FingerprintMatch, HashGroup, RunSummary, ScanResult, TargetReport};

/// Writer that treats a closed downstream pipe (`favmap | head`) as success.
pub struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

/// Standard output, tolerant of a closed pipe.
pub fn console() -> IgnoreBrokenPipe<io::Stdout> {
    IgnoreBrokenPipe::new(io::stdout())
}

/// "Fetched <base>" or "Not Fetched <base>" for one resolved target.
pub fn write_outcome_line<W: Write>(w: &mut W, outcome: &TargetOutcome) -> io::Result<()> {
    if outcome.is_success() {
        writeln!(w, "Fetched {}", outcome.target.base())
    } else {
        writeln!(w, "Not Fetched {}", outcome.target.base())
    }
}

/// One "Hash: <h>" header per group followed by a "^^^<base>" line per member.
pub fn write_groups<W: Write>(w: &mut W, groups: &[HashGroup]) -> io::Result<()> {
    for group in groups {
        writeln!(w, "Hash: {}", group.hash)?;
        for member in &group.members {
            writeln!(w, "^^^{}", member.base())?;
        }
    }
    Ok(())
}

/// Known fingerprint labels, then the dork section when enabled.
pub fn write_matches<W: Write>(w: &mut W, result: &ScanResult) -> io::Result<()> {
    for matched in result.fingerprint_matches().iter().filter(|m| m.is_known()) {
        writeln!(w, "{}: {}", matched.label, matched.hash)?;
    }

    if let Some(dorks) = result.dorks() {
        writeln!(w, "[Shodan Dorks]")?;
        for dork in dorks {
            writeln!(w, "[DORK] {dork}")?;
        }
    }
    Ok(())
}

/// Full end-of-run console report: groups, labels, dorks.
pub fn write_console_report<W: Write>(w: &mut W, result: &ScanResult) -> io::Result<()> {
    write_groups(w, &result.groups)?;
    write_matches(w, result)?;
    w.flush()
}

/// Writes `<dir>/<hash>.txt` for every group, one member URL per line.
///
/// Creates `dir` if needed and overwrites existing files. Returns the number
/// of files written.
pub fn write_hash_files(dir: &Path, result: &ScanResult) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    for group in &result.groups {
        let path = dir.join(format!("{}.txt", group.hash));
        let mut body = group
            .members
            .iter()
            .map(|t| t.url())
            .collect::<Vec<_>>()
            .join("\n");
        body.push('\n');
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    log::info!(
        "Wrote {} hash file{} to {}",
        result.groups.len(),
        if result.groups.len() == 1 { "" } else { "s" },
        dir.display()
    );
    Ok(result.groups.len())
}

/// Serialized shape of a whole run.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    pub generated_at: String,
    pub version: &'static str,
    pub interrupted: bool,
    pub fingerprints: &'a [HashGroup],
    pub labels: Vec<FingerprintMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dorks: Option<Vec<String>>,
    pub targets: &'a [TargetReport],
    pub summary: &'a RunSummary,
}

impl<'a> ScanReport<'a> {
    pub fn new(result: &'a ScanResult) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            interrupted: result.interrupted,
            fingerprints: &result.groups,
            labels: result.fingerprint_matches(),
            dorks: result.dorks(),
            targets: &result.targets,
            summary: &result.summary,
        }
    }
}

/// Writes the run as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, result: &ScanResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create JSON report {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ScanReport::new(result))
        .context("Failed to serialize scan result")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    log::info!("Wrote JSON report to {}", path.display());
    Ok(())
}
