//! Target list input.
//!
//! Targets come from `--target`, a file, or stdin (`--file -`). The whole
//! list is read before dispatch starts.

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::target::Target;

/// Reads and normalizes every target the configuration points at.
///
/// # Errors
///
/// Returns an error if the input file cannot be opened, or if `--target` is
/// given but is not a usable URL.
pub async fn read_targets(config: &Config) -> Result<Vec<Target>> {
    if let Some(single) = config.target.as_deref() {
        let target = Target::parse(single)
            .with_context(|| format!("Invalid target: {single}"))?;
        info!("Single target mode: {}", target);
        return Ok(vec![target]);
    }

    let targets = if config.file.as_os_str() == "-" {
        info!("Reading targets from stdin");
        read_targets_from(BufReader::new(tokio::io::stdin())).await
    } else {
        let file = tokio::fs::File::open(&config.file)
            .await
            .with_context(|| format!("Failed to open input file {}", config.file.display()))?;
        read_targets_from(BufReader::new(file)).await
    };

    info!("Total targets: {}", targets.len());
    Ok(targets)
}

/// Parses every line of `reader` into targets.
///
/// A read error (e.g. invalid UTF-8) skips the offending line and keeps going.
pub async fn read_targets_from<R: AsyncBufRead + Unpin>(reader: R) -> Vec<Target> {
    let mut lines = reader.lines();
    let mut targets = Vec::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => targets.extend(Target::parse(&line)),
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                if e.kind() != std::io::ErrorKind::InvalidData {
                    break;
                }
            }
        }
    }
    targets
}
