//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `favmap` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C handling
//! - Writing the console, per-hash, and JSON reports
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use favmap::config::EXIT_CODE_INTERRUPTED;
use favmap::initialization::{init_crypto_provider, init_logger_with};
use favmap::{output, run_scan, CancellationToken, Config, FingerprintDb, ScanResult};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    if let Err(e) = init_logger_with(config.log_level.clone().into(), config.log_format.clone()) {
        eprintln!("favmap error: {e}");
        process::exit(1);
    }

    init_crypto_provider();

    match run(config).await {
        Ok(result) if result.interrupted => {
            println!("Keyboard Interrupt Encountered");
            process::exit(EXIT_CODE_INTERRUPTED);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("favmap error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(config: Config) -> Result<ScanResult> {
    // Loaded before any network activity; a bad database aborts the run.
    let fingerprints = Arc::new(
        FingerprintDb::load(&config.fingerprints).context("Failed to load fingerprint database")?,
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping");
            signal_cancel.cancel();
        }
    });

    let result = run_scan(&config, fingerprints, cancel).await?;

    output::write_console_report(&mut output::console(), &result)
        .context("Failed to write report to stdout")?;

    if let Some(dir) = config.output.as_deref() {
        output::write_hash_files(dir, &result)?;
    }
    if let Some(path) = config.json.as_deref() {
        output::write_json(path, &result)?;
    }

    Ok(result)
}
