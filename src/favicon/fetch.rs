//! Favicon retrieval.
//!
//! The `FaviconFetcher` trait is the seam between the dispatcher and the
//! network; `HttpFetcher` is the reqwest implementation used by the CLI.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::error_handling::{categorize_reqwest_error, FetchError};
use crate::target::Target;

/// Result of fetching one target. Produced exactly once per target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The full favicon body.
    Success { target: Target, bytes: Vec<u8> },
    /// The classified reason the favicon could not be retrieved.
    Failure { target: Target, error: FetchError },
}

impl FetchOutcome {
    pub fn target(&self) -> &Target {
        match self {
            FetchOutcome::Success { target, .. } | FetchOutcome::Failure { target, .. } => target,
        }
    }
}

/// Retrieves a favicon for a target.
///
/// Implementations must never panic or return early without an outcome: every
/// failure is reported as `FetchOutcome::Failure`.
pub trait FaviconFetcher: Send + Sync + 'static {
    fn fetch(&self, target: &Target) -> impl Future<Output = FetchOutcome> + Send;
}

/// Fetches favicons over HTTP(S) with a fixed timeout and a body size cap.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Arc<reqwest::Client>,
    timeout: Duration,
    max_size: usize,
}

impl HttpFetcher {
    /// Wraps a client built by `initialization::init_client`.
    ///
    /// `timeout` bounds the whole fetch (headers and body) even if the client
    /// itself was built without one.
    pub fn new(client: Arc<reqwest::Client>, timeout: Duration, max_size: usize) -> Self {
        Self {
            client,
            timeout,
            max_size,
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| categorize_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        // Refuse early when the server announces an oversized body
        if let Some(len) = response.content_length() {
            if len > self.max_size as u64 {
                return Err(FetchError::BodyTooLarge {
                    limit: self.max_size,
                });
            }
        }

        let mut stream = response.bytes_stream();
        let mut buf = Vec::with_capacity(self.max_size.min(16 * 1024));

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| categorize_reqwest_error(&e))?;
            if buf.len() + chunk.len() > self.max_size {
                log::debug!(
                    "Favicon exceeds {}KB limit for {} (aborting at {} bytes)",
                    self.max_size / 1024,
                    url,
                    buf.len() + chunk.len()
                );
                return Err(FetchError::BodyTooLarge {
                    limit: self.max_size,
                });
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(buf)
    }
}

impl FaviconFetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> FetchOutcome {
        let url = target.url();
        let result = match tokio::time::timeout(self.timeout, self.fetch_bytes(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(format!(
                "no complete response within {}s",
                self.timeout.as_secs_f32()
            ))),
        };

        match result {
            Ok(bytes) => {
                log::debug!("Fetched {} ({} bytes)", url, bytes.len());
                FetchOutcome::Success {
                    target: target.clone(),
                    bytes,
                }
            }
            Err(error) => {
                log::debug!("Favicon fetch failed for {}: {}", url, error);
                FetchOutcome::Failure {
                    target: target.clone(),
                    error,
                }
            }
        }
    }
}
