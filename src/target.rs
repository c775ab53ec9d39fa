//! Target normalization.
//!
//! A `Target` is the favicon URL derived from one raw input line. It is
//! immutable once constructed.

use std::fmt;

use log::warn;
use serde::Serialize;

use crate::config::{FAVICON_PATH, MAX_URL_LENGTH};

/// A normalized favicon URL for one input host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Target {
    url: String,
}

impl Target {
    /// Builds a target from a base URL without validation.
    ///
    /// Appends `/favicon.ico` unless already present, without doubling a
    /// trailing slash.
    pub fn from_base(base: &str) -> Self {
        Self {
            url: favicon_url(base),
        }
    }

    /// Parses one raw input line into a target.
    ///
    /// Blank lines and `#` comments yield `None` silently. Lines that are too
    /// long, unparsable, or not http/https are logged and skipped. A line
    /// without a scheme is treated as an https host.
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        if trimmed.len() > MAX_URL_LENGTH {
            warn!(
                "Skipping input exceeding maximum length ({} > {}): {}...",
                trimmed.len(),
                MAX_URL_LENGTH,
                truncate_for_log(trimmed)
            );
            return None;
        }

        // Schemes are case-insensitive; store them lowercased.
        let base = match trimmed.split_once("://") {
            Some((scheme, rest))
                if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
            {
                format!("{}://{rest}", scheme.to_ascii_lowercase())
            }
            Some(_) => {
                warn!("Skipping unsupported scheme for input: {trimmed}");
                return None;
            }
            None => format!("https://{trimmed}"),
        };

        let target = Self::from_base(&base);
        match url::Url::parse(&target.url) {
            Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Some(target),
            _ => {
                warn!("Skipping invalid URL: {trimmed}");
                None
            }
        }
    }

    /// The favicon URL that is fetched.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The target with the favicon path removed, as shown in reports.
    pub fn base(&self) -> &str {
        let suffix_len = FAVICON_PATH.len() + 1;
        if self.url.len() >= suffix_len && self.url.ends_with(FAVICON_PATH) {
            &self.url[..self.url.len() - suffix_len]
        } else {
            &self.url
        }
    }

    /// Host name with scheme, port, and path stripped, for the service scanner.
    ///
    /// `None` for hosts starting with `-`, which a command line would read as
    /// an option.
    pub fn bare_domain(&self) -> Option<String> {
        let parsed = url::Url::parse(&self.url).ok()?;
        let host = parsed.host_str()?.trim_matches(['[', ']']);
        if host.is_empty() || host.starts_with('-') {
            return None;
        }
        Some(host.to_string())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn favicon_url(base: &str) -> String {
    let base = base.trim();
    if base
        .strip_suffix(FAVICON_PATH)
        .is_some_and(|rest| rest.ends_with('/'))
    {
        base.to_string()
    } else if base.ends_with('/') {
        format!("{base}{FAVICON_PATH}")
    } else {
        format!("{base}/{FAVICON_PATH}")
    }
}

fn truncate_for_log(s: &str) -> &str {
    let mut end = 50.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Parses every line of an input list, skipping blanks, comments, and invalid entries.
///
/// Duplicates are kept: each line becomes its own target.
pub fn parse_targets<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Target> {
    lines.into_iter().filter_map(Target::parse).collect()
}
