//! Result types for a single run.

use std::sync::Arc;

use serde::Serialize;

use crate::config::UNKNOWN_LABEL;
use crate::dork::dorks;
use crate::error_handling::FetchErrorKind;
use crate::fingerprint::FingerprintDb;
use crate::service_scan::ServiceScanOutput;
use crate::target::Target;

/// Targets sharing one favicon hash, in the order their outcomes resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashGroup {
    pub hash: i32,
    #[serde(rename = "urls")]
    pub members: Vec<Target>,
}

/// Fingerprint database verdict for one observed hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FingerprintMatch {
    pub hash: i32,
    pub label: String,
}

impl FingerprintMatch {
    pub fn is_known(&self) -> bool {
        self.label != UNKNOWN_LABEL
    }
}

/// How one target's fetch ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    Fetched { hash: i32 },
    Failed { kind: FetchErrorKind, detail: String },
}

/// Secondary scan result embedded in a target report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceScanRecord {
    Completed(ServiceScanOutput),
    Error(String),
}

/// Per-target record, in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub target: Target,
    #[serde(flatten)]
    pub status: TargetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_scan: Option<ServiceScanRecord>,
}

impl TargetReport {
    pub fn is_fetched(&self) -> bool {
        matches!(self.status, TargetStatus::Fetched { .. })
    }
}

/// Run-level counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_targets: usize,
    pub fetched: usize,
    pub failed: usize,
    pub distinct_hashes: usize,
    pub elapsed_seconds: f64,
}

/// Everything one invocation produced.
///
/// Built once all outcomes have resolved (or the run was interrupted) and
/// handed to the output writers.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub groups: Vec<HashGroup>,
    pub targets: Vec<TargetReport>,
    pub summary: RunSummary,
    /// True when the run stopped early; `targets` then covers only what completed.
    pub interrupted: bool,
    fingerprints: Arc<FingerprintDb>,
    dorks_enabled: bool,
}

impl ScanResult {
    pub fn new(
        groups: Vec<HashGroup>,
        targets: Vec<TargetReport>,
        summary: RunSummary,
        interrupted: bool,
        fingerprints: Arc<FingerprintDb>,
        dorks_enabled: bool,
    ) -> Self {
        Self {
            groups,
            targets,
            summary,
            interrupted,
            fingerprints,
            dorks_enabled,
        }
    }

    /// Label (or "Unknown") for every observed hash, in group order.
    pub fn fingerprint_matches(&self) -> Vec<FingerprintMatch> {
        self.groups
            .iter()
            .map(|g| FingerprintMatch {
                hash: g.hash,
                label: self.fingerprints.lookup(g.hash).to_string(),
            })
            .collect()
    }

    /// Search dorks, when enabled for this run.
    pub fn dorks(&self) -> Option<Vec<String>> {
        self.dorks_enabled.then(|| dorks(&self.groups))
    }

    pub fn group(&self, hash: i32) -> Option<&HashGroup> {
        self.groups.iter().find(|g| g.hash == hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn result(dorks_enabled: bool) -> ScanResult {
        let db = FingerprintDb::from_entries(HashMap::from([(
            "12345".to_string(),
            "Foo CMS".to_string(),
        )]));
        let groups = vec![
            HashGroup {
                hash: 0,
                members: vec![Target::from_base("http://u1.test")],
            },
            HashGroup {
                hash: 12345,
                members: vec![
                    Target::from_base("http://u2.test"),
                    Target::from_base("http://u3.test"),
                ],
            },
        ];
        ScanResult::new(
            groups,
            Vec::new(),
            RunSummary::default(),
            false,
            Arc::new(db),
            dorks_enabled,
        )
    }

    #[test]
    fn test_fingerprint_matches_cover_every_group() {
        let matches = result(false).fingerprint_matches();
        assert_eq!(
            matches,
            vec![
                FingerprintMatch {
                    hash: 0,
                    label: "Unknown".to_string()
                },
                FingerprintMatch {
                    hash: 12345,
                    label: "Foo CMS".to_string()
                },
            ]
        );
        assert!(!matches[0].is_known());
        assert!(matches[1].is_known());
    }

    #[test]
    fn test_dorks_only_when_enabled() {
        assert_eq!(result(false).dorks(), None);
        assert_eq!(
            result(true).dorks(),
            Some(vec!["http.favicon.hash:12345".to_string()])
        );
    }

    #[test]
    fn test_target_report_serializes_flat_status() {
        let report = TargetReport {
            target: Target::from_base("http://a.test"),
            status: TargetStatus::Failed {
                kind: FetchErrorKind::Timeout,
                detail: "request timed out".to_string(),
            },
            service_scan: None,
        };
        let json = serde_json::to_value(&report).expect("serializes");
        assert_eq!(json["target"], "http://a.test/favicon.ico");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "timeout");
        assert!(json.get("service_scan").is_none());
    }
}
