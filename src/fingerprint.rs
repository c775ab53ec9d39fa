//! Fingerprint database: favicon hash to technology label.
//!
//! The database is a JSON object keyed by the decimal hash, e.g.
//! `{"116323821": "Spring Boot", "-297069493": "Apache Tomcat"}`. It is loaded
//! once, wrapped in an `Arc`, and only ever read afterwards.

use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use crate::config::UNKNOWN_LABEL;
use crate::error_handling::ConfigError;

/// Read-only hash to label table.
#[derive(Debug, Clone, Default)]
pub struct FingerprintDb {
    entries: HashMap<String, String>,
}

impl FingerprintDb {
    /// Loads the database from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is not a JSON object
    /// whose values are all strings. Nothing is returned on partial success.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let db = Self::from_entries(entries);
        if db.is_empty() {
            warn!(
                "Fingerprint database {} is empty; every hash will be reported as {}",
                path.display(),
                UNKNOWN_LABEL
            );
        } else {
            info!(
                "Loaded {} fingerprints from {}",
                db.len(),
                path.display()
            );
        }
        Ok(db)
    }

    /// Builds a database from already-parsed entries.
    ///
    /// Keys that are not a canonical `i32` rendering can never match a hash;
    /// they are kept but reported.
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let unmatchable = entries
            .keys()
            .filter(|k| k.parse::<i32>().map(|h| h.to_string() != **k).unwrap_or(true))
            .count();
        if unmatchable > 0 {
            warn!(
                "{} fingerprint keys are not 32-bit integer hashes and will never match",
                unmatchable
            );
        }
        Self { entries }
    }

    /// Label for `hash`, or "Unknown" if the database has no entry.
    pub fn lookup(&self, hash: i32) -> &str {
        self.get(hash).unwrap_or(UNKNOWN_LABEL)
    }

    /// Label for `hash`, if known.
    pub fn get(&self, hash: i32) -> Option<&str> {
        self.entries.get(&hash.to_string()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_db(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write fingerprint file");
        file.flush().expect("Failed to flush");
        file
    }

    #[test]
    fn test_lookup_known_hash() {
        let db = FingerprintDb::from_entries(HashMap::from([(
            "12345".to_string(),
            "Foo CMS".to_string(),
        )]));
        assert_eq!(db.lookup(12345), "Foo CMS");
        assert_eq!(db.get(12345), Some("Foo CMS"));
    }

    #[test]
    fn test_lookup_unknown_hash() {
        let db = FingerprintDb::default();
        assert_eq!(db.lookup(12345), "Unknown");
        assert_eq!(db.get(12345), None);
    }

    #[test]
    fn test_lookup_negative_hash() {
        let db = FingerprintDb::from_entries(HashMap::from([(
            "-297069493".to_string(),
            "Apache Tomcat".to_string(),
        )]));
        assert_eq!(db.lookup(-297069493), "Apache Tomcat");
        assert_eq!(db.lookup(297069493), "Unknown");
    }

    #[test]
    fn test_non_canonical_key_never_matches() {
        let db = FingerprintDb::from_entries(HashMap::from([(
            "0123".to_string(),
            "Padded".to_string(),
        )]));
        assert_eq!(db.lookup(123), "Unknown");
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_load_valid_file() {
        let file = write_db(r#"{"116323821": "Spring Boot", "-297069493": "Apache Tomcat"}"#);
        let db = FingerprintDb::load(file.path()).expect("should load");
        assert_eq!(db.len(), 2);
        assert_eq!(db.lookup(116323821), "Spring Boot");
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let result = FingerprintDb::load(&dir.path().join("finger.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let file = write_db(r#"{"12345": "Foo CMS","#);
        let result = FingerprintDb::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_non_string_label() {
        let file = write_db(r#"{"12345": "Foo CMS", "678": 9}"#);
        let result = FingerprintDb::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_empty_object() {
        let file = write_db("{}");
        let db = FingerprintDb::load(file.path()).expect("an empty table is valid");
        assert!(db.is_empty());
        assert_eq!(db.lookup(116323821), "Unknown");
    }
}
