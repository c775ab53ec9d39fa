//! Search engine dorks for favicon hash pivoting.

use crate::config::SHODAN_DORK_PREFIX;
use crate::model::HashGroup;

/// One Shodan query per distinct non-zero hash, in group order.
///
/// Hash 0 is the hash of an empty favicon and matches countless unrelated
/// hosts, so it is never turned into a query.
pub fn dorks(groups: &[HashGroup]) -> Vec<String> {
    groups
        .iter()
        .filter(|g| g.hash != 0)
        .map(|g| dork(g.hash))
        .collect()
}

/// The Shodan query for a single hash.
pub fn dork(hash: i32) -> String {
    format!("{SHODAN_DORK_PREFIX}{hash}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;

    fn group(hash: i32, hosts: &[&str]) -> HashGroup {
        HashGroup {
            hash,
            members: hosts
                .iter()
                .map(|h| Target::from_base(&format!("http://{h}")))
                .collect(),
        }
    }

    #[test]
    fn test_dorks_skip_zero_hash() {
        let groups = vec![group(0, &["u1"]), group(12345, &["u2", "u3"])];
        assert_eq!(dorks(&groups), vec!["http.favicon.hash:12345".to_string()]);
    }

    #[test]
    fn test_dorks_negative_hash() {
        assert_eq!(dork(-297069493), "http.favicon.hash:-297069493");
    }

    #[test]
    fn test_dorks_empty() {
        assert!(dorks(&[]).is_empty());
        assert!(dorks(&[group(0, &["u1"])]).is_empty());
    }
}
