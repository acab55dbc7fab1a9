//! Known-malicious fingerprints.
//!
//! Patterns are matched exactly and case-sensitively, so `t` (SQL type) and
//! `T` (T-SQL keyword) stay distinct.

use std::collections::HashSet;
use std::sync::OnceLock;

use super::{Reason, SqliState};

/// One pattern per line, grouped under `#` headings.
const FINGERPRINTS: &str = include_str!("fingerprints.txt");

static FINGERPRINT_BLACKLIST: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// The fingerprint blacklist, built on first access.
pub fn get_blacklist() -> &'static HashSet<&'static str> {
    FINGERPRINT_BLACKLIST.get_or_init(|| {
        FINGERPRINTS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    })
}

/// Check if a fingerprint matches the blacklist
pub fn is_blacklisted(fingerprint: &str) -> bool {
    !fingerprint.is_empty() && get_blacklist().contains(fingerprint)
}

impl SqliState<'_> {
    /// Looks the current fingerprint up in the blacklist.
    pub fn blacklist(&mut self) -> bool {
        if self.fingerprint.is_empty() {
            self.reason = Reason::NoFingerprint;
            return false;
        }
        if !is_blacklisted(self.fingerprint.as_str()) {
            self.reason = Reason::NotBlacklisted;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sqli_patterns() {
        assert!(is_blacklisted("s&sos")); // 1' OR '1'='1
        assert!(is_blacklisted("sc")); // admin'--
        assert!(is_blacklisted("1UEnk")); // 1 UNION SELECT x FROM y
        assert!(is_blacklisted("1&1")); // 1 OR 1=1
        assert!(is_blacklisted("X"));
    }

    #[test]
    fn test_injection_families() {
        let cases = [
            "1&1UE", // 1 AND 1=0 UNION ALL SELECT NULL,NULL
            "s&f(f", // 1' AND ASCII(SUBSTRING((SELECT ...
            "s&(E",  // 1' AND (SELECT ...
            "s;kf(", // '; EXEC xp_cmdshell('dir')--
            "1;Ef(", // 1;SELECT pg_sleep(5)
            "1;E1",
            "sksc",  // 1' WAITFOR DELAY '0:0:5'--
            "s&n;c", // x' AND email IS NULL; --
            "1o(E1", // 1 RLIKE (SELECT 1)
            "1kf(f", // 1 PROCEDURE ANALYSE(EXTRACTVALUE(...
            "s)UE1",
            "1)&(1",
        ];
        for fp in cases {
            assert!(is_blacklisted(fp), "{fp} should be blacklisted");
        }
    }

    #[test]
    fn test_benign_shapes_are_absent() {
        for fp in [
            "", "s", "n", "1", "v", "nn", "ns", "sn", "nsn", "sns", "Un", "U", "s1s1", "1s1s1",
            "n&n", "n&s", "1E1", "E1", "1kn", "nnnnn", "snnnn",
        ] {
            assert!(!is_blacklisted(fp), "{fp} should not be blacklisted");
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(is_blacklisted("s;T"));
        assert!(!is_blacklisted("S;T"));
        assert!(!is_blacklisted("s;t"));
    }

    #[test]
    fn test_table_entries_are_well_formed() {
        assert!(get_blacklist().len() > 1000);
        for fp in get_blacklist() {
            assert!(!fp.is_empty() && fp.len() <= super::super::MAX_TOKENS, "{fp}");
            assert!(
                fp.chars().all(|c| super::super::TokenType::from_char(c).is_some()),
                "{fp} uses a code outside the token alphabet"
            );
        }
    }
}
