//! Page Watch Agent Contracts
//!
//! Data shared between the extractor, the state store and the poll loop.

mod alert;

pub use alert::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a hex-encoded SHA-256 digest
pub const FINGERPRINT_LEN: usize = 64;

/// Hex digest of the normalized visible text of a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already computed digest
    pub fn new(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Parse a persisted value. Blank content means no fingerprint.
    pub fn from_persisted(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this looks like a digest we produced ourselves
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == FINGERPRINT_LEN
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    /// Leading characters, for log lines
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(12).map(|(i, _)| i).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Poll loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPhase {
    /// No successful fetch yet
    Uninitialized,
    /// Baseline established, ticking
    Monitoring,
}

/// Result of a single steady-state tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Fetched fingerprint matches the persisted one
    Unchanged,

    /// Fingerprint moved and was persisted
    Changed {
        previous: Option<Fingerprint>,
        current: Fingerprint,
    },

    /// Fetch or persist failed; persisted state untouched
    Failed { reason: String },
}

impl TickOutcome {
    pub fn is_change(&self) -> bool {
        matches!(self, TickOutcome::Changed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_persisted_trims() {
        let fp = Fingerprint::from_persisted("  abc123\n").unwrap();
        assert_eq!(fp.as_str(), "abc123");
    }

    #[test]
    fn test_from_persisted_blank_is_absent() {
        assert!(Fingerprint::from_persisted("").is_none());
        assert!(Fingerprint::from_persisted(" \n\t ").is_none());
    }

    #[test]
    fn test_well_formed() {
        let good = Fingerprint::new("a".repeat(FINGERPRINT_LEN));
        assert!(good.is_well_formed());

        assert!(!Fingerprint::new("abc").is_well_formed());
        assert!(!Fingerprint::new("G".repeat(FINGERPRINT_LEN)).is_well_formed());
        assert!(!Fingerprint::new("A".repeat(FINGERPRINT_LEN)).is_well_formed());
    }

    #[test]
    fn test_short() {
        let fp = Fingerprint::new("0123456789abcdef");
        assert_eq!(fp.short(), "0123456789ab");
        assert_eq!(Fingerprint::new("abc").short(), "abc");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let fp = Fingerprint::new("deadbeef");
        assert_eq!(serde_json::to_string(&fp).unwrap(), "\"deadbeef\"");
    }
}
