//! # Check Status
//!
//! Outcome of checking one requirement against a policy document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The outcome of a single requirement check.
///
/// Serialized in snake_case to match the checklist wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// The policy covers the requirement's keywords with at least one
    /// supporting sentence.
    Compliant,
    /// The policy partially addresses the requirement.
    NonCompliant,
    /// No meaningful evidence was found.
    Missing,
    /// Awaiting auditor review. Never produced by the keyword scorer.
    PendingReview,
}

impl CheckStatus {
    /// Return all statuses in declaration order.
    pub fn all() -> &'static [CheckStatus] {
        &[
            Self::Compliant,
            Self::NonCompliant,
            Self::Missing,
            Self::PendingReview,
        ]
    }

    /// Return the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non_compliant",
            Self::Missing => "missing",
            Self::PendingReview => "pending_review",
        }
    }

    /// Whether this status represents a gap an auditor must act on.
    pub fn is_finding(self) -> bool {
        matches!(self, Self::NonCompliant | Self::Missing)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown check status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case_wire_names() {
        for &status in CheckStatus::all() {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn from_str_accepts_wire_names_only() {
        assert_eq!("non_compliant".parse(), Ok(CheckStatus::NonCompliant));
        assert_eq!("pending_review".parse(), Ok(CheckStatus::PendingReview));
        assert!("NonCompliant".parse::<CheckStatus>().is_err());
    }

    #[test]
    fn only_partial_and_missing_are_findings() {
        assert!(!CheckStatus::Compliant.is_finding());
        assert!(CheckStatus::NonCompliant.is_finding());
        assert!(CheckStatus::Missing.is_finding());
        assert!(!CheckStatus::PendingReview.is_finding());
    }
}
