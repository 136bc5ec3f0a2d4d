//! # Check Results
//!
//! The outcome of scoring one requirement against one document.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::requirement::Requirement;
use crate::status::CheckStatus;

/// Result of checking one requirement against agency policy text.
///
/// Produced by a scorer and otherwise treated as an immutable value.
/// Auditor confirmation is tracked outside the result and overlaid with
/// [`CheckResult::with_confirmation`], which returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// The requirement that was checked.
    pub requirement: Arc<Requirement>,
    /// The outcome.
    pub status: CheckStatus,
    /// Confidence in the outcome, in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Policy sentences used as evidence. Empty when none matched.
    pub evidence_text: String,
    /// Problems found, in order.
    pub issues: Vec<String>,
    /// Remediation suggestions, in order.
    pub suggestions: Vec<String>,
    /// Whether an auditor has confirmed this finding.
    #[serde(default)]
    pub auditor_confirmed: bool,
    /// Free-form auditor notes.
    #[serde(default)]
    pub auditor_notes: String,
}

impl CheckResult {
    /// Build an unconfirmed result.
    pub fn new(
        requirement: Arc<Requirement>,
        status: CheckStatus,
        confidence: f64,
        evidence_text: String,
        issues: Vec<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            requirement,
            status,
            confidence: if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) },
            evidence_text,
            issues,
            suggestions,
            auditor_confirmed: false,
            auditor_notes: String::new(),
        }
    }

    /// Identifier of the checked requirement.
    pub fn requirement_id(&self) -> &str {
        &self.requirement.id
    }

    /// Whether this result is a critical gap: critical requirement, not compliant.
    pub fn is_critical_issue(&self) -> bool {
        self.requirement.critical && self.status != CheckStatus::Compliant
    }

    /// Return a copy carrying the given auditor confirmation state.
    pub fn with_confirmation(&self, confirmed: bool, notes: &str) -> Self {
        Self {
            auditor_confirmed: confirmed,
            auditor_notes: notes.to_string(),
            ..self.clone()
        }
    }
}
