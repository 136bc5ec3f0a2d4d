//! # Final Audit Report
//!
//! Built after auditor review. Carries only the findings an auditor has
//! confirmed, plus a prioritized list of remediation recommendations
//! covering every gap in the result set.
//!
//! Recommendation order: critical before non-critical, then `missing`
//! before `non_compliant`, then the original result order.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cjis_core::{CheckResult, CheckStatus};

/// Remediation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Minor gap.
    Low,
    /// Partial gap in a critical requirement, or missing non-critical one.
    Medium,
    /// Critical requirement with no evidence.
    High,
}

impl Priority {
    /// Priority of a gap.
    pub fn for_gap(critical: bool, status: CheckStatus) -> Self {
        match (critical, status) {
            (true, CheckStatus::Missing) => Self::High,
            (true, _) | (false, CheckStatus::Missing) => Self::Medium,
            (false, _) => Self::Low,
        }
    }
}

/// One remediation item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Requirement id.
    pub requirement_id: String,
    /// Requirement title.
    pub title: String,
    /// Requirement section code.
    pub section: String,
    /// Status that triggered the recommendation.
    pub status: CheckStatus,
    /// Remediation priority.
    pub priority: Priority,
    /// Suggested actions.
    pub actions: Vec<String>,
    /// Whether an auditor confirmed the underlying finding.
    pub auditor_confirmed: bool,
}

/// Counts for the report header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Results in the analysis.
    pub total: usize,
    /// Results an auditor has confirmed.
    pub confirmed: usize,
    /// Results still awaiting confirmation.
    pub pending: usize,
    /// Confirmed results that are compliant.
    pub confirmed_compliant: usize,
    /// Confirmed results that are gaps.
    pub confirmed_findings: usize,
}

/// Final report over one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalReport {
    /// Catalog section the analysis covered.
    pub section: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Whether every result has been confirmed.
    pub review_complete: bool,
    /// Header counts.
    pub summary: ReportSummary,
    /// Confirmed results only, in original order.
    pub confirmed_checks: Vec<CheckResult>,
    /// Prioritized remediation items.
    pub recommendations: Vec<Recommendation>,
}

impl FinalReport {
    /// Build a report from results with confirmations already applied.
    pub fn build(section: &str, results: &[CheckResult]) -> Self {
        let confirmed_checks: Vec<CheckResult> = results
            .iter()
            .filter(|r| r.auditor_confirmed)
            .cloned()
            .collect();

        let summary = ReportSummary {
            total: results.len(),
            confirmed: confirmed_checks.len(),
            pending: results.len() - confirmed_checks.len(),
            confirmed_compliant: confirmed_checks
                .iter()
                .filter(|r| r.status == CheckStatus::Compliant)
                .count(),
            confirmed_findings: confirmed_checks
                .iter()
                .filter(|r| r.status.is_finding())
                .count(),
        };

        Self {
            section: section.to_string(),
            generated_at: Utc::now(),
            review_complete: summary.pending == 0,
            summary,
            confirmed_checks,
            recommendations: prioritized_recommendations(results),
        }
    }
}

/// Recommendations for every gap, most urgent first.
pub fn prioritized_recommendations(results: &[CheckResult]) -> Vec<Recommendation> {
    let mut gaps: Vec<(usize, &CheckResult)> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.status.is_finding())
        .collect();

    // Stable sort keeps original order within equal keys.
    gaps.sort_by_key(|(index, r)| {
        (
            Reverse(r.requirement.critical),
            r.status != CheckStatus::Missing,
            *index,
        )
    });

    gaps.into_iter()
        .map(|(_, r)| Recommendation {
            requirement_id: r.requirement.id.clone(),
            title: r.requirement.title.clone(),
            section: r.requirement.section.clone(),
            status: r.status,
            priority: Priority::for_gap(r.requirement.critical, r.status),
            actions: r.suggestions.clone(),
            auditor_confirmed: r.auditor_confirmed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cjis_core::Requirement;

    fn result(id: &str, critical: bool, status: CheckStatus) -> CheckResult {
        let mut req = Requirement::new(id, "5.5", id, id, &["k"]);
        req.critical = critical;
        CheckResult::new(
            Arc::new(req),
            status,
            0.5,
            String::new(),
            vec![],
            vec![format!("fix {id}")],
        )
    }

    #[test]
    fn priority_table() {
        assert_eq!(Priority::for_gap(true, CheckStatus::Missing), Priority::High);
        assert_eq!(Priority::for_gap(true, CheckStatus::NonCompliant), Priority::Medium);
        assert_eq!(Priority::for_gap(false, CheckStatus::Missing), Priority::Medium);
        assert_eq!(Priority::for_gap(false, CheckStatus::NonCompliant), Priority::Low);
    }

    #[test]
    fn recommendations_are_ordered_by_urgency() {
        let results = vec![
            result("minor-partial", false, CheckStatus::NonCompliant),
            result("crit-partial", true, CheckStatus::NonCompliant),
            result("ok", true, CheckStatus::Compliant),
            result("minor-missing", false, CheckStatus::Missing),
            result("crit-missing", true, CheckStatus::Missing),
        ];
        let ids: Vec<_> = prioritized_recommendations(&results)
            .into_iter()
            .map(|r| r.requirement_id)
            .collect();
        assert_eq!(
            ids,
            vec!["crit-missing", "crit-partial", "minor-missing", "minor-partial"]
        );
    }

    #[test]
    fn report_keeps_only_confirmed_checks() {
        let results = vec![
            result("a", true, CheckStatus::Compliant).with_confirmation(true, "seen"),
            result("b", true, CheckStatus::Missing).with_confirmation(true, ""),
            result("c", false, CheckStatus::NonCompliant),
        ];
        let report = FinalReport::build("access_control", &results);
        assert_eq!(report.section, "access_control");
        assert!(!report.review_complete);
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 3,
                confirmed: 2,
                pending: 1,
                confirmed_compliant: 1,
                confirmed_findings: 1,
            }
        );
        assert_eq!(report.confirmed_checks.len(), 2);
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.recommendations[0].actions, vec!["fix b"]);
        assert!(report.recommendations[0].auditor_confirmed);
    }

    #[test]
    fn fully_confirmed_review_is_complete() {
        let results = vec![result("a", true, CheckStatus::Compliant).with_confirmation(true, "")];
        assert!(FinalReport::build("s", &results).review_complete);
    }
}
