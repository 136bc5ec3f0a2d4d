//! # Checklist Aggregation
//!
//! Turns the per-requirement results of one section into the auditor-facing
//! [`Checklist`]: summary counts, the critical-issue subset, the subset still
//! awaiting confirmation, and a per-section-code grouping.
//!
//! Aggregation is pure and order-preserving. No result is dropped or
//! deduplicated, and every result lands in exactly one section bucket.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use cjis_core::{CheckResult, CheckStatus};

/// Summary counts over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSummary {
    /// Number of results.
    pub total: usize,
    /// Results with status `compliant`.
    pub compliant: usize,
    /// Results with status `non_compliant`.
    pub non_compliant: usize,
    /// Results with status `missing`.
    pub missing: usize,
    /// Results not yet confirmed by an auditor.
    pub pending_review: usize,
}

/// Results grouped by requirement section code.
///
/// Keys keep first-seen order and serialize as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionGroups(Vec<(String, Vec<CheckResult>)>);

impl SectionGroups {
    fn push(&mut self, result: &CheckResult) {
        let code = &result.requirement.section;
        match self.0.iter_mut().find(|(key, _)| key == code) {
            Some((_, bucket)) => bucket.push(result.clone()),
            None => self.0.push((code.clone(), vec![result.clone()])),
        }
    }

    /// Section codes in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// Results for one section code.
    pub fn get(&self, code: &str) -> Option<&[CheckResult]> {
        self.0
            .iter()
            .find(|(key, _)| key == code)
            .map(|(_, bucket)| bucket.as_slice())
    }

    /// Iterate `(section code, results)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CheckResult])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct section codes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no groups.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SectionGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, results) in &self.0 {
            map.serialize_entry(code, results)?;
        }
        map.end()
    }
}

/// Auditor-facing view over one section's results. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    /// Counts by status and confirmation.
    pub summary: ChecklistSummary,
    /// Critical requirements that are not compliant.
    pub critical_issues: Vec<CheckResult>,
    /// Results awaiting auditor confirmation.
    pub requires_confirmation: Vec<CheckResult>,
    /// Results grouped by requirement section code.
    pub by_section: SectionGroups,
}

/// Aggregate results into a checklist.
pub fn aggregate(results: &[CheckResult]) -> Checklist {
    let mut summary = ChecklistSummary {
        total: results.len(),
        ..ChecklistSummary::default()
    };
    let mut by_section = SectionGroups::default();

    for result in results {
        match result.status {
            CheckStatus::Compliant => summary.compliant += 1,
            CheckStatus::NonCompliant => summary.non_compliant += 1,
            CheckStatus::Missing => summary.missing += 1,
            CheckStatus::PendingReview => {}
        }
        if !result.auditor_confirmed {
            summary.pending_review += 1;
        }
        by_section.push(result);
    }

    Checklist {
        summary,
        critical_issues: results
            .iter()
            .filter(|r| r.is_critical_issue())
            .cloned()
            .collect(),
        requires_confirmation: results
            .iter()
            .filter(|r| !r.auditor_confirmed)
            .cloned()
            .collect(),
        by_section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cjis_core::Requirement;
    use proptest::prelude::*;

    fn result(id: &str, section: &str, critical: bool, status: CheckStatus) -> CheckResult {
        let mut req = Requirement::new(id, section, id, id, &["k"]);
        req.critical = critical;
        CheckResult::new(Arc::new(req), status, 0.5, String::new(), vec![], vec![])
    }

    fn five_results() -> Vec<CheckResult> {
        vec![
            result("a", "5.5", true, CheckStatus::Compliant),
            result("b", "5.2", true, CheckStatus::NonCompliant),
            result("c", "5.5", false, CheckStatus::Missing),
            result("d", "5.2", true, CheckStatus::Compliant),
            result("e", "5.5", true, CheckStatus::NonCompliant),
        ]
    }

    #[test]
    fn summary_counts_by_status() {
        let checklist = aggregate(&five_results());
        assert_eq!(
            checklist.summary,
            ChecklistSummary {
                total: 5,
                compliant: 2,
                non_compliant: 2,
                missing: 1,
                pending_review: 5,
            }
        );
    }

    #[test]
    fn critical_issues_keep_order_and_skip_non_critical() {
        let checklist = aggregate(&five_results());
        let ids: Vec<_> = checklist.critical_issues.iter().map(|r| r.requirement_id()).collect();
        assert_eq!(ids, vec!["b", "e"]);
    }

    #[test]
    fn by_section_uses_first_seen_key_order() {
        let checklist = aggregate(&five_results());
        let keys: Vec<_> = checklist.by_section.keys().collect();
        assert_eq!(keys, vec!["5.5", "5.2"]);
        let ids: Vec<_> = checklist.by_section.get("5.5").unwrap().iter().map(|r| r.requirement_id()).collect();
        assert_eq!(ids, vec!["a", "c", "e"]);
    }

    #[test]
    fn confirmed_results_leave_pending_sets() {
        let mut results = five_results();
        results[0] = results[0].with_confirmation(true, "ok");
        let checklist = aggregate(&results);
        assert_eq!(checklist.summary.pending_review, 4);
        assert_eq!(checklist.requires_confirmation.len(), 4);
        assert!(checklist.requires_confirmation.iter().all(|r| r.requirement_id() != "a"));
    }

    #[test]
    fn empty_input_gives_empty_checklist() {
        let checklist = aggregate(&[]);
        assert_eq!(checklist.summary, ChecklistSummary::default());
        assert!(checklist.by_section.is_empty());
    }

    #[test]
    fn serializes_wire_shape_with_ordered_sections() {
        let json = serde_json::to_string(&aggregate(&five_results())).unwrap();
        assert!(json.starts_with("{\"summary\":{\"total\":5,\"compliant\":2,\"nonCompliant\":2,\"missing\":1,\"pendingReview\":5}"));
        assert!(json.contains("\"criticalIssues\":["));
        assert!(json.contains("\"requiresConfirmation\":["));
        let first = json.find("\"5.5\":").unwrap();
        let second = json.find("\"5.2\":").unwrap();
        assert!(first < second);
    }

    fn arb_results() -> impl Strategy<Value = Vec<CheckResult>> {
        let status = prop_oneof![
            Just(CheckStatus::Compliant),
            Just(CheckStatus::NonCompliant),
            Just(CheckStatus::Missing),
        ];
        proptest::collection::vec((0u8..4, any::<bool>(), status, any::<bool>()), 0..20).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (section, critical, status, confirmed))| {
                        result(&format!("r{i}"), &format!("5.{section}"), critical, status)
                            .with_confirmation(confirmed, "")
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn by_section_is_a_partition(results in arb_results()) {
            let checklist = aggregate(&results);
            let bucketed: usize = checklist.by_section.iter().map(|(_, v)| v.len()).sum();
            prop_assert_eq!(bucketed, results.len());
            for r in &results {
                let hits = checklist
                    .by_section
                    .iter()
                    .filter(|(_, bucket)| bucket.iter().any(|b| b.requirement_id() == r.requirement_id()))
                    .count();
                prop_assert_eq!(hits, 1);
            }
        }

        #[test]
        fn subsets_are_drawn_from_input(results in arb_results()) {
            let checklist = aggregate(&results);
            for r in checklist.critical_issues.iter().chain(&checklist.requires_confirmation) {
                prop_assert!(results.contains(r));
            }
            let counted = checklist.summary.compliant + checklist.summary.non_compliant + checklist.summary.missing;
            prop_assert_eq!(counted, checklist.summary.total);
            prop_assert_eq!(checklist.summary.pending_review, checklist.requires_confirmation.len());
        }
    }
}
