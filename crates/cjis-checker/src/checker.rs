//! # Compliance Checker
//!
//! Facade tying the [`Catalog`] to a [`ComplianceScorer`]: looks up a
//! section's requirements and scores each one against the document, in
//! catalog order. Both collaborators are shared read-only, so one checker
//! serves any number of concurrent requests.

use std::sync::Arc;

use cjis_core::{Catalog, CatalogError, CheckResult};

use crate::checklist::{aggregate, Checklist};
use crate::scorer::{ComplianceScorer, KeywordScorer, ScorerMode};
use crate::semantic::{SemanticScorer, UnavailableBackend};

/// Build the scorer selected by configuration.
pub fn build_scorer(mode: ScorerMode) -> Arc<dyn ComplianceScorer> {
    match mode {
        ScorerMode::Keyword => Arc::new(KeywordScorer::new()),
        ScorerMode::Semantic => Arc::new(SemanticScorer::new(UnavailableBackend)),
    }
}

/// Checks agency policy text against catalog sections.
#[derive(Debug, Clone)]
pub struct ComplianceChecker {
    catalog: Arc<Catalog>,
    scorer: Arc<dyn ComplianceScorer>,
}

impl ComplianceChecker {
    /// Create a checker over `catalog` using `scorer`.
    pub fn new(catalog: Arc<Catalog>, scorer: Arc<dyn ComplianceScorer>) -> Self {
        Self { catalog, scorer }
    }

    /// Built-in catalog with the keyword scorer.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(Catalog::builtin()), build_scorer(ScorerMode::Keyword))
    }

    /// The catalog this checker reads from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Name of the active scorer.
    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Score every requirement of `section_name` against `policy_text`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownSection`] if the section is not in the
    /// catalog. No partial result is returned.
    pub fn check_section(
        &self,
        section_name: &str,
        policy_text: &str,
    ) -> Result<Vec<CheckResult>, CatalogError> {
        let requirements = self.catalog.requirements_for_section(section_name)?;
        let results: Vec<CheckResult> = requirements
            .iter()
            .map(|req| self.scorer.score(req, policy_text))
            .collect();

        tracing::info!(
            section = section_name,
            scorer = self.scorer.name(),
            requirements = results.len(),
            "checked policy section"
        );
        Ok(results)
    }

    /// Check a section and aggregate the results into a checklist.
    pub fn checklist(
        &self,
        section_name: &str,
        policy_text: &str,
    ) -> Result<Checklist, CatalogError> {
        self.check_section(section_name, policy_text)
            .map(|results| aggregate(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjis_core::CheckStatus;

    const SAMPLE_POLICY: &str = "
    METRO POLICE DEPARTMENT - AUTHENTICATOR MANAGEMENT POLICY
    Section 4.2: Access Control and Authentication
    All department personnel must use strong passwords containing at least 8 characters.
    Passwords must be changed every 90 days.
    New officers receive temporary login credentials during orientation.
    Default passwords must be changed upon first system login.
    Officers must immediately report lost ID badges to their supervisor.
    Personnel are prohibited from sharing login credentials.
    ";

    #[test]
    fn unknown_section_returns_error_without_results() {
        let checker = ComplianceChecker::with_defaults();
        let err = checker.check_section("nonexistent_section", "text").unwrap_err();
        assert_eq!(err, CatalogError::UnknownSection("nonexistent_section".into()));
        assert!(checker.checklist("nonexistent_section", "text").is_err());
    }

    #[test]
    fn results_follow_catalog_order() {
        let checker = ComplianceChecker::with_defaults();
        let results = checker.check_section("access_control", "").unwrap();
        let expected: Vec<_> = checker
            .catalog()
            .requirements_for_section("access_control")
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect();
        let actual: Vec<_> = results.iter().map(|r| r.requirement.id.clone()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_document_marks_every_requirement_missing() {
        let checker = ComplianceChecker::with_defaults();
        for section in checker.catalog().sections() {
            for result in checker.check_section(section, "").unwrap() {
                assert_eq!(result.status, CheckStatus::Missing);
                assert_eq!(result.confidence, 0.3);
            }
        }
    }

    #[test]
    fn sample_policy_default_authenticators_are_compliant() {
        let checker = ComplianceChecker::with_defaults();
        let results = checker.check_section("authenticator_management", SAMPLE_POLICY).unwrap();
        let change_defaults = results
            .iter()
            .find(|r| r.requirement.id == "5.6.3.2.3")
            .unwrap();
        assert_eq!(change_defaults.status, CheckStatus::Compliant);
        assert_eq!(
            change_defaults.evidence_text,
            "Passwords must be changed every 90 days. \
             New officers receive temporary login credentials during orientation"
        );
    }

    #[test]
    fn checklist_covers_whole_section() {
        let checker = ComplianceChecker::with_defaults();
        let checklist = checker.checklist("authenticator_management", SAMPLE_POLICY).unwrap();
        let section_len = checker
            .catalog()
            .requirements_for_section("authenticator_management")
            .unwrap()
            .len();
        assert_eq!(checklist.summary.total, section_len);
        assert_eq!(checklist.summary.pending_review, section_len);
    }

    #[test]
    fn semantic_mode_without_backend_matches_keyword_mode() {
        let catalog = Arc::new(Catalog::builtin());
        let keyword = ComplianceChecker::new(Arc::clone(&catalog), build_scorer(ScorerMode::Keyword));
        let semantic = ComplianceChecker::new(catalog, build_scorer(ScorerMode::Semantic));
        assert_eq!(semantic.scorer_name(), "semantic");
        assert_eq!(
            keyword.check_section("media_protection", SAMPLE_POLICY).unwrap(),
            semantic.check_section("media_protection", SAMPLE_POLICY).unwrap()
        );
    }
}
