//! # Semantic Scoring with Keyword Fallback
//!
//! [`SemanticScorer`] delegates to a [`SemanticBackend`] (for example a
//! language-model service) and falls back to the [`KeywordScorer`] whenever
//! the backend fails, so a result is always produced. The backend is held by
//! the scorer; there is no process-global client.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use cjis_core::{CheckResult, Requirement};

use crate::scorer::{ComplianceScorer, KeywordScorer};

/// Failure reported by a semantic backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    /// No backend is configured or reachable.
    #[error("semantic backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with something that is not a usable verdict.
    #[error("semantic backend returned an invalid verdict: {0}")]
    InvalidVerdict(String),
}

/// A semantic analysis service.
pub trait SemanticBackend: Send + Sync + fmt::Debug {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Analyze one requirement against the document.
    fn analyze(
        &self,
        requirement: &Arc<Requirement>,
        document_text: &str,
    ) -> Result<CheckResult, SemanticError>;
}

/// Backend used when no semantic service is wired in. Always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl SemanticBackend for UnavailableBackend {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn analyze(
        &self,
        _requirement: &Arc<Requirement>,
        _document_text: &str,
    ) -> Result<CheckResult, SemanticError> {
        Err(SemanticError::Unavailable(
            "no semantic analysis backend configured".into(),
        ))
    }
}

/// Scorer that prefers a semantic backend and falls back to keywords.
#[derive(Debug)]
pub struct SemanticScorer<B: SemanticBackend> {
    backend: B,
    fallback: KeywordScorer,
}

impl<B: SemanticBackend> SemanticScorer<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fallback: KeywordScorer::new(),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: SemanticBackend> ComplianceScorer for SemanticScorer<B> {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn score(&self, requirement: &Arc<Requirement>, document_text: &str) -> CheckResult {
        match self.backend.analyze(requirement, document_text) {
            Ok(result) if result.requirement.id == requirement.id => {
                // Backends never decide auditor confirmation.
                CheckResult::new(
                    Arc::clone(requirement),
                    result.status,
                    result.confidence,
                    result.evidence_text,
                    result.issues,
                    result.suggestions,
                )
            }
            Ok(result) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    expected = %requirement.id,
                    got = %result.requirement.id,
                    "semantic backend answered for the wrong requirement, falling back to keyword analysis"
                );
                self.fallback.score(requirement, document_text)
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    requirement = %requirement.id,
                    error = %e,
                    "semantic analysis failed, falling back to keyword analysis"
                );
                self.fallback.score(requirement, document_text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjis_core::CheckStatus;

    fn requirement() -> Arc<Requirement> {
        Arc::new(Requirement::new(
            "5.8.3",
            "5.8",
            "Digital Media Sanitization and Disposal",
            "Sanitize media before disposal.",
            &["sanitize", "media", "disposal"],
        ))
    }

    /// Backend that returns a fixed verdict.
    #[derive(Debug)]
    struct FixedBackend {
        status: CheckStatus,
        requirement_id: Option<String>,
    }

    impl SemanticBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn analyze(
            &self,
            requirement: &Arc<Requirement>,
            _document_text: &str,
        ) -> Result<CheckResult, SemanticError> {
            let req = match &self.requirement_id {
                Some(id) => {
                    let mut other = (**requirement).clone();
                    other.id = id.clone();
                    Arc::new(other)
                }
                None => Arc::clone(requirement),
            };
            let mut result = CheckResult::new(
                req,
                self.status,
                0.95,
                "semantic evidence".into(),
                Vec::new(),
                Vec::new(),
            );
            result.auditor_confirmed = true;
            Ok(result)
        }
    }

    #[test]
    fn unavailable_backend_falls_back_to_keywords() {
        let scorer = SemanticScorer::new(UnavailableBackend);
        let req = requirement();
        let text = "We monitor physical access.";
        assert_eq!(scorer.score(&req, text), KeywordScorer.score(&req, text));
    }

    #[test]
    fn backend_verdict_is_used_when_available() {
        let scorer = SemanticScorer::new(FixedBackend {
            status: CheckStatus::Compliant,
            requirement_id: None,
        });
        let result = scorer.score(&requirement(), "irrelevant");
        assert_eq!(result.status, CheckStatus::Compliant);
        assert_eq!(result.evidence_text, "semantic evidence");
        assert!(!result.auditor_confirmed, "backend cannot pre-confirm findings");
    }

    #[test]
    fn verdict_for_another_requirement_is_discarded() {
        let scorer = SemanticScorer::new(FixedBackend {
            status: CheckStatus::Compliant,
            requirement_id: Some("other".into()),
        });
        let result = scorer.score(&requirement(), "We monitor physical access.");
        assert_eq!(result.status, CheckStatus::Missing);
    }

    #[test]
    fn scorer_names() {
        assert_eq!(SemanticScorer::new(UnavailableBackend).name(), "semantic");
        assert_eq!(KeywordScorer.name(), "keyword");
    }
}
