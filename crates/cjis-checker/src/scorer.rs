//! # Coverage Scoring
//!
//! Defines the [`ComplianceScorer`] trait and the [`KeywordScorer`], the
//! authoritative scoring path. The keyword scorer is a substring/coverage
//! heuristic: it has no recall or precision guarantees and will misclassify
//! paraphrased policy language.
//!
//! ## Algorithm
//!
//! 1. Split the document on `'.'` only. There is no abbreviation handling,
//!    so `"U.S. Department"` splits into fragments.
//! 2. A sentence is relevant if it contains any keyword, case-insensitively.
//! 3. Evidence is the first two relevant sentences joined with `". "`.
//! 4. Coverage is the fraction of keywords found anywhere in the document.
//! 5. Status and confidence follow from coverage and the relevant-sentence
//!    count, in the priority order of [`KeywordScorer::decide`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use cjis_core::{CheckResult, CheckStatus, Requirement};

/// Coverage at or above which a requirement with evidence is compliant.
pub const COMPLIANT_COVERAGE: f64 = 0.7;

/// Coverage at or above which a requirement is partially addressed.
pub const PARTIAL_COVERAGE: f64 = 0.3;

/// Upper bound on confidence for a compliant keyword match.
pub const MAX_KEYWORD_CONFIDENCE: f64 = 0.85;

/// Confidence assigned to a partial match.
pub const PARTIAL_CONFIDENCE: f64 = 0.6;

/// Confidence assigned when no evidence was found.
pub const MISSING_CONFIDENCE: f64 = 0.3;

/// Maximum number of relevant sentences quoted as evidence.
const EVIDENCE_SENTENCES: usize = 2;

/// Issue recorded for a partial match.
pub const PARTIAL_ISSUE: &str = "Partially addresses requirement but missing key elements";

/// Issue recorded when nothing matched.
pub const MISSING_ISSUE: &str = "No evidence found for this requirement";

/// A strategy that scores one requirement against one document.
///
/// Implementations must be total: every `(requirement, text)` pair yields a
/// result, and identical inputs yield identical results.
pub trait ComplianceScorer: Send + Sync + fmt::Debug {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Score `requirement` against the full document text.
    fn score(&self, requirement: &Arc<Requirement>, document_text: &str) -> CheckResult;
}

/// Which scorer a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerMode {
    /// Keyword coverage only.
    #[default]
    Keyword,
    /// Semantic backend with keyword fallback.
    Semantic,
}

impl ScorerMode {
    /// Configuration name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for ScorerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "semantic" => Ok(Self::Semantic),
            other => Err(format!("unknown scorer mode: {other} (expected keyword or semantic)")),
        }
    }
}

/// Outcome of the coverage decision, before it is turned into a result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Derived status.
    pub status: CheckStatus,
    /// Derived confidence.
    pub confidence: f64,
}

/// Keyword-coverage scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordScorer;

impl KeywordScorer {
    /// Create a keyword scorer.
    pub fn new() -> Self {
        Self
    }

    /// Map coverage and relevant-sentence count to status and confidence.
    ///
    /// Evaluated in priority order: compliant, then partial, then missing.
    pub fn decide(coverage: f64, relevant_sentences: usize) -> Decision {
        if coverage >= COMPLIANT_COVERAGE && relevant_sentences > 0 {
            Decision {
                status: CheckStatus::Compliant,
                confidence: coverage.min(MAX_KEYWORD_CONFIDENCE),
            }
        } else if coverage >= PARTIAL_COVERAGE {
            Decision {
                status: CheckStatus::NonCompliant,
                confidence: PARTIAL_CONFIDENCE,
            }
        } else {
            Decision {
                status: CheckStatus::Missing,
                confidence: MISSING_CONFIDENCE,
            }
        }
    }
}

impl ComplianceScorer for KeywordScorer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn score(&self, requirement: &Arc<Requirement>, document_text: &str) -> CheckResult {
        let keywords = lowered_keywords(requirement);
        let relevant = relevant_sentences(document_text, &keywords);
        let evidence_text = relevant
            .iter()
            .take(EVIDENCE_SENTENCES)
            .copied()
            .collect::<Vec<_>>()
            .join(". ");
        let coverage = coverage_of(&keywords, document_text);
        let decision = Self::decide(coverage, relevant.len());

        let (issues, suggestions) = match decision.status {
            CheckStatus::NonCompliant => (
                vec![PARTIAL_ISSUE.to_string()],
                vec![format!(
                    "Ensure policy explicitly addresses: {}",
                    requirement.requirement_text
                )],
            ),
            CheckStatus::Missing => (
                vec![MISSING_ISSUE.to_string()],
                vec![format!("Add policy section covering: {}", requirement.title)],
            ),
            CheckStatus::Compliant | CheckStatus::PendingReview => (Vec::new(), Vec::new()),
        };

        tracing::debug!(
            requirement = %requirement.id,
            coverage,
            relevant_sentences = relevant.len(),
            status = %decision.status,
            "scored requirement"
        );

        CheckResult::new(
            Arc::clone(requirement),
            decision.status,
            decision.confidence,
            evidence_text,
            issues,
            suggestions,
        )
    }
}

fn lowered_keywords(requirement: &Requirement) -> Vec<String> {
    requirement.keywords.iter().map(|k| k.to_lowercase()).collect()
}

/// Split text into candidate sentences on `'.'`, keeping empty fragments.
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split('.')
}

/// Trimmed sentences that contain at least one of the (lowercased) keywords.
pub fn relevant_sentences<'a>(text: &'a str, lowered_keywords: &[String]) -> Vec<&'a str> {
    split_sentences(text)
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            lowered_keywords.iter().any(|k| lowered.contains(k.as_str()))
        })
        .map(str::trim)
        .collect()
}

/// Fraction of keywords present anywhere in `text`, case-insensitively.
///
/// Returns `0.0` when there are no keywords.
pub fn keyword_coverage(requirement: &Requirement, text: &str) -> f64 {
    coverage_of(&lowered_keywords(requirement), text)
}

fn coverage_of(lowered_keywords: &[String], text: &str) -> f64 {
    if lowered_keywords.is_empty() {
        return 0.0;
    }
    let lowered_text = text.to_lowercase();
    let matches = lowered_keywords
        .iter()
        .filter(|k| lowered_text.contains(k.as_str()))
        .count();
    matches as f64 / lowered_keywords.len() as f64
}
