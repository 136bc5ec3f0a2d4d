//! # cjis-checker: Policy Scoring and Checklists
//!
//! Scores agency policy text against the CJIS requirement catalog and
//! shapes the results for auditor review.
//!
//! ## Architecture
//!
//! ```text
//! cjis-core (data)      -->  cjis-checker (evaluation)          -->  callers
//!   Catalog                    ComplianceScorer (keyword|semantic)    cjis-api
//!   Requirement                aggregate() -> Checklist               cjis-cli
//!   CheckResult                ConfirmationStore, FinalReport
//! ```
//!
//! Scoring and aggregation are pure. The only mutable state in this crate is
//! the [`ConfirmationStore`], which callers own.

pub mod checker;
pub mod checklist;
pub mod confirmation;
pub mod report;
pub mod scorer;
pub mod semantic;

pub use checker::{build_scorer, ComplianceChecker};
pub use checklist::{aggregate, Checklist, ChecklistSummary, SectionGroups};
pub use confirmation::{Confirmation, ConfirmationError, ConfirmationStore};
pub use report::{prioritized_recommendations, FinalReport, Priority, Recommendation};
pub use scorer::{ComplianceScorer, KeywordScorer, ScorerMode};
pub use semantic::{SemanticBackend, SemanticError, SemanticScorer, UnavailableBackend};
