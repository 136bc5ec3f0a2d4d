//! # Auditor Confirmations
//!
//! Confirmation state lives in a [`ConfirmationStore`] owned by the caller,
//! keyed by analysis id and requirement id. Scored results are never
//! mutated; [`ConfirmationStore::overlay`] returns fresh copies carrying the
//! recorded state.
//!
//! The lock is `parking_lot::RwLock` and is never held across `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use cjis_core::CheckResult;

/// Recorded auditor decision for one finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Whether the auditor confirmed the finding.
    pub confirmed: bool,
    /// Auditor notes.
    pub notes: String,
    /// When the decision was recorded.
    pub updated_at: DateTime<Utc>,
}

/// Confirmation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// The requirement is not part of the analysis being confirmed.
    #[error("requirement {requirement_id} is not part of analysis {analysis_id}")]
    UnknownRequirement {
        /// Analysis the caller addressed.
        analysis_id: Uuid,
        /// Requirement the caller addressed.
        requirement_id: String,
    },
}

/// Thread-safe, cloneable store of auditor confirmations.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationStore {
    entries: Arc<RwLock<HashMap<(Uuid, String), Confirmation>>>,
}

impl ConfirmationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision for `requirement_id` within `analysis_id`.
    ///
    /// `results` is the analysis' result set; the requirement must be in it.
    pub fn confirm(
        &self,
        analysis_id: Uuid,
        results: &[CheckResult],
        requirement_id: &str,
        confirmed: bool,
        notes: &str,
    ) -> Result<Confirmation, ConfirmationError> {
        if !results.iter().any(|r| r.requirement_id() == requirement_id) {
            return Err(ConfirmationError::UnknownRequirement {
                analysis_id,
                requirement_id: requirement_id.to_string(),
            });
        }

        let confirmation = Confirmation {
            confirmed,
            notes: notes.to_string(),
            updated_at: Utc::now(),
        };
        self.entries
            .write()
            .insert((analysis_id, requirement_id.to_string()), confirmation.clone());

        tracing::info!(
            analysis_id = %analysis_id,
            requirement = requirement_id,
            confirmed,
            "recorded auditor confirmation"
        );
        Ok(confirmation)
    }

    /// The recorded decision, if any.
    pub fn get(&self, analysis_id: Uuid, requirement_id: &str) -> Option<Confirmation> {
        self.entries
            .read()
            .get(&(analysis_id, requirement_id.to_string()))
            .cloned()
    }

    /// Copies of `results` with recorded confirmations applied.
    pub fn overlay(&self, analysis_id: Uuid, results: &[CheckResult]) -> Vec<CheckResult> {
        let entries = self.entries.read();
        results
            .iter()
            .map(|r| {
                match entries.get(&(analysis_id, r.requirement_id().to_string())) {
                    Some(c) => r.with_confirmation(c.confirmed, &c.notes),
                    None => r.clone(),
                }
            })
            .collect()
    }

    /// Number of decisions recorded for an analysis.
    pub fn count_for(&self, analysis_id: Uuid) -> usize {
        self.entries
            .read()
            .keys()
            .filter(|(id, _)| *id == analysis_id)
            .count()
    }

    /// Drop every decision recorded for an analysis, returning how many.
    pub fn remove_analysis(&self, analysis_id: Uuid) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(id, _), _| *id != analysis_id);
        before - entries.len()
    }
}
