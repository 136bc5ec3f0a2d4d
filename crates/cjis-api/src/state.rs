//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState holds:
//! - **Checker**: catalog plus the configured scorer, immutable after startup
//! - **Analyses**: scored result sets, keyed by analysis id
//! - **Confirmations**: auditor decisions, kept apart from the scored results
//!
//! Everything is in memory; a restart loses analyses and confirmations.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use cjis_checker::{build_scorer, ComplianceChecker, ConfirmationStore, ScorerMode};
use cjis_core::{Catalog, CheckResult, CjisError};

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot::RwLock` and is never held across `.await`.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Retrieve a record by ID.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// List all records.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Remove a record by ID.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Insert a record, then evict the records with the smallest `key`
    /// until at most `cap` remain. Returns the evicted records.
    ///
    /// Insert and eviction happen under one write lock.
    pub fn insert_bounded<K: Ord>(
        &self,
        id: Uuid,
        value: T,
        cap: usize,
        key: impl Fn(&T) -> K,
    ) -> Vec<T> {
        let mut data = self.data.write();
        data.insert(id, value);

        let excess = data.len().saturating_sub(cap);
        if excess == 0 {
            return Vec::new();
        }
        let mut by_age: Vec<(K, Uuid)> = data.iter().map(|(id, v)| (key(v), *id)).collect();
        by_age.sort();
        by_age
            .into_iter()
            .take(excess)
            .filter_map(|(_, id)| data.remove(&id))
            .collect()
    }

    /// Return the number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Records ------------------------------------------------------------------

/// A scored policy document awaiting auditor review.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    /// Analysis id.
    pub id: Uuid,
    /// Catalog section the document was checked against.
    pub section: String,
    /// Hex SHA-256 of the analyzed text.
    pub document_digest: String,
    /// Scorer that produced the results.
    pub scorer: &'static str,
    /// When the analysis ran.
    pub created_at: DateTime<Utc>,
    /// Scored results as produced, without confirmations.
    pub results: Arc<Vec<CheckResult>>,
}

impl AnalysisRecord {
    /// Total order by age: creation time, then id.
    pub fn age_key(&self) -> (DateTime<Utc>, Uuid) {
        (self.created_at, self.id)
    }
}

// -- Configuration ------------------------------------------------------------

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default number of stored analyses kept in memory.
pub const DEFAULT_MAX_ANALYSES: usize = 1000;

/// Configuration errors raised while reading the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Parse failure.
        reason: String,
    },

    /// The catalog file could not be loaded.
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CjisError),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token. `None` disables authentication.
    pub auth_token: Option<String>,
    /// Which scorer evaluates requirements.
    pub scorer: ScorerMode,
    /// Optional YAML catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
    /// Stored analyses kept before the oldest is evicted.
    pub max_analyses: usize,
    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("scorer", &self.scorer)
            .field("catalog_path", &self.catalog_path)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("max_analyses", &self.max_analyses)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auth_token: None,
            scorer: ScorerMode::default(),
            catalog_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_analyses: DEFAULT_MAX_ANALYSES,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unset or blank variables take
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get("PORT") {
            config.port = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        config.auth_token = get("AUTH_TOKEN");

        if let Some(raw) = get("CJIS_SCORER") {
            config.scorer = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                var: "CJIS_SCORER",
                value: raw.clone(),
                reason,
            })?;
        }

        config.catalog_path = get("CJIS_CATALOG_PATH").map(PathBuf::from);

        if let Some(raw) = get("MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = parse_positive("MAX_UPLOAD_BYTES", raw)?;
        }

        if let Some(raw) = get("CJIS_MAX_ANALYSES") {
            config.max_analyses = parse_positive("CJIS_MAX_ANALYSES", raw)?;
        }

        if let Some(raw) = get("LOG_FORMAT") {
            config.log_format = match raw.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" | "pretty" => LogFormat::Text,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "LOG_FORMAT",
                        value: raw,
                        reason: "expected one of: text, json".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    /// Load the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => Ok(Catalog::from_yaml_file(path)?),
            None => Ok(Catalog::builtin()),
        }
    }
}

fn parse_positive(var: &'static str, raw: String) -> Result<usize, ConfigError> {
    let n: usize = raw
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        })?;
    if n == 0 {
        return Err(ConfigError::InvalidValue {
            var,
            value: raw,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(n)
}

// -- Application State --------------------------------------------------------

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub config: AppConfig,
    /// Catalog and scorer.
    pub checker: Arc<ComplianceChecker>,
    /// Stored analyses.
    pub analyses: Store<AnalysisRecord>,
    /// Auditor decisions, keyed by analysis and requirement.
    pub confirmations: ConfirmationStore,
}

impl AppState {
    /// State with the default configuration and built-in catalog.
    pub fn new() -> Self {
        Self::with_checker(AppConfig::default(), ComplianceChecker::with_defaults())
    }

    /// State for `config`, loading the catalog it names.
    pub fn with_config(config: AppConfig) -> Result<Self, ConfigError> {
        let catalog = config.load_catalog()?;
        let checker = ComplianceChecker::new(Arc::new(catalog), build_scorer(config.scorer));
        Ok(Self::with_checker(config, checker))
    }

    /// State around an already-built checker.
    pub fn with_checker(config: AppConfig, checker: ComplianceChecker) -> Self {
        Self {
            config,
            checker: Arc::new(checker),
            analyses: Store::new(),
            confirmations: ConfirmationStore::new(),
        }
    }

    /// Store `record`, evicting the oldest analyses (and their
    /// confirmations) beyond `max_analyses`.
    pub fn store_analysis(&self, record: AnalysisRecord) {
        let evicted = self.analyses.insert_bounded(
            record.id,
            record,
            self.config.max_analyses,
            AnalysisRecord::age_key,
        );
        for old in evicted {
            let dropped = self.confirmations.remove_analysis(old.id);
            tracing::info!(
                analysis_id = %old.id,
                confirmations = dropped,
                "evicted oldest analysis"
            );
        }
    }

    /// Drop an analysis and its confirmations. Returns the removed record.
    pub fn remove_analysis(&self, id: Uuid) -> Option<AnalysisRecord> {
        let record = self.analyses.remove(&id)?;
        self.confirmations.remove_analysis(id);
        Some(record)
    }

    /// Results for `record` with recorded confirmations applied.
    pub fn reviewed_results(&self, record: &AnalysisRecord) -> Vec<CheckResult> {
        self.confirmations.overlay(record.id, &record.results)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn store_insert_get_list() {
        let store: Store<String> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.is_empty());
        assert!(store.insert(id, "a".into()).is_none());
        assert_eq!(store.get(&id).as_deref(), Some("a"));
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn store_clones_share_data() {
        let store: Store<u32> = Store::new();
        let other = store.clone();
        other.insert(Uuid::new_v4(), 7);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_remove() {
        let store: Store<u32> = Store::new();
        let id = Uuid::new_v4();
        store.insert(id, 1);
        assert_eq!(store.remove(&id), Some(1));
        assert_eq!(store.remove(&id), None);
        assert!(store.is_empty());
    }

    #[test]
    fn bounded_insert_evicts_smallest_keys() {
        let store: Store<u32> = Store::new();
        for n in 0..5 {
            assert!(store.insert_bounded(Uuid::new_v4(), n, 3, |v| *v).len() <= 1);
        }
        assert_eq!(store.len(), 3);
        let mut kept = store.list();
        kept.sort();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    fn record(created_at: DateTime<Utc>) -> AnalysisRecord {
        AnalysisRecord {
            id: Uuid::new_v4(),
            section: "authenticator_management".into(),
            document_digest: String::new(),
            scorer: "keyword",
            created_at,
            results: Arc::new(Vec::new()),
        }
    }

    #[test]
    fn storing_past_the_cap_evicts_oldest_with_confirmations() {
        let config = AppConfig {
            max_analyses: 2,
            ..AppConfig::default()
        };
        let state = AppState::with_checker(config, ComplianceChecker::with_defaults());
        let base = Utc::now();
        let records: Vec<_> = (0..3)
            .map(|i| record(base + chrono::Duration::seconds(i)))
            .collect();

        let results = state
            .checker
            .check_section("authenticator_management", "passwords")
            .unwrap();
        let oldest = AnalysisRecord {
            results: Arc::new(results),
            ..records[0].clone()
        };
        state.store_analysis(oldest.clone());
        state
            .confirmations
            .confirm(oldest.id, &oldest.results, "5.6.2.1.1", true, "")
            .unwrap();

        state.store_analysis(records[1].clone());
        state.store_analysis(records[2].clone());

        assert_eq!(state.analyses.len(), 2);
        assert!(state.analyses.get(&oldest.id).is_none());
        assert_eq!(state.confirmations.count_for(oldest.id), 0);
        assert!(state.analyses.get(&records[2].id).is_some());
    }

    #[test]
    fn remove_analysis_drops_confirmations() {
        let state = AppState::new();
        let results = state
            .checker
            .check_section("authenticator_management", "passwords")
            .unwrap();
        let rec = AnalysisRecord {
            results: Arc::new(results),
            ..record(Utc::now())
        };
        state.store_analysis(rec.clone());
        state
            .confirmations
            .confirm(rec.id, &rec.results, "5.6.2.1.1", false, "")
            .unwrap();

        assert!(state.remove_analysis(rec.id).is_some());
        assert_eq!(state.confirmations.count_for(rec.id), 0);
        assert!(state.remove_analysis(rec.id).is_none());
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.auth_token.is_none());
        assert_eq!(config.scorer, ScorerMode::Keyword);
        assert!(config.catalog_path.is_none());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.max_analyses, DEFAULT_MAX_ANALYSES);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("AUTH_TOKEN", "s3cret"),
            ("CJIS_SCORER", "Semantic"),
            ("CJIS_CATALOG_PATH", "/etc/cjis/catalog.yaml"),
            ("MAX_UPLOAD_BYTES", "2048"),
            ("CJIS_MAX_ANALYSES", "50"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_token.as_deref(), Some("s3cret"));
        assert_eq!(config.scorer, ScorerMode::Semantic);
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/cjis/catalog.yaml"))
        );
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.max_analyses, 50);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_auth_token_disables_auth() {
        let config = AppConfig::from_lookup(lookup(&[("AUTH_TOKEN", "  ")])).unwrap();
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn invalid_values_are_rejected() {
        for pairs in [
            &[("PORT", "eighty")][..],
            &[("CJIS_SCORER", "llm")][..],
            &[("MAX_UPLOAD_BYTES", "0")][..],
            &[("CJIS_MAX_ANALYSES", "0")][..],
            &[("CJIS_MAX_ANALYSES", "many")][..],
            &[("LOG_FORMAT", "xml")][..],
        ] {
            let err = AppConfig::from_lookup(lookup(pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{err}");
        }
    }

    #[test]
    fn missing_catalog_file_is_a_config_error() {
        let config = AppConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.yaml")),
            ..AppConfig::default()
        };
        assert!(matches!(
            AppState::with_config(config),
            Err(ConfigError::Catalog(_))
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let config = AppConfig {
            auth_token: Some("super-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
