//! # Error Hierarchy
//!
//! Structured error types for the auditor, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.

use thiserror::Error;

/// Errors raised by catalog lookups.
///
/// This is the only error the scoring core produces. It is propagated to the
/// caller unmodified so the boundary layer can report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested section name is not one of the catalog's keys.
    #[error("Unknown CJIS section: {0}")]
    UnknownSection(String),
}

/// Top-level error type for catalog construction and loading.
#[derive(Error, Debug)]
pub enum CjisError {
    /// Catalog lookup failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A loaded catalog violates a structural rule (duplicate ids, empty
    /// keyword lists, blank section names).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// YAML parse failure while loading a catalog file.
    #[error("catalog YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
