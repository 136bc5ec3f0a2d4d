#![deny(missing_docs)]

//! # cjis-core: Foundational Types for the CJIS Policy Auditor
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies: only `serde`, `serde_yaml`,
//! `thiserror` and `tracing` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Requirements are immutable.** A [`Requirement`] is built once when the
//!    [`Catalog`] is constructed and shared read-only as `Arc<Requirement>`
//!    for the lifetime of the process.
//!
//! 2. **Single [`CheckStatus`] enum.** One definition, four variants, with
//!    the wire names (`compliant`, `non_compliant`, `missing`,
//!    `pending_review`) fixed by serde.
//!
//! 3. **[`CatalogError`] is the only core failure.** Everything else the
//!    scorer sees has a defined fallback value.

pub mod catalog;
pub mod error;
pub mod requirement;
pub mod result;
pub mod status;

mod builtin;

// Re-export primary types at crate root for ergonomic imports.
pub use catalog::{Catalog, DEFAULT_SECTION};
pub use error::{CatalogError, CjisError};
pub use requirement::Requirement;
pub use result::CheckResult;
pub use status::CheckStatus;
