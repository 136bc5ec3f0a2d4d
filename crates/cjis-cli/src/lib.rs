//! # cjis-cli: Offline CJIS Policy Checks
//!
//! Provides the `cjis` command-line interface over the same catalog and
//! scorers the API uses, for checking policy documents without a server.
//!
//! ## Subcommands
//!
//! - `cjis sections`: list catalog sections.
//! - `cjis check`: score a policy document against one section.
//!
//! ```bash
//! cjis sections
//! cjis check --section media_protection policy.txt
//! cat policy.txt | cjis check --json -
//! ```
//!
//! ## Exit Codes
//!
//! `0` no critical issues, `1` critical issues found, `2` operational error.

pub mod check;
pub mod sections;

use std::path::Path;

use anyhow::{Context, Result};

use cjis_core::Catalog;

/// Exit code: check passed without critical issues.
pub const EXIT_OK: u8 = 0;
/// Exit code: critical issues found.
pub const EXIT_CRITICAL: u8 = 1;
/// Exit code: the command could not run.
pub const EXIT_ERROR: u8 = 2;

/// Load a YAML catalog, or the built-in one when no path is given.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_yaml_file(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_without_path() {
        let catalog = load_catalog(None).unwrap();
        assert!(catalog.contains_section("authenticator_management"));
    }

    #[test]
    fn yaml_catalog_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
sections:
  encryption:
    - id: "5.10.1.2"
      section: "5.10.1"
      title: "Encryption"
      requirementText: "Encrypt CJI in transit."
      keywords: ["encrypt", "fips"]
"#
        )
        .unwrap();
        let catalog = load_catalog(Some(file.path())).unwrap();
        assert_eq!(catalog.sections(), vec!["encryption"]);
    }

    #[test]
    fn missing_catalog_file_has_context() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/catalog.yaml"));
    }
}
