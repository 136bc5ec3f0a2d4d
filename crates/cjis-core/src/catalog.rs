//! # Requirement Catalog
//!
//! Read-only mapping from section name (e.g. `access_control`) to the
//! ordered requirements of that section. Built once at startup, either from
//! the built-in table or from a YAML file, and shared behind an `Arc`.
//! There is no update, delete, or reload operation.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{CatalogError, CjisError};
use crate::requirement::Requirement;

/// Section checked when a caller does not name one.
pub const DEFAULT_SECTION: &str = "authenticator_management";

/// On-disk catalog layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    sections: BTreeMap<String, Vec<Requirement>>,
}

/// Immutable table of requirements keyed by section name.
#[derive(Debug, Clone)]
pub struct Catalog {
    sections: HashMap<String, Vec<Arc<Requirement>>>,
}

impl Catalog {
    /// The built-in CJIS requirement table.
    pub fn builtin() -> Self {
        let sections = crate::builtin::sections()
            .into_iter()
            .map(|(name, reqs)| (name.to_string(), reqs.into_iter().map(Arc::new).collect()))
            .collect();
        Self { sections }
    }

    /// Build a catalog from `(section name, requirements)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CjisError::InvalidCatalog`] if a section name is blank, a
    /// section is empty, a requirement has no keywords or a blank keyword,
    /// or a requirement id appears more than once across the catalog.
    pub fn from_sections(
        sections: impl IntoIterator<Item = (String, Vec<Requirement>)>,
    ) -> Result<Self, CjisError> {
        let mut seen_ids = HashSet::new();
        let mut table = HashMap::new();

        for (name, requirements) in sections {
            if name.trim().is_empty() {
                return Err(CjisError::InvalidCatalog("blank section name".into()));
            }
            if requirements.is_empty() {
                return Err(CjisError::InvalidCatalog(format!(
                    "section {name} has no requirements"
                )));
            }
            for req in &requirements {
                if req.keywords.is_empty() {
                    return Err(CjisError::InvalidCatalog(format!(
                        "requirement {} has no keywords",
                        req.id
                    )));
                }
                if req.keywords.iter().any(|k| k.trim().is_empty()) {
                    return Err(CjisError::InvalidCatalog(format!(
                        "requirement {} has a blank keyword",
                        req.id
                    )));
                }
                if !seen_ids.insert(req.id.clone()) {
                    return Err(CjisError::InvalidCatalog(format!(
                        "duplicate requirement id {}",
                        req.id
                    )));
                }
            }
            if table.contains_key(&name) {
                return Err(CjisError::InvalidCatalog(format!("duplicate section {name}")));
            }
            table.insert(name, requirements.into_iter().map(Arc::new).collect());
        }

        if table.is_empty() {
            return Err(CjisError::InvalidCatalog("catalog declares no sections".into()));
        }

        Ok(Self { sections: table })
    }

    /// Parse a catalog from YAML of the form `sections: { <name>: [...] }`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CjisError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::from_sections(file.sections)
    }

    /// Load a catalog from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CjisError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            sections = catalog.sections.len(),
            requirements = catalog.len(),
            "loaded requirement catalog"
        );
        Ok(catalog)
    }

    /// Return the ordered requirements of a section.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownSection`] if `section_name` is not a key.
    pub fn requirements_for_section(
        &self,
        section_name: &str,
    ) -> Result<&[Arc<Requirement>], CatalogError> {
        self.sections
            .get(section_name)
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::UnknownSection(section_name.to_string()))
    }

    /// Section names, sorted.
    pub fn sections(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether `section_name` is a known section.
    pub fn contains_section(&self, section_name: &str) -> bool {
        self.sections.contains_key(section_name)
    }

    /// Look up a requirement by id across all sections.
    pub fn requirement(&self, id: &str) -> Option<&Arc<Requirement>> {
        self.sections.values().flatten().find(|r| r.id == id)
    }

    /// Total number of requirements.
    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no requirements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
