//! # Requirement Records
//!
//! A [`Requirement`] is one CJIS Security Policy rule together with the
//! keywords used to look for it in agency policy text.

use serde::{Deserialize, Serialize};

fn default_critical() -> bool {
    true
}

/// An individual CJIS requirement with its official policy text.
///
/// Requirements are created once at catalog construction and never
/// mutated. Check results hold them behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    /// Globally unique identifier (e.g. `5.6.3.2.1`).
    pub id: String,
    /// Dotted CJIS section code (e.g. `5.6.3.2`).
    pub section: String,
    /// Short human-readable title.
    pub title: String,
    /// The official text of the requirement.
    pub requirement_text: String,
    /// Whether a gap in this requirement is a critical issue.
    #[serde(default = "default_critical")]
    pub critical: bool,
    /// Keywords searched for in policy text, in declaration order.
    pub keywords: Vec<String>,
}

impl Requirement {
    /// Build a critical requirement from string slices.
    pub fn new(
        id: &str,
        section: &str,
        title: &str,
        requirement_text: &str,
        keywords: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            section: section.to_string(),
            title: title.to_string(),
            requirement_text: requirement_text.to_string(),
            critical: true,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Mark this requirement as non-critical.
    pub fn non_critical(mut self) -> Self {
        self.critical = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let req = Requirement::new("5.2.1", "5.2", "Least Privilege", "text", &["role-based"]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["requirementText"], "text");
        assert_eq!(json["critical"], true);
        assert_eq!(json["keywords"][0], "role-based");
    }

    #[test]
    fn critical_defaults_to_true_when_absent() {
        let req: Requirement = serde_json::from_value(serde_json::json!({
            "id": "5.4.4",
            "section": "5.4",
            "title": "Time Stamps",
            "requirementText": "Provide time stamps.",
            "keywords": ["time stamp"]
        }))
        .unwrap();
        assert!(req.critical);
    }

    #[test]
    fn non_critical_clears_flag() {
        let req = Requirement::new("a", "b", "c", "d", &["e"]).non_critical();
        assert!(!req.critical);
    }
}
