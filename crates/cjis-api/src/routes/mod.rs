//! # API Routes
//!
//! | Prefix                 | Module                  |
//! |------------------------|-------------------------|
//! | `/v1/sections*`        | [`sections`]            |
//! | `/v1/analyze*`         | [`analyze`]             |
//! | `/v1/analyses*`        | [`analyses`]            |

pub mod analyses;
pub mod analyze;
pub mod sections;

use cjis_core::DEFAULT_SECTION;

/// Requested section, or the default when absent or blank.
pub(crate) fn section_or_default(section: Option<&str>) -> String {
    section
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SECTION)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_section_falls_back_to_default() {
        assert_eq!(section_or_default(None), DEFAULT_SECTION);
        assert_eq!(section_or_default(Some("  ")), DEFAULT_SECTION);
        assert_eq!(section_or_default(Some(" access_control ")), "access_control");
    }
}
