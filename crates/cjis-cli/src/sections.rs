//! # Sections Subcommand
//!
//! Lists catalog sections with their requirement counts.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use cjis_core::{Catalog, DEFAULT_SECTION};

use crate::{load_catalog, EXIT_OK};

/// Arguments for the `cjis sections` subcommand.
#[derive(Args, Debug)]
pub struct SectionsArgs {
    /// Print the listing as JSON.
    #[arg(long)]
    pub json: bool,

    /// YAML catalog to use instead of the built-in one.
    #[arg(long, value_name = "YAML")]
    pub catalog: Option<PathBuf>,
}

/// One row of the listing.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SectionRow {
    /// Section name.
    pub name: String,
    /// Requirements in the section.
    pub requirements: usize,
    /// Critical requirements in the section.
    pub critical: usize,
}

/// Execute the sections subcommand.
pub fn run_sections(args: &SectionsArgs) -> Result<u8> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let rows = section_rows(&catalog)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            let default = if row.name == DEFAULT_SECTION { "  (default)" } else { "" };
            println!(
                "{:<28} {:>2} requirements, {:>2} critical{default}",
                row.name, row.requirements, row.critical
            );
        }
    }
    Ok(EXIT_OK)
}

/// Rows for every section, sorted by name.
pub fn section_rows(catalog: &Catalog) -> Result<Vec<SectionRow>> {
    catalog
        .sections()
        .into_iter()
        .map(|name| {
            let requirements = catalog.requirements_for_section(name)?;
            Ok(SectionRow {
                name: name.to_string(),
                requirements: requirements.len(),
                critical: requirements.iter().filter(|r| r.critical).count(),
            })
        })
        .collect()
}
