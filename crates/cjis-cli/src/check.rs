//! # Check Subcommand
//!
//! Scores one policy document against one catalog section and prints the
//! checklist, as text or JSON.
//!
//! Input is a UTF-8 text file, or `-` for stdin. PDF and DOCX files are
//! refused; extract their text first.

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use cjis_checker::{build_scorer, Checklist, ComplianceChecker, ScorerMode};
use cjis_core::DEFAULT_SECTION;

use crate::{load_catalog, EXIT_CRITICAL, EXIT_OK};

/// Arguments for the `cjis check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Catalog section to check against.
    #[arg(long, default_value = DEFAULT_SECTION)]
    pub section: String,

    /// Policy document (UTF-8 text), or `-` to read stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Print the checklist as JSON.
    #[arg(long)]
    pub json: bool,

    /// YAML catalog to use instead of the built-in one.
    #[arg(long, value_name = "YAML")]
    pub catalog: Option<PathBuf>,

    /// Scorer: keyword or semantic.
    #[arg(long, default_value = "keyword")]
    pub scorer: ScorerMode,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 without critical issues, 1 with critical issues.
/// Operational failures are returned as errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let text = read_policy(&args.path)?;
    let (checklist, output) = check_text(args, &text)?;
    println!("{output}");
    Ok(exit_code(&checklist))
}

/// Score `text` and render the output for `args`.
pub fn check_text(args: &CheckArgs, text: &str) -> Result<(Checklist, String)> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let checker = ComplianceChecker::new(Arc::new(catalog), build_scorer(args.scorer));
    let checklist = checker.checklist(&args.section, text)?;

    tracing::info!(
        section = %args.section,
        total = checklist.summary.total,
        critical = checklist.critical_issues.len(),
        "policy checked"
    );

    let output = if args.json {
        serde_json::to_string_pretty(&checklist).context("failed to serialize checklist")?
    } else {
        render_text(&args.section, &checklist)
    };
    Ok((checklist, output))
}

/// Exit code for a checklist.
pub fn exit_code(checklist: &Checklist) -> u8 {
    if checklist.critical_issues.is_empty() {
        EXIT_OK
    } else {
        EXIT_CRITICAL
    }
}

/// Read a policy document from a path or stdin.
pub fn read_policy(path: &Path) -> Result<String> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read policy from stdin")?;
        buf
    } else {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if matches!(ext.as_deref(), Some("pdf") | Some("docx")) {
            bail!(
                "{} is a binary document; extract its text to a .txt file first",
                path.display()
            );
        }
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not UTF-8 text", path.display()))?;
    if text.trim().is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(text)
}

/// Human-readable checklist: summary counts, then every item awaiting
/// confirmation.
pub fn render_text(section: &str, checklist: &Checklist) -> String {
    let s = &checklist.summary;
    let mut out = String::new();
    let _ = writeln!(out, "Section: {section}");
    let _ = writeln!(
        out,
        "Total: {}  Compliant: {}  Non-compliant: {}  Missing: {}  Pending review: {}",
        s.total, s.compliant, s.non_compliant, s.missing, s.pending_review
    );
    let _ = writeln!(out, "Critical issues: {}", checklist.critical_issues.len());

    if !checklist.requires_confirmation.is_empty() {
        let _ = writeln!(out, "\nRequires confirmation:");
    }
    for result in &checklist.requires_confirmation {
        let req = &result.requirement;
        let marker = if result.is_critical_issue() { "!" } else { " " };
        let _ = writeln!(
            out,
            "{marker} [{}] {} {} (confidence {:.2})",
            result.status, req.id, req.title, result.confidence
        );
        for issue in &result.issues {
            let _ = writeln!(out, "      issue: {issue}");
        }
        for suggestion in &result.suggestions {
            let _ = writeln!(out, "      fix:   {suggestion}");
        }
    }
    out.trim_end().to_string()
}
