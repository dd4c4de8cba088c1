//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Build
//!
//! One line per document, in walk order, then a summary:
//!
//! ```text
//! Building docs/a...
//! Failed docs/a (renderer exited with code 43)
//! Building docs/b...
//! Skipping docs/c...
//!
//! 1 built, 1 skipped, 1 failed
//! Failed documents:
//!     docs/a: renderer exited with code 43
//! ```
//!
//! A failed document always gets its own `Failed` line, so it is never
//! mistaken for one that was skipped because it was fresh.
//!
//! ## Check
//!
//! ```text
//! build docs/a (output missing)
//! build docs/b (pandoc.yaml is newer)
//! skip  docs/c
//!
//! 2 to build, 1 up to date
//! ```
//!
//! A directory the walk could not read is listed as `error <dir> (<cause>)`.
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::plan::{Action, BuildEvent, BuildReport, Plan};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a single build progress event.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::Building { dir, .. } => vec![format!("Building {}...", dir.display())],
        BuildEvent::Skipping { dir } => vec![format!("Skipping {}...", dir.display())],
        BuildEvent::Failed { dir, reason } => {
            vec![format!("Failed {} ({})", dir.display(), reason)]
        }
    }
}

/// Print a build progress event to stdout as it happens.
pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run summary, listing failures again so they are not
/// lost in a long build log.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![String::new(), report.to_string()];
    if !report.failed.is_empty() {
        lines.push("Failed documents:".to_string());
        for failure in &report.failed {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                failure.dir.display(),
                failure.reason
            ));
        }
    }
    lines
}

/// Print build summary to stdout.
pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

/// Format a dry-run plan: what `build` would do and why.
pub fn format_plan_output(plan: &Plan) -> Vec<String> {
    let planned = &plan.documents;
    let mut lines = Vec::new();
    let mut to_build = 0;

    for doc in planned {
        match doc.action() {
            Action::Build => {
                to_build += 1;
                lines.push(format!(
                    "build {} ({})",
                    doc.display_dir.display(),
                    doc.freshness
                ));
            }
            Action::Skip => lines.push(format!("skip  {}", doc.display_dir.display())),
        }
    }

    for failure in &plan.unreadable {
        lines.push(format!("error {} ({})", failure.dir.display(), failure.reason));
    }

    if planned.is_empty() && plan.unreadable.is_empty() {
        lines.push("No documents found".to_string());
    } else {
        lines.push(String::new());
        lines.push(format!(
            "{} to build, {} up to date",
            to_build,
            planned.len() - to_build
        ));
    }
    lines
}

/// Print plan output to stdout.
pub fn print_plan_output(plan: &Plan) {
    for line in format_plan_output(plan) {
        println!("{}", line);
    }
}
