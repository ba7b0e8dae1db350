//! Shared output formatting for lint results.

use anyhow::Result;
use hoist_lint_core::{LintResult, Severity, ViolationDiagnostic};
use miette::GraphicalReportHandler;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `base` is the directory violation paths are relative to; the `pretty`
/// format re-reads sources from there.
pub fn print(result: &LintResult, format: OutputFormat, base: &Path) -> Result<()> {
    print!("{}", render(result, format, base)?);
    Ok(())
}

fn render(result: &LintResult, format: OutputFormat, base: &Path) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(result)?)),
        OutputFormat::Compact => Ok(render_compact(result)),
        OutputFormat::Pretty => render_pretty(result, base),
    }
}

fn render_text(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut out = String::new();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        let _ = writeln!(out, "  {}: {}", severity_indicator, violation.message);
        for label in &violation.labels {
            let _ = writeln!(
                out,
                "  = note: {} (line {})",
                label.message, label.location.line
            );
        }
        if let Some(suggestion) = &violation.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let _ = writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
    out
}

fn render_compact(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .map(|violation| format!("{violation}\n"))
        .collect()
}

fn render_pretty(result: &LintResult, base: &Path) -> Result<String> {
    let handler = GraphicalReportHandler::new();
    let mut sources: HashMap<&PathBuf, String> = HashMap::new();
    let mut out = String::new();

    for violation in &result.violations {
        let file = &violation.location.file;
        let source = sources
            .entry(file)
            .or_insert_with(|| std::fs::read_to_string(base.join(file)).unwrap_or_default())
            .clone();

        let diagnostic = ViolationDiagnostic::new(violation, source);
        handler.render_report(&mut out, &diagnostic)?;
        out.push('\n');
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let _ = writeln!(
        out,
        "Found {} error(s), {} warning(s), {} info(s) in {} file(s)",
        errors, warnings, infos, result.files_checked
    );
    Ok(out)
}
