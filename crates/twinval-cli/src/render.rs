//! # Report Rendering
//!
//! Text output lists the four severity buckets, most severe first, each
//! under a heading with its count. Identical messages are collapsed into one
//! line with an `(xN)` suffix unless grouping is off. A summary line closes
//! the report.
//!
//! JSON output is the collector's four lists plus `valid`, the structural
//! failure message (or `null`) and the per-severity summary.

use std::fmt::{self, Write};

use serde::Serialize;
use twinval_core::{FindingCollector, Severity, Summary};
use twinval_engine::ValidationReport;

fn heading(severity: Severity) -> &'static str {
    match severity {
        Severity::Structural => "Structural errors",
        Severity::Error => "Errors",
        Severity::Warning => "Warnings",
        Severity::Info => "Info",
    }
}

/// Render a report as human-readable text.
pub fn render_text(report: &ValidationReport, group_duplicates: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_text(&mut out, report, group_duplicates)?;
    Ok(out)
}

fn write_text(
    out: &mut impl Write,
    report: &ValidationReport,
    group_duplicates: bool,
) -> fmt::Result {
    let findings = &report.findings;

    for severity in Severity::REPORT_ORDER {
        writeln!(out, "{} ({}):", heading(severity), findings.count(severity))?;
        if group_duplicates {
            for group in findings.grouped(severity) {
                if group.count > 1 {
                    writeln!(out, "  - {} (x{})", group.message, group.count)?;
                } else {
                    writeln!(out, "  - {}", group.message)?;
                }
            }
        } else {
            for message in findings.bucket(severity) {
                writeln!(out, "  - {message}")?;
            }
        }
    }

    if let Some(failure) = &report.failure {
        writeln!(out, "Validation stopped: {failure}")?;
    }

    let summary = findings.summary();
    writeln!(
        out,
        "Summary: {} structural error(s), {} error(s), {} warning(s), {} info",
        summary.structural_errors, summary.errors, summary.warnings, summary.info
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    valid: bool,
    failure: Option<String>,
    summary: Summary,
    #[serde(flatten)]
    findings: &'a FindingCollector,
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &ValidationReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        valid: report.is_structurally_valid(),
        failure: report.failure.as_ref().map(ToString::to_string),
        summary: report.findings.summary(),
        findings: &report.findings,
    })
}
