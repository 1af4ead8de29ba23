//! # Validate and Check-Schema Subcommands
//!
//! `validate` loads a schema and a data document (JSON, or YAML by
//! extension), runs the engine with the effective settings and prints the
//! report to stdout. `check-schema` does the same for the schema
//! structural validator alone.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use twinval_core::{DocumentKind, FindingCollector};
use twinval_engine::{CheckKind, ValidationReport, Validator};
use twinval_schema::{load_document, validate_schema};

use crate::config::{CliConfig, FailOn, Overrides, OutputFormat, Settings};
use crate::render::{render_json, render_text};
use crate::{EXIT_FINDINGS, EXIT_OK};

/// Arguments for the `twinval validate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Schema document (.json, .yaml or .yml).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Data document (.json, .yaml or .yml).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Lowest severity that makes the command fail.
    #[arg(long, value_enum)]
    pub fail_on: Option<FailOn>,

    /// List every finding instead of grouping identical ones.
    #[arg(long)]
    pub no_group: bool,

    /// Run only this cross-check. Repeatable.
    #[arg(long = "only", value_name = "CHECK")]
    pub only: Vec<CheckKind>,
}

impl ValidateArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            format: self.format,
            fail_on: self.fail_on,
            no_group: self.no_group,
            only: self.only.clone(),
        }
    }
}

/// Arguments for the `twinval check-schema` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CheckSchemaArgs {
    /// Schema document (.json, .yaml or .yml).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// List every finding instead of grouping identical ones.
    #[arg(long)]
    pub no_group: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when nothing reached the failure threshold, 1 on a
/// structural failure or findings at or above the threshold.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let stdout = std::io::stdout();
    validate_to(args, config, &mut stdout.lock())
}

/// Execute the validate subcommand, writing the report to `out`.
pub fn validate_to(args: &ValidateArgs, config: Option<&Path>, out: &mut impl Write) -> Result<u8> {
    let settings = Settings::resolve(&load_config(config)?, &args.overrides());

    let schema = load_document(&args.schema, DocumentKind::Schema)?;
    let data = load_document(&args.data, DocumentKind::Data)?;

    tracing::info!(
        schema = %args.schema.display(),
        data = %args.data.display(),
        checks = settings.engine.checks.len(),
        "validating"
    );

    let report = Validator::with_config(settings.engine.clone()).validate(&schema, &data);
    write_report(&report, &settings, out)?;

    Ok(exit_code(&report, settings.fail_on))
}

/// Execute the check-schema subcommand.
///
/// Returns exit code: 0 when the schema is structurally valid, 1 otherwise.
pub fn run_check_schema(args: &CheckSchemaArgs, config: Option<&Path>) -> Result<u8> {
    let stdout = std::io::stdout();
    check_schema_to(args, config, &mut stdout.lock())
}

/// Execute the check-schema subcommand, writing the report to `out`.
pub fn check_schema_to(
    args: &CheckSchemaArgs,
    config: Option<&Path>,
    out: &mut impl Write,
) -> Result<u8> {
    let overrides = Overrides {
        format: args.format,
        no_group: args.no_group,
        ..Overrides::default()
    };
    let settings = Settings::resolve(&load_config(config)?, &overrides);

    let schema = load_document(&args.schema, DocumentKind::Schema)?;
    let mut findings = FindingCollector::new();
    let failure = validate_schema(&schema, &mut findings).err();
    let report = ValidationReport { findings, failure };

    write_report(&report, &settings, out)?;
    Ok(if report.is_structurally_valid() {
        EXIT_OK
    } else {
        EXIT_FINDINGS
    })
}

fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    match path {
        Some(path) => CliConfig::load(path),
        None => Ok(CliConfig::default()),
    }
}

fn write_report(report: &ValidationReport, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let rendered = match settings.format {
        OutputFormat::Text => {
            render_text(report, settings.group_duplicates).context("failed to render report")?
        }
        OutputFormat::Json => {
            let mut json = render_json(report).context("failed to serialize report")?;
            json.push('\n');
            json
        }
    };
    out.write_all(rendered.as_bytes())
        .context("failed to write report")?;
    Ok(())
}

/// Map a finished run to its exit code.
pub fn exit_code(report: &ValidationReport, fail_on: FailOn) -> u8 {
    if !report.is_structurally_valid() || report.findings.has_at_least(fail_on.threshold()) {
        EXIT_FINDINGS
    } else {
        EXIT_OK
    }
}
