//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! format: json            # text | json
//! fail_on: warning        # info | warning | error
//! group_duplicates: false
//! checks: [table_names, foreign_keys]
//! ```
//!
//! Command-line flags override the file. Keys the file leaves out fall back
//! to the defaults (`text`, `error`, grouping on, every check). Unknown keys
//! are rejected so a misspelt option is never silently ignored.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use twinval_core::Severity;
use twinval_engine::{CheckKind, EngineConfig};

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Lowest severity that makes `validate` exit with a failure code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailOn {
    Info,
    Warning,
    #[default]
    Error,
}

impl FailOn {
    /// The severity threshold this level stands for.
    pub fn threshold(&self) -> Severity {
        match self {
            Self::Info => Severity::Info,
            Self::Warning => Severity::Warning,
            Self::Error => Severity::Error,
        }
    }
}

/// Contents of a configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub format: Option<OutputFormat>,
    pub fail_on: Option<FailOn>,
    pub group_duplicates: Option<bool>,
    pub checks: Option<Vec<CheckKind>>,
}

impl CliConfig {
    /// Parse configuration from YAML text. An empty document is the empty
    /// configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}

/// Command-line overrides. `None` and empty mean "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format: Option<OutputFormat>,
    pub fail_on: Option<FailOn>,
    pub no_group: bool,
    pub only: Vec<CheckKind>,
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub fail_on: FailOn,
    pub group_duplicates: bool,
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&CliConfig::default(), &Overrides::default())
    }
}

impl Settings {
    /// Layer command-line overrides over the configuration file over the
    /// defaults.
    pub fn resolve(file: &CliConfig, flags: &Overrides) -> Self {
        let engine = if !flags.only.is_empty() {
            EngineConfig::only(flags.only.iter().copied())
        } else if let Some(checks) = &file.checks {
            EngineConfig::only(checks.iter().copied())
        } else {
            EngineConfig::default()
        };

        Self {
            format: flags.format.or(file.format).unwrap_or_default(),
            fail_on: flags.fail_on.or(file.fail_on).unwrap_or_default(),
            group_duplicates: !flags.no_group && file.group_duplicates.unwrap_or(true),
            engine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.fail_on, FailOn::Error);
        assert!(settings.group_duplicates);
        assert_eq!(settings.engine, EngineConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let config = CliConfig::from_yaml_str(
            "format: json\nfail_on: warning\ngroup_duplicates: false\nchecks: [properties, table_names]\n",
        )
        .unwrap();
        let settings = Settings::resolve(&config, &Overrides::default());
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.fail_on.threshold(), Severity::Warning);
        assert!(!settings.group_duplicates);
        assert_eq!(
            settings.engine.checks,
            vec![CheckKind::TableNames, CheckKind::Properties],
            "checks are run in canonical order"
        );
    }

    #[test]
    fn test_flags_override_file() {
        let config = CliConfig::from_yaml_str("format: json\nfail_on: info\nchecks: [properties]\n").unwrap();
        let flags = Overrides {
            format: Some(OutputFormat::Text),
            fail_on: None,
            no_group: true,
            only: vec![CheckKind::ForeignKeys],
        };
        let settings = Settings::resolve(&config, &flags);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.fail_on, FailOn::Info, "file value kept when flag absent");
        assert!(!settings.group_duplicates);
        assert_eq!(settings.engine.checks, vec![CheckKind::ForeignKeys]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(CliConfig::from_yaml_str("fromat: json\n").is_err());
        assert!(CliConfig::from_yaml_str("checks: [everything]\n").is_err());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(CliConfig::from_yaml_str("\n").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fail_on: warning").unwrap();
        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.fail_on, Some(FailOn::Warning));

        let err = CliConfig::load(std::path::Path::new("/nonexistent/twinval.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config file"));
    }
}
