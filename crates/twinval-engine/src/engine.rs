//! # Validation Orchestrator
//!
//! Runs the pipeline in its fixed order:
//!
//! ```text
//! schema structure -> data structure -> table names -> column names
//!     -> foreign keys -> column types -> properties
//! ```
//!
//! A structural failure in either document stops the run. The cross-checks
//! never stop it; they only add findings.
//!
//! ## Progress
//!
//! Hosts that report progress (a terminal progress bar, a streaming web
//! response) pass a [`ProgressObserver`]. It is told when each stage starts
//! and finishes, with the stage's 1-based position and the stage count.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use twinval_core::{FindingCollector, StructuralError};
use twinval_schema::{validate_data, validate_schema, SchemaCatalog};

use crate::checks::{CheckContext, CheckKind};

/// One step of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SchemaStructure,
    DataStructure,
    Check(CheckKind),
}

impl Stage {
    /// Human-readable stage name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SchemaStructure => "Schema Structure",
            Self::DataStructure => "Data Structure",
            Self::Check(kind) => kind.label(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives stage notifications during a run.
pub trait ProgressObserver {
    /// Called before `stage` runs.
    fn stage_started(&mut self, _stage: Stage, _position: usize, _total: usize) {}

    /// Called after `stage` ran, successfully or not.
    fn stage_finished(&mut self, _stage: Stage, _position: usize, _total: usize) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Which cross-checks a run performs. Structural validation always runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Cross-checks to run, in canonical order.
    pub checks: Vec<CheckKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checks: CheckKind::CANONICAL.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Run only the given checks. Duplicates are dropped and the canonical
    /// order is restored.
    pub fn only(checks: impl IntoIterator<Item = CheckKind>) -> Self {
        let mut checks: Vec<CheckKind> = checks.into_iter().collect();
        checks.sort();
        checks.dedup();
        Self { checks }
    }

    /// The stages a run goes through.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![Stage::SchemaStructure, Stage::DataStructure];
        let mut checks = self.checks.clone();
        checks.sort();
        checks.dedup();
        stages.extend(checks.into_iter().map(Stage::Check));
        stages
    }
}

/// The outcome of a run: every finding, and the structural failure that
/// stopped it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub findings: FindingCollector,
    pub failure: Option<StructuralError>,
}

impl ValidationReport {
    /// Returns true if both documents passed structural validation.
    pub fn is_structurally_valid(&self) -> bool {
        self.failure.is_none()
    }
}

/// Validates a data document against a schema document.
///
/// A `Validator` holds only configuration. Each call creates its own
/// [`FindingCollector`], so one instance may serve any number of runs.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: EngineConfig,
}

impl Validator {
    /// A validator running every check.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `data` against `schema`.
    pub fn validate(&self, schema: &Value, data: &Value) -> ValidationReport {
        self.validate_with(schema, data, &mut NoProgress)
    }

    /// Validate while reporting stage progress to `observer`.
    pub fn validate_with(
        &self,
        schema: &Value,
        data: &Value,
        observer: &mut dyn ProgressObserver,
    ) -> ValidationReport {
        let mut findings = FindingCollector::new();
        let failure = self.run(schema, data, &mut findings, observer).err();
        ValidationReport { findings, failure }
    }

    /// Run the pipeline, appending to a caller-owned collector.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError`] if either document fails structural
    /// validation. The structural findings are already in `findings`.
    pub fn run(
        &self,
        schema: &Value,
        data: &Value,
        findings: &mut FindingCollector,
        observer: &mut dyn ProgressObserver,
    ) -> Result<(), StructuralError> {
        let span = tracing::info_span!("validation");
        let _guard = span.enter();

        let stages = self.config.stages();
        let total = stages.len();

        let schema = structural_stage(Stage::SchemaStructure, 1, total, observer, || {
            validate_schema(schema, findings)
        })?;
        let data = structural_stage(Stage::DataStructure, 2, total, observer, || {
            validate_data(data, findings)
        })?;

        let catalog = SchemaCatalog::new(&schema);
        let ctx = CheckContext::new(&catalog, &data);
        tracing::debug!(
            tables = catalog.tables().len(),
            classes = data.len(),
            objects = data.object_count(),
            "documents structurally valid"
        );

        for (index, stage) in stages.into_iter().enumerate() {
            let Stage::Check(kind) = stage else {
                continue;
            };
            let position = index + 1;
            observer.stage_started(stage, position, total);
            let before = findings.len();
            kind.run(&ctx, findings);
            tracing::debug!(%stage, added = findings.len() - before, "stage finished");
            observer.stage_finished(stage, position, total);
        }

        Ok(())
    }
}

/// Run one structural stage, notifying the observer around it.
fn structural_stage<T>(
    stage: Stage,
    position: usize,
    total: usize,
    observer: &mut dyn ProgressObserver,
    body: impl FnOnce() -> Result<T, StructuralError>,
) -> Result<T, StructuralError> {
    observer.stage_started(stage, position, total);
    tracing::debug!(%stage, "stage started");
    let result = body();
    observer.stage_finished(stage, position, total);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(bool, Stage, usize, usize)>,
    }

    impl ProgressObserver for Recorder {
        fn stage_started(&mut self, stage: Stage, position: usize, total: usize) {
            self.events.push((true, stage, position, total));
        }

        fn stage_finished(&mut self, stage: Stage, position: usize, total: usize) {
            self.events.push((false, stage, position, total));
        }
    }

    fn empty_schema() -> Value {
        json!({
            "version": "1", "release_date": "", "commentary": "",
            "tables": [], "table_types": [], "column_types": [],
            "relationship_types": [], "property_types": []
        })
    }

    #[test]
    fn test_empty_documents_are_valid() {
        let report = Validator::new().validate(&empty_schema(), &json!({}));
        assert!(report.is_structurally_valid());
        assert!(report.findings.is_empty());
    }

    #[test]
    fn test_schema_failure_stops_before_data() {
        let report = Validator::new().validate(&json!({"tables": []}), &json!("not data"));
        assert!(matches!(report.failure, Some(StructuralError::SchemaInvalid { .. })));
        assert!(
            report.findings.structural_errors().iter().all(|m| m.starts_with("Schema")),
            "data validation must not run: {:?}",
            report.findings.structural_errors()
        );
    }

    #[test]
    fn test_data_failure_reported() {
        let report = Validator::new().validate(&empty_schema(), &json!({"Pump": 3}));
        assert_eq!(report.failure, Some(StructuralError::DataInvalid { violations: 1 }));
    }

    #[test]
    fn test_observer_sees_every_stage_in_order() {
        let mut recorder = Recorder::default();
        Validator::new().validate_with(&empty_schema(), &json!({}), &mut recorder);

        let started: Vec<(Stage, usize)> = recorder
            .events
            .iter()
            .filter(|e| e.0)
            .map(|e| (e.1, e.2))
            .collect();
        assert_eq!(
            started,
            vec![
                (Stage::SchemaStructure, 1),
                (Stage::DataStructure, 2),
                (Stage::Check(CheckKind::TableNames), 3),
                (Stage::Check(CheckKind::ColumnNames), 4),
                (Stage::Check(CheckKind::ForeignKeys), 5),
                (Stage::Check(CheckKind::ColumnTypes), 6),
                (Stage::Check(CheckKind::Properties), 7),
            ]
        );
        assert!(recorder.events.iter().all(|e| e.3 == 7));
        assert_eq!(recorder.events.len(), 14);
    }

    #[test]
    fn test_observer_stops_at_structural_failure() {
        let mut recorder = Recorder::default();
        Validator::new().validate_with(&json!([]), &json!({}), &mut recorder);
        assert_eq!(
            recorder.events,
            vec![
                (true, Stage::SchemaStructure, 1, 2 + 5),
                (false, Stage::SchemaStructure, 1, 2 + 5),
            ]
        );
    }

    #[test]
    fn test_only_normalizes_order() {
        let config = EngineConfig::only([
            CheckKind::Properties,
            CheckKind::TableNames,
            CheckKind::Properties,
        ]);
        assert_eq!(config.checks, vec![CheckKind::TableNames, CheckKind::Properties]);
        assert_eq!(config.stages().len(), 4);
    }

    #[test]
    fn test_selected_checks_only() {
        let validator = Validator::with_config(EngineConfig::only([CheckKind::ColumnNames]));
        let mut schema = empty_schema();
        schema["tables"] = json!([{
            "uuid": "t1", "name": "Pump", "description": "", "type": "tt",
            "pos_x": 0, "pos_y": 0, "columns": []
        }]);
        let report = validator.validate(&schema, &json!({"Pump": [{"x": 1}], "Ghost": []}));
        assert_eq!(
            report.findings.warnings(),
            ["The attribute Pump.x is not a valid column in the schema"],
            "table-name check disabled"
        );
    }

    #[test]
    fn test_config_deserialization() {
        let config: EngineConfig = serde_json::from_value(json!({"checks": ["foreign_keys"]})).unwrap();
        assert_eq!(config.checks, vec![CheckKind::ForeignKeys]);
        let config: EngineConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(serde_json::from_value::<EngineConfig>(json!({"check": []})).is_err());
    }
}
