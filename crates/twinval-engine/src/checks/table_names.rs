//! Table-name cross-check.
//!
//! Compares data class names with schema table names in both directions.
//! An unknown class in the data is suspicious (warning); a schema table the
//! data never mentions is expected (info).

use twinval_core::{FindingCollector, Severity};

use super::CheckContext;

/// Record the symmetric difference between class and table names.
pub fn check(ctx: &CheckContext<'_>, findings: &mut FindingCollector) {
    for class in ctx.data.classes() {
        if !ctx.catalog.has_table(&class.name) {
            findings.record(
                Severity::Warning,
                format!("The Class '{}' is not found in schema", class.name),
            );
        }
    }

    for table in ctx.catalog.tables() {
        if !ctx.data.contains_class(&table.name) {
            findings.record(
                Severity::Info,
                format!("The Class '{}' is not found in data", table.name),
            );
        }
    }
}
