//! Column-name cross-check.
//!
//! Runs per object of every class the schema knows. Attributes the table
//! does not declare are warnings; declared columns an object lacks are
//! info, repeated once per object.

use twinval_core::{FindingCollector, Severity};

use super::CheckContext;

/// Record unknown attributes and missing columns for every object.
pub fn check(ctx: &CheckContext<'_>, findings: &mut FindingCollector) {
    for (class, table) in ctx.known_classes() {
        tracing::trace!(class = %class.name, objects = class.objects.len(), "checking column names");
        for object in &class.objects {
            for attribute in object.keys() {
                if !table.has_column(attribute) {
                    findings.record(
                        Severity::Warning,
                        format!(
                            "The attribute {}.{attribute} is not a valid column in the schema",
                            class.name
                        ),
                    );
                }
            }

            for column in table.column_names() {
                if !object.contains_key(column) {
                    findings.record(
                        Severity::Info,
                        format!("{}.{column} not found in data", class.name),
                    );
                }
            }
        }
    }
}
