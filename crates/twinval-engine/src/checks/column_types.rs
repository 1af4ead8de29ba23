//! Column-type cross-check.
//!
//! Every non-null attribute that names a schema column is run through the
//! coercion rules of the column's declared type. The declared type is a
//! uuid into `column_types`; the entry's name selects the rules. A uuid
//! missing from `column_types` is an error, even one spelled like a type
//! name.
//!
//! `Array(VARCHAR(255))` columns always convert and are reported as info,
//! even when the value is already a list of strings.

use twinval_core::value::Rendered;
use twinval_core::{FindingCollector, Severity};

use super::CheckContext;
use crate::coerce::{ColumnType, Conformance};

/// Record coercions and incompatible values.
pub fn check(ctx: &CheckContext<'_>, findings: &mut FindingCollector) {
    for (class, table) in ctx.known_classes() {
        for object in &class.objects {
            for (attribute, value) in object {
                if value.is_null() {
                    continue;
                }
                let Some(column) = table.column(attribute) else {
                    continue;
                };

                let Some(type_name) = ctx.catalog.column_type_name(&column.column_type) else {
                    findings.record(
                        Severity::Error,
                        format!(
                            "Unknown column type {} provided for validation of {}.{attribute}",
                            column.column_type, class.name
                        ),
                    );
                    continue;
                };
                let Ok(column_type) = type_name.parse::<ColumnType>() else {
                    findings.record(
                        Severity::Error,
                        format!(
                            "Unknown column type {type_name} provided for validation of {}.{attribute}",
                            class.name
                        ),
                    );
                    continue;
                };

                match column_type.conform(value) {
                    Ok(Conformance::Native) if !column_type.is_text_array() => {}
                    Ok(_) => {
                        let severity = if column_type.is_text_array() {
                            Severity::Info
                        } else {
                            Severity::Warning
                        };
                        findings.record(
                            severity,
                            format!(
                                "Value '{}' of {}.{attribute} was converted to {column_type} type.",
                                Rendered(value),
                                class.name
                            ),
                        );
                    }
                    Err(e) => findings.record(
                        Severity::Error,
                        format!(
                            "Error: Value '{}' of {}.{attribute} is not compatible with {column_type} type and cannot be converted. {e}",
                            Rendered(value),
                            class.name
                        ),
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::CheckKind;
    use serde_json::{json, Value};

    fn schema() -> Value {
        schema_doc(
            json!([table(
                "t1",
                "T",
                vec![
                    ("c1", "A", "ct-int", Value::Null, Value::Null),
                    ("c2", "tags", "ct-text-array", Value::Null, Value::Null),
                    ("c3", "ids", "ct-int-array", Value::Null, Value::Null),
                    ("c4", "odd", "ct-decimal", Value::Null, Value::Null),
                    ("c5", "lost", "ct-missing", Value::Null, Value::Null),
                    ("c6", "on", "ct-bool", Value::Null, Value::Null),
                    ("c7", "raw", "INT", Value::Null, Value::Null),
                ]
            )]),
            column_types(),
            json!([]),
        )
    }

    #[test]
    fn test_coercible_string_is_one_warning() {
        let findings = run(CheckKind::ColumnTypes, schema(), json!({"T": [{"A": "5"}]}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.warnings(), ["Value '5' of T.A was converted to INT type."]);
    }

    #[test]
    fn test_incompatible_string_is_one_error() {
        let findings = run(CheckKind::ColumnTypes, schema(), json!({"T": [{"A": "abc"}]}));
        assert_eq!(findings.len(), 1);
        let message = &findings.errors()[0];
        assert!(
            message.contains("is not compatible with INT type"),
            "unexpected message: {message}"
        );
        assert!(message.contains("invalid literal for INT: 'abc'"));
    }

    #[test]
    fn test_native_and_null_values_are_silent() {
        let findings = run(
            CheckKind::ColumnTypes,
            schema(),
            json!({"T": [{"A": 5, "on": true, "ids": [1, 2]}, {"A": null, "odd": null}]}),
        );
        assert!(findings.is_empty(), "{:?}", findings.warnings());
    }

    #[test]
    fn test_text_array_coercion_is_info() {
        let findings = run(
            CheckKind::ColumnTypes,
            schema(),
            json!({"T": [{"tags": "solo"}, {"tags": ["a", "b"]}]}),
        );
        assert_eq!(findings.info().len(), 2, "native text arrays are reported too");
        assert!(findings.warnings().is_empty());
        assert_eq!(
            findings.info()[0],
            "Value 'solo' of T.tags was converted to Array(VARCHAR(255)) type."
        );
    }

    #[test]
    fn test_array_element_failure_is_error() {
        let findings = run(CheckKind::ColumnTypes, schema(), json!({"T": [{"ids": [1, "x"]}]}));
        assert_eq!(findings.errors().len(), 1);
        assert!(findings.errors()[0].contains("element 1"));
    }

    #[test]
    fn test_unknown_type_name_and_unresolved_uuid_are_errors() {
        let findings = run(
            CheckKind::ColumnTypes,
            schema(),
            json!({"T": [{"odd": 1, "lost": 2}]}),
        );
        assert_eq!(
            findings.errors(),
            [
                "Unknown column type DECIMAL provided for validation of T.odd",
                "Unknown column type ct-missing provided for validation of T.lost",
            ]
        );
    }

    #[test]
    fn test_type_name_used_as_uuid_is_not_resolved() {
        let findings = run(
            CheckKind::ColumnTypes,
            schema(),
            json!({"T": [{"raw": "5"}, {"raw": "abc"}]}),
        );
        assert_eq!(
            findings.errors(),
            [
                "Unknown column type INT provided for validation of T.raw",
                "Unknown column type INT provided for validation of T.raw",
            ],
            "a type uuid absent from column_types must not be read as a type name"
        );
        assert!(findings.warnings().is_empty(), "{:?}", findings.warnings());
    }

    #[test]
    fn test_boolean_in_int_column_is_warning() {
        let findings = run(CheckKind::ColumnTypes, schema(), json!({"T": [{"A": true}]}));
        assert_eq!(
            findings.warnings(),
            ["Value 'true' of T.A was converted to INT type."],
            "booleans are not integers"
        );
    }

    #[test]
    fn test_boolean_from_integer_is_warning() {
        let findings = run(CheckKind::ColumnTypes, schema(), json!({"T": [{"on": 1}]}));
        assert_eq!(findings.warnings(), ["Value '1' of T.on was converted to BOOLEAN type."]);
    }
}
