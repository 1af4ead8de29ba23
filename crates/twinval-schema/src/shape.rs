//! # Schema Structural Validator
//!
//! Confirms the schema document has the shape every later pass relies on
//! before it is trusted. The check is exhaustive: every violation in the
//! document is recorded as a `structural_error` finding, and only then does
//! validation fail.
//!
//! ## Required Shape
//!
//! - Top level: `version, release_date, commentary, tables, table_types,
//!   column_types, relationship_types, property_types`.
//! - Each table: `uuid, name, description, type, pos_x, pos_y, columns`,
//!   with `columns` a list.
//! - Each column: `uuid, name, description, type, relationship, properties`,
//!   with `relationship` and `properties` each null or a list.
//! - Each relationship entry: a mapping with string `table_uuid` and
//!   `column_uuid`. Each property entry: a mapping with a string `type` and
//!   a `value`.
//! - Each type section is a list of entries with `uuid, name, description`
//!   (`table_types` entries also need `color`).
//!
//! Identifiers the cross-checks dereference (`uuid`, `name`, column `type`)
//! must be strings. A key that is missing is reported once, as missing; its
//! type is only checked when it is present.

use serde_json::{Map, Value};
use twinval_core::{FindingCollector, Severity, StructuralError};

use crate::model::Schema;

/// Keys every schema document must carry at the top level.
pub const REQUIRED_SCHEMA_KEYS: [&str; 8] = [
    "version",
    "release_date",
    "commentary",
    "tables",
    "table_types",
    "column_types",
    "relationship_types",
    "property_types",
];

const REQUIRED_TABLE_KEYS: [&str; 7] =
    ["uuid", "name", "description", "type", "pos_x", "pos_y", "columns"];

const REQUIRED_COLUMN_KEYS: [&str; 6] =
    ["uuid", "name", "description", "type", "relationship", "properties"];

const TYPE_SECTIONS: [&str; 4] = [
    "table_types",
    "column_types",
    "relationship_types",
    "property_types",
];

const REQUIRED_TYPE_KEYS: [&str; 3] = ["uuid", "name", "description"];

/// Validate the structure of a schema document.
///
/// On success returns the typed [`Schema`] and records nothing. On failure
/// every violation has been recorded in `findings` at
/// [`Severity::Structural`] and the returned error carries their count.
///
/// # Errors
///
/// Returns [`StructuralError::SchemaInvalid`] if the document is not a
/// mapping or any required key, list or identifier is missing or malformed.
pub fn validate_schema(
    schema: &Value,
    findings: &mut FindingCollector,
) -> Result<Schema, StructuralError> {
    let mut violations = Vec::new();

    match schema.as_object() {
        Some(root) => check_root(root, &mut violations),
        None => violations.push("Schema must be a mapping".to_string()),
    }

    if violations.is_empty() {
        match serde_json::from_value::<Schema>(schema.clone()) {
            Ok(typed) => return Ok(typed),
            Err(e) => violations.push(format!("Schema could not be interpreted: {e}")),
        }
    }

    let count = violations.len();
    for violation in violations {
        findings.record(Severity::Structural, violation);
    }
    tracing::warn!(violations = count, "schema failed structural validation");
    Err(StructuralError::SchemaInvalid { violations: count })
}

fn check_root(root: &Map<String, Value>, violations: &mut Vec<String>) {
    for key in REQUIRED_SCHEMA_KEYS {
        if !root.contains_key(key) {
            violations.push(format!("Schema is missing required key: '{key}'"));
        }
    }

    match root.get("tables") {
        None => {}
        Some(Value::Array(tables)) => {
            for (index, table) in tables.iter().enumerate() {
                check_table(index, table, violations);
            }
        }
        Some(_) => violations.push("'tables' should be a list in the schema".to_string()),
    }

    for section in TYPE_SECTIONS {
        match root.get(section) {
            None => {}
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    check_type_entry(section, index, item, violations);
                }
            }
            Some(_) => violations.push(format!("'{section}' should be a list in the schema")),
        }
    }
}

/// `'Name'` when the entry has a string name, `#index` otherwise.
fn describe(index: usize, entry: &Map<String, Value>) -> String {
    match entry.get("name").and_then(Value::as_str) {
        Some(name) => format!("'{name}'"),
        None => format!("#{index}"),
    }
}

fn check_table(index: usize, table: &Value, violations: &mut Vec<String>) {
    let Some(table) = table.as_object() else {
        violations.push(format!("Table #{index} should be a mapping"));
        return;
    };
    let label = describe(index, table);

    for key in REQUIRED_TABLE_KEYS {
        if !table.contains_key(key) {
            violations.push(format!("Table {label} is missing required key: '{key}'"));
        }
    }
    for key in ["uuid", "name"] {
        if table.get(key).is_some_and(|v| !v.is_string()) {
            violations.push(format!("'{key}' should be a string in table {label}"));
        }
    }

    match table.get("columns") {
        None => {}
        Some(Value::Array(columns)) => {
            for (column_index, column) in columns.iter().enumerate() {
                check_column(&label, column_index, column, violations);
            }
        }
        Some(_) => violations.push(format!("'columns' should be a list in table {label}")),
    }
}

fn check_column(table: &str, index: usize, column: &Value, violations: &mut Vec<String>) {
    let Some(column) = column.as_object() else {
        violations.push(format!("Column #{index} in table {table} should be a mapping"));
        return;
    };
    let label = describe(index, column);

    for key in REQUIRED_COLUMN_KEYS {
        if !column.contains_key(key) {
            violations.push(format!(
                "Column {label} is missing required key: '{key}' in table {table}"
            ));
        }
    }
    for key in ["uuid", "name", "type"] {
        if column.get(key).is_some_and(|v| !v.is_string()) {
            violations.push(format!(
                "'{key}' should be a string in column {label} of table {table}"
            ));
        }
    }

    let location = format!("column {label} of table {table}");

    match column.get("relationship") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                check_entry(
                    "Relationship",
                    &location,
                    i,
                    entry,
                    &[("table_uuid", true), ("column_uuid", true)],
                    violations,
                );
            }
        }
        Some(_) => violations.push(format!(
            "'relationship' should be a list or null in {location}"
        )),
    }

    match column.get("properties") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                check_entry(
                    "Property",
                    &location,
                    i,
                    entry,
                    &[("type", true), ("value", false)],
                    violations,
                );
            }
        }
        Some(_) => violations.push(format!(
            "'properties' should be a list or null in {location}"
        )),
    }
}

/// Check a relationship or property entry. `keys` pairs each required key
/// with whether it must hold a string.
fn check_entry(
    kind: &str,
    location: &str,
    index: usize,
    entry: &Value,
    keys: &[(&str, bool)],
    violations: &mut Vec<String>,
) {
    let Some(entry) = entry.as_object() else {
        violations.push(format!("{kind} #{index} in {location} should be a mapping"));
        return;
    };
    for (key, must_be_string) in keys {
        match entry.get(*key) {
            None => violations.push(format!(
                "{kind} #{index} in {location} is missing required key: '{key}'"
            )),
            Some(v) if *must_be_string && !v.is_string() => violations.push(format!(
                "'{key}' should be a string in {} #{index} in {location}",
                kind.to_lowercase()
            )),
            Some(_) => {}
        }
    }
}

fn check_type_entry(section: &str, index: usize, item: &Value, violations: &mut Vec<String>) {
    let Some(item) = item.as_object() else {
        violations.push(format!("Item #{index} in '{section}' should be a mapping"));
        return;
    };

    let color = (section == "table_types").then_some("color");
    for key in REQUIRED_TYPE_KEYS.into_iter().chain(color) {
        if !item.contains_key(key) {
            violations.push(format!(
                "Item #{index} in '{section}' is missing required key: '{key}'"
            ));
        }
    }
    for key in ["uuid", "name"] {
        if item.get(key).is_some_and(|v| !v.is_string()) {
            violations.push(format!(
                "'{key}' should be a string in item #{index} of '{section}'"
            ));
        }
    }
}
