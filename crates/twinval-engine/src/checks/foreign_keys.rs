//! # Foreign-Key Cross-Check
//!
//! For every non-null attribute whose column declares relationships, each
//! relationship is resolved through the schema to a related table and
//! column, and every element of the value must equal the related column's
//! value on some object of the related class.
//!
//! All warnings from this pass are deduplicated by exact message text for
//! the whole run: a missing related class is reported once no matter how
//! many objects point at it.
//!
//! ## Equality
//!
//! Numbers compare by value, so `1` matches `1.0`. Everything else compares
//! structurally; a boolean never equals a number and a string never equals
//! the number it spells. Related objects lacking the related column are
//! skipped.

use std::collections::HashSet;

use serde_json::Value;
use twinval_core::value::Rendered;
use twinval_core::{FindingCollector, Severity};

use super::CheckContext;

/// Record unresolved references and unmatched foreign-key values.
pub fn check(ctx: &CheckContext<'_>, findings: &mut FindingCollector) {
    let mut reported = HashSet::new();
    let mut warn = |message: String| {
        if reported.insert(message.clone()) {
            findings.record(Severity::Warning, message);
        }
    };

    for (class, table) in ctx.known_classes() {
        for object in &class.objects {
            for (attribute, value) in object {
                if value.is_null() {
                    continue;
                }
                let Some(column) = table.column(attribute) else {
                    continue;
                };

                for relationship in column.relationships() {
                    let (related_table, related_column) = match ctx.catalog.resolve(relationship) {
                        Ok(target) => target,
                        Err(dangling) => {
                            warn(format!(
                                "Relationship of {}.{attribute} cannot be resolved: {dangling}",
                                class.name
                            ));
                            continue;
                        }
                    };

                    let Some(related_class) = ctx.data.class(&related_table.name) else {
                        warn(format!(
                            "Related table '{}' not found in data for foreign key '{attribute}' in table '{}'",
                            related_table.name, class.name
                        ));
                        continue;
                    };

                    for element in elements(value) {
                        let matched = related_class.objects.iter().any(|related| {
                            related
                                .get(&related_column.name)
                                .is_some_and(|candidate| values_equal(element, candidate))
                        });
                        if !matched {
                            warn(format!(
                                "The object {}.{attribute} with value {} is not related to any {}.{} in the data",
                                class.name,
                                Rendered(element),
                                related_table.name,
                                related_column.name
                            ));
                        }
                    }
                }
            }
        }
    }
}

/// The non-null elements of a foreign-key value. A scalar is its own
/// single element.
fn elements(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().filter(|item| !item.is_null()).collect(),
        scalar => vec![scalar],
    }
}

/// Compare a foreign-key value with a related column value.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                x == y
            } else {
                match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                }
            }
        }
        _ => left == right,
    }
}
