//! # Raw Values — Rendering and Classification
//!
//! Data and schema values are `serde_json::Value`: null, boolean, number,
//! string, list or mapping. These helpers decide how such a value reads
//! inside a finding message and how its kind is named.

use std::fmt;

use serde_json::Value;

/// Render a raw value for inclusion in a finding message.
///
/// Strings are written without quotes, scalars in their JSON spelling, and
/// lists/mappings as compact JSON.
pub fn render(value: &Value) -> String {
    Rendered(value).to_string()
}

/// `Display` adapter over [`render`].
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a>(pub &'a Value);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Name of the value's kind as used in messages.
///
/// Integral numbers are `integer`; numbers carrying a fractional
/// representation are `float`.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
