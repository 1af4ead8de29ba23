//! # Property Constraints
//!
//! Named predicates evaluated against a raw attribute value and the
//! constraint parameter a schema property declares.
//!
//! | Tag | Passes when |
//! |-----|-------------|
//! | `regex-prop` | the pattern matches at the start of the value; null never passes |
//! | `nullable-prop` | the value is not null, or the condition allows null |
//! | `no-less-than-prop` | the value parses as a float and is `>=` the bound |
//! | `no-greater-than-prop` | the value parses as a float and is `<=` the bound |
//!
//! A constraint parameter that cannot be interpreted (an uncompilable
//! pattern, a non-numeric bound) is a [`ConstraintError`], distinct from a
//! value that fails the predicate.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use twinval_core::value;

use crate::coerce;

/// A constraint parameter that cannot be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// The regex pattern is not a string.
    #[error("regex pattern must be a string, got {kind}")]
    PatternNotString {
        /// Kind of the declared value.
        kind: &'static str,
    },

    /// The regex pattern does not compile.
    #[error("invalid regex pattern: {reason}")]
    InvalidPattern {
        /// Compiler message.
        reason: String,
    },

    /// The bound is not numeric.
    #[error("bound '{condition}' is not a number")]
    InvalidBound {
        /// The declared bound, rendered.
        condition: String,
    },

    /// The nullable condition is neither boolean, string nor number.
    #[error("nullable condition must be a boolean, string or number, got {kind}")]
    InvalidNullable {
        /// Kind of the declared value.
        kind: &'static str,
    },
}

/// The supported property constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    Regex,
    Nullable,
    NoLessThan,
    NoGreaterThan,
}

impl Constraint {
    /// Match a property tag. Accepts the `-prop` tags used on properties
    /// and the bare names used in `property_types` entries.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "regex-prop" | "regex" => Some(Self::Regex),
            "nullable-prop" | "nullable" => Some(Self::Nullable),
            "no-less-than-prop" | "no-less-than" | "NoLessThan" => Some(Self::NoLessThan),
            "no-greater-than-prop" | "no-greater-than" | "NoGreaterThan" => {
                Some(Self::NoGreaterThan)
            }
            _ => None,
        }
    }

    /// Name used in finding messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Nullable => "nullable",
            Self::NoLessThan => "NoLessThan",
            Self::NoGreaterThan => "NoGreaterThan",
        }
    }

    /// Whether failure messages quote the condition. Regex patterns are
    /// left out.
    pub fn shows_condition(&self) -> bool {
        !matches!(self, Self::Regex)
    }
}

/// Evaluates constraints for one validation run, compiling each distinct
/// regex pattern once.
#[derive(Debug, Default)]
pub struct ConstraintEvaluator {
    patterns: HashMap<String, Regex>,
}

impl ConstraintEvaluator {
    /// Create an evaluator with an empty pattern cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `constraint` for `value` against the declared `condition`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] if the condition cannot be interpreted.
    pub fn evaluate(
        &mut self,
        constraint: Constraint,
        value: &Value,
        condition: &Value,
    ) -> Result<bool, ConstraintError> {
        match constraint {
            Constraint::Regex => {
                let pattern = self.pattern(condition)?;
                Ok(regex_matches(value, pattern))
            }
            Constraint::Nullable => nullable_allows(value, condition),
            Constraint::NoLessThan => {
                let limit = bound(condition)?;
                Ok(numeric(value).is_some_and(|v| v >= limit))
            }
            Constraint::NoGreaterThan => {
                let limit = bound(condition)?;
                Ok(numeric(value).is_some_and(|v| v <= limit))
            }
        }
    }

    fn pattern(&mut self, condition: &Value) -> Result<&Regex, ConstraintError> {
        let Value::String(source) = condition else {
            return Err(ConstraintError::PatternNotString {
                kind: value::kind(condition),
            });
        };
        match self.patterns.entry(source.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let compiled = Regex::new(source).map_err(|e| ConstraintError::InvalidPattern {
                    reason: e.to_string(),
                })?;
                Ok(entry.insert(compiled))
            }
        }
    }
}

/// Returns true if `pattern` matches `value` starting at its first
/// character. Null never matches; non-string values are matched against
/// their rendered text.
pub fn regex_matches(value: &Value, pattern: &Regex) -> bool {
    let rendered;
    let text = match value {
        Value::Null => return false,
        Value::String(s) => s.as_str(),
        other => {
            rendered = value::render(other);
            rendered.as_str()
        }
    };
    pattern.find(text).is_some_and(|m| m.start() == 0)
}

/// Returns true if the value is not null or `condition` allows null.
///
/// A boolean condition is used as-is; a string condition allows null when
/// its lower-case form is `true`, `1` or `yes`; a numeric condition allows
/// null when non-zero.
///
/// # Errors
///
/// Returns [`ConstraintError::InvalidNullable`] when the value is null and
/// the condition is a list, mapping or null.
pub fn nullable_allows(value: &Value, condition: &Value) -> Result<bool, ConstraintError> {
    if !value.is_null() {
        return Ok(true);
    }
    match condition {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => Ok(matches!(s.to_lowercase().as_str(), "true" | "1" | "yes")),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        other => Err(ConstraintError::InvalidNullable {
            kind: value::kind(other),
        }),
    }
}

/// The value as a float, if it has one. Null has none.
fn numeric(value: &Value) -> Option<f64> {
    coerce::to_float(value, "FLOAT").ok()
}

fn bound(condition: &Value) -> Result<f64, ConstraintError> {
    let parsed = match condition {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ConstraintError::InvalidBound {
        condition: value::render(condition),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(constraint: Constraint, value: Value, condition: Value) -> Result<bool, ConstraintError> {
        ConstraintEvaluator::new().evaluate(constraint, &value, &condition)
    }

    #[test]
    fn test_tags() {
        assert_eq!(Constraint::from_tag("regex-prop"), Some(Constraint::Regex));
        assert_eq!(Constraint::from_tag("nullable"), Some(Constraint::Nullable));
        assert_eq!(Constraint::from_tag("no-less-than-prop"), Some(Constraint::NoLessThan));
        assert_eq!(
            Constraint::from_tag("no-greater-than-prop"),
            Some(Constraint::NoGreaterThan)
        );
        assert_eq!(Constraint::from_tag("unique-prop"), None);
    }

    #[test]
    fn test_regex_anchored_at_start() {
        assert_eq!(eval(Constraint::Regex, json!("PMP-001"), json!("PMP-\\d+")), Ok(true));
        assert_eq!(eval(Constraint::Regex, json!("x-PMP-001"), json!("PMP-\\d+")), Ok(false));
        // Only the start is anchored.
        assert_eq!(eval(Constraint::Regex, json!("PMP-001 spare"), json!("PMP-\\d+")), Ok(true));
    }

    #[test]
    fn test_regex_null_and_non_string_values() {
        assert_eq!(eval(Constraint::Regex, Value::Null, json!(".*")), Ok(false));
        assert_eq!(eval(Constraint::Regex, json!(42), json!("\\d+")), Ok(true));
    }

    #[test]
    fn test_regex_invalid_pattern() {
        assert!(matches!(
            eval(Constraint::Regex, json!("a"), json!("(")),
            Err(ConstraintError::InvalidPattern { .. })
        ));
        assert!(matches!(
            eval(Constraint::Regex, json!("a"), json!(5)),
            Err(ConstraintError::PatternNotString { kind: "integer" })
        ));
    }

    #[test]
    fn test_pattern_cache_reuses_compiled_regex() {
        let mut evaluator = ConstraintEvaluator::new();
        for v in ["a1", "b2", "a3"] {
            evaluator
                .evaluate(Constraint::Regex, &json!(v), &json!("[a-z]\\d"))
                .unwrap();
        }
        assert_eq!(evaluator.patterns.len(), 1);
    }

    #[test]
    fn test_nullable() {
        assert_eq!(eval(Constraint::Nullable, Value::Null, json!(false)), Ok(false));
        assert_eq!(eval(Constraint::Nullable, Value::Null, json!(true)), Ok(true));
        assert_eq!(eval(Constraint::Nullable, json!(0), json!(false)), Ok(true));
        assert_eq!(eval(Constraint::Nullable, Value::Null, json!("YES")), Ok(true));
        assert_eq!(eval(Constraint::Nullable, Value::Null, json!("False")), Ok(false));
        assert_eq!(eval(Constraint::Nullable, Value::Null, json!("1")), Ok(true));
        assert!(eval(Constraint::Nullable, Value::Null, json!([true])).is_err());
        // A present value never consults the condition.
        assert_eq!(eval(Constraint::Nullable, json!("x"), json!([true])), Ok(true));
    }

    #[test]
    fn test_bounds() {
        assert_eq!(eval(Constraint::NoLessThan, json!(5), json!(5)), Ok(true));
        assert_eq!(eval(Constraint::NoLessThan, json!("4.9"), json!(5)), Ok(false));
        assert_eq!(eval(Constraint::NoGreaterThan, json!(10.5), json!("10")), Ok(false));
        assert_eq!(eval(Constraint::NoGreaterThan, json!(-1), json!(0)), Ok(true));
        assert_eq!(eval(Constraint::NoLessThan, Value::Null, json!(0)), Ok(false));
        assert_eq!(eval(Constraint::NoLessThan, json!("lots"), json!(0)), Ok(false));
    }

    #[test]
    fn test_invalid_bound() {
        assert_eq!(
            eval(Constraint::NoLessThan, json!(1), json!("ten")),
            Err(ConstraintError::InvalidBound {
                condition: "ten".to_string()
            })
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Constraint::NoLessThan.label(), "NoLessThan");
        assert!(!Constraint::Regex.shows_condition());
        assert!(Constraint::Nullable.shows_condition());
    }
}
