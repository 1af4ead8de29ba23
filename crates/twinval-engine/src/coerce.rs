//! # Type Coercion
//!
//! Given a raw value and the logical type a schema column declares, decides
//! whether the value already has the type's native representation, can be
//! coerced into it, or is incompatible.
//!
//! ## Rules
//!
//! | Declared type | Native | Coercion |
//! |---|---|---|
//! | `INT`, `TINYINT` | integral number | integral-valued: floats truncate, booleans are 0/1, strings parse after trimming |
//! | `FLOAT` | number with a fractional representation | numbers widen, booleans are 0.0/1.0, strings parse after trimming |
//! | `BOOLEAN` | boolean | strings `true/1/t/y/yes` and `false/0/f/n/no` (trimmed, case-insensitive); numbers: non-zero is true |
//! | `DATE` | never | string in `YYYY-MM-DD` |
//! | `DATETIME` | never | string in `YYYY-MM-DDTHH:MM:SS` |
//! | `VARCHAR(255)`, `VARCHAR(45)`, `BLOB` | string | rendered text, always succeeds |
//! | `Array(T)` | list whose elements are all native `T` | each element by `T`'s rule; a scalar is wrapped in a one-element list |
//!
//! JSON carries no date values, so `DATE`/`DATETIME` values are always
//! coerced from strings. Lists and mappings never coerce into a scalar type
//! other than the text types.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;
use twinval_core::value;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Largest float magnitude that truncates into an `i128` without overflow.
const I128_FLOAT_LIMIT: f64 = 1.7e38;

/// A value could not be converted to the declared type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// A string is not a literal of the target type.
    #[error("invalid literal for {target}: '{text}'")]
    InvalidLiteral {
        /// Target type name.
        target: &'static str,
        /// The offending text.
        text: String,
    },

    /// The value's kind has no conversion to the target type.
    #[error("cannot convert {kind} to {target}")]
    Unsupported {
        /// Kind of the source value (`list`, `null`, ...).
        kind: &'static str,
        /// Target type name.
        target: &'static str,
    },

    /// A number is outside the representable range.
    #[error("{value} is out of range for {target}")]
    OutOfRange {
        /// The offending number.
        value: String,
        /// Target type name.
        target: &'static str,
    },

    /// A string does not match the date or date-time format.
    #[error("'{text}' does not match {target} format {format}: {reason}")]
    Temporal {
        /// Target type name.
        target: &'static str,
        /// The offending text.
        text: String,
        /// Expected layout.
        format: &'static str,
        /// Parser message.
        reason: String,
    },

    /// An array element failed to convert.
    #[error("element {index}: {source}")]
    Element {
        /// Zero-based position of the element.
        index: usize,
        /// Why the element failed.
        source: Box<ConversionError>,
    },
}

/// A type name that is not one of the supported column types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown column type {0}")]
pub struct UnknownColumnType(pub String);

/// The scalar logical types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    TinyInt,
    Float,
    Boolean,
    Date,
    DateTime,
    Varchar255,
    Varchar45,
    Blob,
}

impl ScalarType {
    /// The type name as written in `column_types`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::TinyInt => "TINYINT",
            Self::Float => "FLOAT",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Varchar255 => "VARCHAR(255)",
            Self::Varchar45 => "VARCHAR(45)",
            Self::Blob => "BLOB",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "INT" => Self::Int,
            "TINYINT" => Self::TinyInt,
            "FLOAT" => Self::Float,
            "BOOLEAN" => Self::Boolean,
            "DATE" => Self::Date,
            "DATETIME" => Self::DateTime,
            "VARCHAR(255)" => Self::Varchar255,
            "VARCHAR(45)" => Self::Varchar45,
            "BLOB" => Self::Blob,
            _ => return None,
        })
    }

    /// Whether `Array(T)` is a supported column type for this `T`.
    fn is_array_element(&self) -> bool {
        matches!(
            self,
            Self::Varchar255 | Self::Int | Self::Float | Self::Boolean | Self::Date | Self::DateTime
        )
    }

    /// Returns true if `value` already has this type's native representation.
    /// Booleans are never native integers.
    pub fn is_native(&self, value: &Value) -> bool {
        match self {
            Self::Int | Self::TinyInt => matches!(value, Value::Number(n) if !n.is_f64()),
            Self::Float => matches!(value, Value::Number(n) if n.is_f64()),
            Self::Boolean => value.is_boolean(),
            Self::Date | Self::DateTime => false,
            Self::Varchar255 | Self::Varchar45 | Self::Blob => value.is_string(),
        }
    }

    /// Convert `value` to this type.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when the value has no representation in
    /// this type. Text types never fail.
    pub fn coerce(&self, value: &Value) -> Result<Coerced, ConversionError> {
        let target = self.name();
        match self {
            Self::Int | Self::TinyInt => to_int(value, target).map(Coerced::Int),
            Self::Float => to_float(value, target).map(Coerced::Float),
            Self::Boolean => to_bool(value, target).map(Coerced::Bool),
            Self::Date => {
                let text = temporal_text(value, target)?;
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(Coerced::Date)
                    .map_err(|e| ConversionError::Temporal {
                        target,
                        text: text.to_string(),
                        format: "YYYY-MM-DD",
                        reason: e.to_string(),
                    })
            }
            Self::DateTime => {
                let text = temporal_text(value, target)?;
                NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
                    .map(Coerced::DateTime)
                    .map_err(|e| ConversionError::Temporal {
                        target,
                        text: text.to_string(),
                        format: "YYYY-MM-DDTHH:MM:SS",
                        reason: e.to_string(),
                    })
            }
            Self::Varchar255 | Self::Varchar45 | Self::Blob => Ok(Coerced::Text(value::render(value))),
        }
    }
}

/// A declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Scalar(ScalarType),
    Array(ScalarType),
}

impl ColumnType {
    /// Returns true for `Array(VARCHAR(255))`, whose coercions are
    /// reported as info rather than warnings.
    pub fn is_text_array(&self) -> bool {
        matches!(self, Self::Array(ScalarType::Varchar255))
    }

    /// Decide how `value` relates to this type.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if the value (or, for arrays, any
    /// element) cannot be converted.
    pub fn conform(&self, value: &Value) -> Result<Conformance, ConversionError> {
        match self {
            Self::Scalar(ty) => {
                if ty.is_native(value) {
                    Ok(Conformance::Native)
                } else {
                    ty.coerce(value).map(Conformance::Coerced)
                }
            }
            Self::Array(ty) => {
                let (items, native) = match value {
                    Value::Array(items) => (
                        items.iter().collect::<Vec<_>>(),
                        items.iter().all(|item| ty.is_native(item)),
                    ),
                    scalar => (vec![scalar], false),
                };

                let coerced = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        ty.coerce(item).map_err(|e| ConversionError::Element {
                            index,
                            source: Box::new(e),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                if native {
                    Ok(Conformance::Native)
                } else {
                    Ok(Conformance::Coerced(Coerced::List(coerced)))
                }
            }
        }
    }
}

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownColumnType(s.to_string());
        match s.strip_prefix("Array(").and_then(|rest| rest.strip_suffix(')')) {
            Some(inner) => ScalarType::from_name(inner)
                .filter(ScalarType::is_array_element)
                .map(Self::Array)
                .ok_or_else(unknown),
            None => ScalarType::from_name(s).map(Self::Scalar).ok_or_else(unknown),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => f.write_str(ty.name()),
            Self::Array(ty) => write!(f, "Array({})", ty.name()),
        }
    }
}

/// How a value relates to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Conformance {
    /// The value already has the native representation.
    Native,
    /// The value converted successfully.
    Coerced(Coerced),
}

/// The result of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Int(i128),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
    List(Vec<Coerced>),
}

/// Convert a value to an integer.
pub fn to_int(value: &Value, target: &'static str) -> Result<i128, ConversionError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(i128::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.is_finite() && f.trunc().abs() < I128_FLOAT_LIMIT {
                    Ok(f.trunc() as i128)
                } else {
                    Err(ConversionError::OutOfRange {
                        value: n.to_string(),
                        target,
                    })
                }
            }
        }
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::String(s) => s.trim().parse::<i128>().map_err(|_| ConversionError::InvalidLiteral {
            target,
            text: s.clone(),
        }),
        other => Err(ConversionError::Unsupported {
            kind: value::kind(other),
            target,
        }),
    }
}

/// Convert a value to a float.
pub fn to_float(value: &Value, target: &'static str) -> Result<f64, ConversionError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| ConversionError::OutOfRange {
            value: n.to_string(),
            target,
        }),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| ConversionError::InvalidLiteral {
            target,
            text: s.clone(),
        }),
        other => Err(ConversionError::Unsupported {
            kind: value::kind(other),
            target,
        }),
    }
}

/// Convert a value to a boolean.
pub fn to_bool(value: &Value, target: &'static str) -> Result<bool, ConversionError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "t" | "y" | "yes" => Ok(true),
            "false" | "0" | "f" | "n" | "no" => Ok(false),
            _ => Err(ConversionError::InvalidLiteral {
                target,
                text: s.clone(),
            }),
        },
        other => Err(ConversionError::Unsupported {
            kind: value::kind(other),
            target,
        }),
    }
}

fn temporal_text<'v>(value: &'v Value, target: &'static str) -> Result<&'v str, ConversionError> {
    value.as_str().ok_or_else(|| ConversionError::Unsupported {
        kind: value::kind(value),
        target,
    })
}
