//! # Error Types — Structural Failure Signal
//!
//! A validation run has exactly one fatal outcome: an input document that
//! does not have the minimal shape the cross-checks rely on. Everything else
//! (unknown names, failed coercions, unmatched references) is a content
//! finding recorded in the [`FindingCollector`](crate::FindingCollector) and
//! never aborts the run.
//!
//! ## Design
//!
//! - The structural validators accumulate every violation as a
//!   `structural_error` finding first, then return a [`StructuralError`]
//!   carrying only the count. The findings themselves stay in the collector.
//! - Messages are lower-case and carry no trailing punctuation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two input documents a failure or finding refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// The declarative schema (tables, columns, type lookup tables).
    Schema,
    /// The dataset (class name to list of objects).
    Data,
}

impl DocumentKind {
    /// Returns the lower-case identifier used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An input document failed structural validation.
///
/// Raised only after every violation in the document has been recorded.
/// Later passes are skipped because they assume the shape this error
/// reports as missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The schema document is malformed.
    #[error("schema invalid: {violations} structural error(s) recorded")]
    SchemaInvalid {
        /// Number of structural findings recorded for the schema.
        violations: usize,
    },

    /// The data document is malformed.
    #[error("data invalid: {violations} structural error(s) recorded")]
    DataInvalid {
        /// Number of structural findings recorded for the data.
        violations: usize,
    },
}

impl StructuralError {
    /// Build the failure signal for the given document.
    pub fn for_document(document: DocumentKind, violations: usize) -> Self {
        match document {
            DocumentKind::Schema => Self::SchemaInvalid { violations },
            DocumentKind::Data => Self::DataInvalid { violations },
        }
    }

    /// The document that failed.
    pub fn document(&self) -> DocumentKind {
        match self {
            Self::SchemaInvalid { .. } => DocumentKind::Schema,
            Self::DataInvalid { .. } => DocumentKind::Data,
        }
    }

    /// Number of structural findings recorded before failing.
    pub fn violations(&self) -> usize {
        match self {
            Self::SchemaInvalid { violations } | Self::DataInvalid { violations } => *violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_document_round_trips_kind() {
        let err = StructuralError::for_document(DocumentKind::Data, 3);
        assert_eq!(err.document(), DocumentKind::Data);
        assert_eq!(err.violations(), 3);
        assert!(matches!(err, StructuralError::DataInvalid { violations: 3 }));
    }

    #[test]
    fn test_display_names_document() {
        let err = StructuralError::SchemaInvalid { violations: 2 };
        assert_eq!(err.to_string(), "schema invalid: 2 structural error(s) recorded");
    }
}
