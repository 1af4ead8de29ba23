//! # Cross-Reference Checks
//!
//! Five independent passes over a validated schema and dataset. Each pass
//! reads only the schema and the data, never the findings other passes
//! recorded, so their order affects only the order of messages within a
//! severity bucket.
//!
//! | Pass | Module | Records |
//! |------|--------|---------|
//! | table names | [`table_names`] | warning for unknown classes, info for absent tables |
//! | column names | [`column_names`] | warning for unknown attributes, info per object for absent columns |
//! | foreign keys | [`foreign_keys`] | deduplicated warnings for missing tables and unmatched values |
//! | column types | [`column_types`] | warning/info for coercions, error for incompatible values |
//! | properties | [`properties`] | error for failed or invalid constraints |

pub mod column_names;
pub mod column_types;
pub mod foreign_keys;
pub mod properties;
pub mod table_names;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use twinval_core::FindingCollector;
use twinval_schema::{DataClass, Dataset, SchemaCatalog, Table};

/// What every pass reads: the indexed schema and the dataset.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub catalog: &'a SchemaCatalog<'a>,
    pub data: &'a Dataset,
}

impl<'a> CheckContext<'a> {
    pub fn new(catalog: &'a SchemaCatalog<'a>, data: &'a Dataset) -> Self {
        Self { catalog, data }
    }

    /// Data classes that have a schema table of the same name, paired with
    /// that table, in data order.
    pub fn known_classes(&self) -> impl Iterator<Item = (&'a DataClass, &'a Table)> + 'a {
        let catalog = self.catalog;
        self.data
            .classes()
            .iter()
            .filter_map(move |class| catalog.table(&class.name).map(|table| (class, table)))
    }
}

/// The cross-checks, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    TableNames,
    ColumnNames,
    ForeignKeys,
    ColumnTypes,
    Properties,
}

impl CheckKind {
    /// Every check in the order the orchestrator runs them.
    pub const CANONICAL: [CheckKind; 5] = [
        CheckKind::TableNames,
        CheckKind::ColumnNames,
        CheckKind::ForeignKeys,
        CheckKind::ColumnTypes,
        CheckKind::Properties,
    ];

    /// Human-readable stage name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TableNames => "Table Names",
            Self::ColumnNames => "Column Names",
            Self::ForeignKeys => "Foreign Keys",
            Self::ColumnTypes => "Column Types",
            Self::Properties => "Properties",
        }
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableNames => "table_names",
            Self::ColumnNames => "column_names",
            Self::ForeignKeys => "foreign_keys",
            Self::ColumnTypes => "column_types",
            Self::Properties => "properties",
        }
    }

    /// Run this pass, appending its findings.
    pub fn run(self, ctx: &CheckContext<'_>, findings: &mut FindingCollector) {
        match self {
            Self::TableNames => table_names::check(ctx, findings),
            Self::ColumnNames => column_names::check(ctx, findings),
            Self::ForeignKeys => foreign_keys::check(ctx, findings),
            Self::ColumnTypes => column_types::check(ctx, findings),
            Self::Properties => properties::check(ctx, findings),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A check identifier that names none of the cross-checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown check: {0:?} (expected table_names, column_names, foreign_keys, column_types or properties)")]
pub struct UnknownCheck(pub String);

impl FromStr for CheckKind {
    type Err = UnknownCheck;

    /// Parse a check from its snake_case identifier. Hyphenated spellings
    /// are accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "table_names" => Ok(Self::TableNames),
            "column_names" => Ok(Self::ColumnNames),
            "foreign_keys" => Ok(Self::ForeignKeys),
            "column_types" => Ok(Self::ColumnTypes),
            "properties" => Ok(Self::Properties),
            _ => Err(UnknownCheck(s.to_string())),
        }
    }
}
