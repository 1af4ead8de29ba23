//! # twinval-schema — Schema and Dataset Documents
//!
//! Turns the two untrusted input documents into typed values the
//! cross-checks can walk without re-checking shape at every step.
//!
//! ## Structural Validation (`shape`, `dataset`)
//!
//! - [`validate_schema`] confirms the schema document has every required
//!   key and list, records one `structural_error` finding per violation,
//!   and only then yields a typed [`Schema`].
//! - [`validate_data`] confirms the data document is a mapping of class
//!   name to list of objects and yields a [`Dataset`].
//!
//! Both accumulate every violation before failing. Neither stops at the
//! first problem.
//!
//! ## Lookups (`catalog`)
//!
//! [`SchemaCatalog`] indexes a validated schema by table name, table uuid
//! and type-definition uuid, and resolves relationships to their target
//! table and column.
//!
//! ## Loading (`load`)
//!
//! [`load_document`] reads a JSON or YAML file into a `serde_json::Value`.
//!
//! ## Crate Policy
//!
//! - Depends only on `twinval-core` internally.
//! - Typed values are only ever produced by the structural validators.

pub mod catalog;
pub mod dataset;
pub mod load;
pub mod model;
pub mod shape;

pub use catalog::{DanglingReference, SchemaCatalog};
pub use dataset::{validate_data, DataClass, DataObject, Dataset};
pub use load::{load_document, parse_document, DocumentFormat, DocumentLoadError};
pub use model::{Column, Property, Relationship, Schema, Table, TypeDef};
pub use shape::validate_schema;
