//! # twinval-engine — Schema/Data Cross-Validation
//!
//! The validation engine proper. Given a schema document and a data
//! document, it produces a categorized set of findings without touching
//! either input.
//!
//! ## Architecture
//!
//! - **Type coercion** (`coerce`): decides whether a raw value has a column
//!   type's native representation, can be coerced into it, or is
//!   incompatible. Type names dispatch through [`ColumnType`].
//!
//! - **Property constraints** (`constraint`): the regex, nullable and bound
//!   predicates, dispatched through [`Constraint`].
//!
//! - **Cross-checks** (`checks`): the five passes that walk the data against
//!   the trusted schema. Each is a plain function of the schema, the data
//!   and the run's collector.
//!
//! - **Orchestrator** (`engine`): [`Validator`] runs structural validation
//!   then the configured cross-checks in canonical order, reporting progress
//!   to an optional [`ProgressObserver`].
//!
//! ## Concurrency
//!
//! A run is synchronous and single-threaded. Every run owns its
//! [`FindingCollector`](twinval_core::FindingCollector); a [`Validator`] holds
//! only configuration and can be shared between threads.
//!
//! ## Crate Policy
//!
//! - Depends on `twinval-core` and `twinval-schema` internally.
//! - Content findings never fail a run. Only the structural validators
//!   return errors.

pub mod checks;
pub mod coerce;
pub mod constraint;
pub mod engine;

pub use checks::{CheckContext, CheckKind, UnknownCheck};
pub use coerce::{ColumnType, Conformance, ConversionError, ScalarType, UnknownColumnType};
pub use constraint::{Constraint, ConstraintError, ConstraintEvaluator};
pub use engine::{EngineConfig, NoProgress, ProgressObserver, Stage, ValidationReport, Validator};
