//! # twinval-core — Foundational Types for twinval
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace: how severe a finding is, where findings accumulate during a
//! validation run, and how a structural failure is signalled to the caller.
//! It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One collector per run.** [`FindingCollector`] is an append-only sink
//!    owned by a single validation run. There is no global logger and no
//!    interior mutability; passes receive it by `&mut`.
//!
//! 2. **Severity is part of the output contract.** [`Severity`] has exactly
//!    four variants and every consumer matches on it exhaustively.
//!    Presentation layers may group or style findings but never reclassify
//!    them.
//!
//! 3. **Raw values stay raw.** Data and schema values are carried as
//!    `serde_json::Value`, an explicit tagged union. [`value::render`]
//!    is the single place that decides how a value reads inside a message.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `twinval-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod finding;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{DocumentKind, StructuralError};
pub use finding::{FindingCollector, GroupedFinding, Severity, Summary};
