//! # twinval-cli — Command-Line Front End
//!
//! Provides the `twinval` command-line interface over the validation
//! engine. The binary is a thin host: it loads the two documents, runs the
//! engine, renders the findings and turns the outcome into an exit code.
//!
//! ## Subcommands
//!
//! - `twinval validate SCHEMA DATA` runs the full pipeline.
//! - `twinval check-schema SCHEMA` runs only schema structural validation.
//!
//! ```bash
//! twinval validate schema.json plant.yaml --format json --fail-on warning
//! twinval validate schema.json plant.json --only foreign_keys --only properties
//! twinval -vv check-schema schema.json
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | no findings at or above the failure threshold |
//! | 1 | findings at or above the threshold, or a structural failure |
//! | 2 | operational error (unreadable document, bad configuration) |

pub mod config;
pub mod render;
pub mod validate;

/// Exit code for a clean run.
pub const EXIT_OK: u8 = 0;

/// Exit code when validation fails.
pub const EXIT_FINDINGS: u8 = 1;

/// Exit code for operational errors.
pub const EXIT_OPERATIONAL: u8 = 2;
