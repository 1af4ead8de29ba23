//! # Findings — Severities and the Per-Run Collector
//!
//! Every discrepancy the engine reports is a human-readable message filed
//! under one of four severities. The [`FindingCollector`] keeps one ordered,
//! append-only list per severity, in the order passes recorded them.
//!
//! ## Severity Contract
//!
//! | Severity | Meaning |
//! |----------|---------|
//! | `structural_error` | the input document itself is malformed; the run cannot proceed |
//! | `error` | a value definitively violates the schema (incompatible type, failed constraint, unknown type) |
//! | `warning` | a value was accepted but is suspicious or needed silent correction |
//! | `info` | a benign, expected-but-absent condition |
//!
//! Consumers may group identical messages ([`FindingCollector::grouped`]) or
//! style them per severity, but the classification is part of the output
//! contract and must not be altered.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four finding severities, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Benign absence (declared-but-missing column, class absent from data).
    Info,
    /// Accepted but suspicious (coercion succeeded, unmatched reference).
    Warning,
    /// Definitive violation (incompatible type, failed constraint).
    Error,
    /// Malformed input document.
    #[serde(rename = "structural_error")]
    Structural,
}

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Structural,
    ];

    /// All severities in report order, most severe first.
    pub const REPORT_ORDER: [Severity; 4] = [
        Severity::Structural,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
    ];

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Structural => "structural_error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A severity identifier that does not name one of the four severities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity: {0:?} (expected info, warning, error or structural_error)")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    /// Parse a severity from its snake_case identifier. `warnings` and
    /// `errors` are accepted as aliases for the bucket names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" | "warnings" => Ok(Self::Warning),
            "error" | "errors" => Ok(Self::Error),
            "structural_error" | "structural_errors" | "structural" => Ok(Self::Structural),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// One distinct message and how many times it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedFinding<'a> {
    /// The message text.
    pub message: &'a str,
    /// Number of identical recordings.
    pub count: usize,
}

/// Finding counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of structural errors.
    pub structural_errors: usize,
    /// Number of errors.
    pub errors: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Number of info notices.
    pub info: usize,
}

impl Summary {
    /// Total number of findings across all severities.
    pub fn total(&self) -> usize {
        self.structural_errors + self.errors + self.warnings + self.info
    }
}

/// Append-only sink for the findings of a single validation run.
///
/// Owned exclusively by one run. Running validations concurrently requires
/// one collector per run; nothing here is shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingCollector {
    structural_errors: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Vec<String>,
}

impl FindingCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding to the bucket for `severity`.
    pub fn record(&mut self, severity: Severity, message: impl Into<String>) {
        self.bucket_mut(severity).push(message.into());
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<String> {
        match severity {
            Severity::Info => &mut self.info,
            Severity::Warning => &mut self.warnings,
            Severity::Error => &mut self.errors,
            Severity::Structural => &mut self.structural_errors,
        }
    }

    /// The messages recorded at `severity`, in recording order.
    pub fn bucket(&self, severity: Severity) -> &[String] {
        match severity {
            Severity::Info => &self.info,
            Severity::Warning => &self.warnings,
            Severity::Error => &self.errors,
            Severity::Structural => &self.structural_errors,
        }
    }

    /// Info notices.
    pub fn info(&self) -> &[String] {
        &self.info
    }

    /// Warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Errors.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Structural errors.
    pub fn structural_errors(&self) -> &[String] {
        &self.structural_errors
    }

    /// Number of findings recorded at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.bucket(severity).len()
    }

    /// Total number of findings.
    pub fn len(&self) -> usize {
        Severity::ALL.iter().map(|s| self.count(*s)).sum()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if any finding at `threshold` or above was recorded.
    pub fn has_at_least(&self, threshold: Severity) -> bool {
        Severity::ALL
            .iter()
            .filter(|s| **s >= threshold)
            .any(|s| self.count(*s) > 0)
    }

    /// Per-severity counts.
    pub fn summary(&self) -> Summary {
        Summary {
            structural_errors: self.structural_errors.len(),
            errors: self.errors.len(),
            warnings: self.warnings.len(),
            info: self.info.len(),
        }
    }

    /// All findings in report order (most severe bucket first, recording
    /// order within a bucket).
    pub fn iter(&self) -> impl Iterator<Item = (Severity, &str)> + '_ {
        Severity::REPORT_ORDER.into_iter().flat_map(move |severity| {
            self.bucket(severity)
                .iter()
                .map(move |message| (severity, message.as_str()))
        })
    }

    /// The bucket for `severity` with identical messages collapsed, in
    /// first-seen order.
    pub fn grouped(&self, severity: Severity) -> Vec<GroupedFinding<'_>> {
        let mut groups: Vec<GroupedFinding<'_>> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for message in self.bucket(severity) {
            match index.get(message.as_str()) {
                Some(&i) => groups[i].count += 1,
                None => {
                    index.insert(message.as_str(), groups.len());
                    groups.push(GroupedFinding {
                        message: message.as_str(),
                        count: 1,
                    });
                }
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_routes_to_bucket() {
        let mut findings = FindingCollector::new();
        findings.record(Severity::Info, "a");
        findings.record(Severity::Warning, "b");
        findings.record(Severity::Error, "c");
        findings.record(Severity::Structural, "d");

        assert_eq!(findings.info(), ["a"]);
        assert_eq!(findings.warnings(), ["b"]);
        assert_eq!(findings.errors(), ["c"]);
        assert_eq!(findings.structural_errors(), ["d"]);
        assert_eq!(findings.len(), 4);
    }

    #[test]
    fn test_empty_collector() {
        let findings = FindingCollector::new();
        assert!(findings.is_empty());
        assert_eq!(findings.summary().total(), 0);
        assert!(!findings.has_at_least(Severity::Info));
    }

    #[test]
    fn test_has_at_least_respects_ordering() {
        let mut findings = FindingCollector::new();
        findings.record(Severity::Warning, "w");
        assert!(findings.has_at_least(Severity::Info));
        assert!(findings.has_at_least(Severity::Warning));
        assert!(!findings.has_at_least(Severity::Error));
    }

    #[test]
    fn test_grouped_preserves_first_seen_order() {
        let mut findings = FindingCollector::new();
        for m in ["x", "y", "x", "z", "x", "y"] {
            findings.record(Severity::Info, m);
        }
        let grouped = findings.grouped(Severity::Info);
        let pairs: Vec<(&str, usize)> = grouped.iter().map(|g| (g.message, g.count)).collect();
        assert_eq!(pairs, vec![("x", 3), ("y", 2), ("z", 1)]);
    }

    #[test]
    fn test_iter_uses_report_order() {
        let mut findings = FindingCollector::new();
        findings.record(Severity::Info, "i");
        findings.record(Severity::Structural, "s");
        findings.record(Severity::Warning, "w");
        let order: Vec<Severity> = findings.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Severity::Structural, Severity::Warning, Severity::Info]);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("errors".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!(
            "structural_error".parse::<Severity>().unwrap(),
            Severity::Structural
        );
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_serialized_bucket_names() {
        let mut findings = FindingCollector::new();
        findings.record(Severity::Structural, "s");
        let json = serde_json::to_value(&findings).unwrap();
        assert_eq!(json["structural_errors"][0], "s");
        assert!(json["warnings"].as_array().unwrap().is_empty());
        assert_eq!(
            serde_json::to_value(Severity::Structural).unwrap(),
            "structural_error"
        );
    }
}
