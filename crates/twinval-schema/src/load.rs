//! # Document Loading
//!
//! Reads schema and data documents from disk into the raw
//! `serde_json::Value` model the validators accept. The format is chosen
//! from the file extension: `.yaml`/`.yml` is YAML, anything else JSON.
//!
//! YAML has a richer type system than JSON (tags, anchors, non-string keys),
//! but schema and data documents use only the JSON-compatible subset. YAML
//! values are converted to the equivalent JSON value tree; tags are dropped
//! and scalar map keys are stringified.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use twinval_core::DocumentKind;

/// Error loading a schema or data document.
#[derive(Error, Debug)]
pub enum DocumentLoadError {
    /// The file could not be read.
    #[error("cannot read {document} document '{}': {source}", .path.display())]
    Read {
        /// Which document was being loaded.
        document: DocumentKind,
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file content could not be parsed.
    #[error("invalid {format} in {document} document '{}': {reason}", .path.display())]
    Parse {
        /// Which document was being loaded.
        document: DocumentKind,
        /// Path of the file.
        path: PathBuf,
        /// Format the content was parsed as.
        format: DocumentFormat,
        /// Parser error message.
        reason: String,
    },
}

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Read and parse a document file.
///
/// # Errors
///
/// Returns [`DocumentLoadError::Read`] if the file cannot be read and
/// [`DocumentLoadError::Parse`] if its content is not valid JSON/YAML.
pub fn load_document(path: &Path, document: DocumentKind) -> Result<Value, DocumentLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentLoadError::Read {
        document,
        path: path.to_path_buf(),
        source,
    })?;

    let format = DocumentFormat::from_path(path);
    let value = parse_document(&content, format).map_err(|reason| DocumentLoadError::Parse {
        document,
        path: path.to_path_buf(),
        format,
        reason,
    })?;

    tracing::debug!(%document, path = %path.display(), %format, "loaded document");
    Ok(value)
}

/// Parse document text in the given format.
///
/// # Errors
///
/// Returns the parser's message if the text is malformed or a YAML value
/// has no JSON equivalent.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Value, String> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| e.to_string())?;
            yaml_to_json_value(&yaml)
        }
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
