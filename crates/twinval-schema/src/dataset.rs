//! # Dataset and the Data Structural Validator
//!
//! The data document maps class names to lists of objects; each object maps
//! attribute names to raw values. No uuids appear in data, so every match
//! against the schema is by name.

use std::collections::HashMap;

use serde_json::{Map, Value};
use twinval_core::{FindingCollector, Severity, StructuralError};

/// One object of a class: attribute name to raw value, in document order.
pub type DataObject = Map<String, Value>;

/// A named group of data objects.
#[derive(Debug, Clone, PartialEq)]
pub struct DataClass {
    pub name: String,
    pub objects: Vec<DataObject>,
}

/// A structurally valid data document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    classes: Vec<DataClass>,
    index: HashMap<String, usize>,
}

impl Dataset {
    /// Build a dataset from classes in document order.
    pub fn new(classes: Vec<DataClass>) -> Self {
        let mut index = HashMap::new();
        for (i, class) in classes.iter().enumerate() {
            index.entry(class.name.clone()).or_insert(i);
        }
        Self { classes, index }
    }

    /// Classes in document order.
    pub fn classes(&self) -> &[DataClass] {
        &self.classes
    }

    /// Look up a class by name.
    pub fn class(&self, name: &str) -> Option<&DataClass> {
        self.index.get(name).map(|&i| &self.classes[i])
    }

    /// Returns true if the data contains a class called `name`.
    pub fn contains_class(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if the data has no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total number of objects across all classes.
    pub fn object_count(&self) -> usize {
        self.classes.iter().map(|c| c.objects.len()).sum()
    }
}

/// Validate the structure of a data document.
///
/// A non-mapping document fails immediately. Otherwise every class whose
/// value is not a list, and every list element that is not a mapping, is
/// recorded as its own structural finding before failing.
///
/// # Errors
///
/// Returns [`StructuralError::DataInvalid`] carrying the number of
/// structural findings recorded.
pub fn validate_data(
    data: &Value,
    findings: &mut FindingCollector,
) -> Result<Dataset, StructuralError> {
    let Some(root) = data.as_object() else {
        findings.record(
            Severity::Structural,
            "Data must be a mapping of class names to lists of objects",
        );
        tracing::warn!(violations = 1, "data failed structural validation");
        return Err(StructuralError::DataInvalid { violations: 1 });
    };

    let mut violations = 0usize;
    let mut classes = Vec::with_capacity(root.len());

    for (class_name, objects) in root {
        let Some(objects) = objects.as_array() else {
            findings.record(
                Severity::Structural,
                format!("The value for class '{class_name}' should be a list of objects"),
            );
            violations += 1;
            continue;
        };

        let mut typed = Vec::with_capacity(objects.len());
        for (index, object) in objects.iter().enumerate() {
            match object {
                Value::Object(map) => typed.push(map.clone()),
                _ => {
                    findings.record(
                        Severity::Structural,
                        format!("Object #{index} in class '{class_name}' should be a mapping"),
                    );
                    violations += 1;
                }
            }
        }
        classes.push(DataClass {
            name: class_name.clone(),
            objects: typed,
        });
    }

    if violations > 0 {
        tracing::warn!(violations, "data failed structural validation");
        return Err(StructuralError::DataInvalid { violations });
    }

    Ok(Dataset::new(classes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_data_preserves_order() {
        let mut findings = FindingCollector::new();
        let data = validate_data(
            &json!({"Valve": [{"id": 1}], "Pump": [], "Tank": [{"id": 2}, {"id": 3}]}),
            &mut findings,
        )
        .unwrap();

        assert!(findings.is_empty());
        let names: Vec<&str> = data.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Valve", "Pump", "Tank"]);
        assert_eq!(data.object_count(), 3);
        assert!(data.contains_class("Pump"));
        assert_eq!(data.class("Tank").map(|c| c.objects.len()), Some(2));
    }

    #[test]
    fn test_non_mapping_fails_immediately() {
        let mut findings = FindingCollector::new();
        let err = validate_data(&json!([{"id": 1}]), &mut findings).unwrap_err();
        assert_eq!(err, StructuralError::DataInvalid { violations: 1 });
        assert_eq!(findings.structural_errors().len(), 1);
    }

    #[test]
    fn test_one_finding_per_offending_element() {
        let mut findings = FindingCollector::new();
        let err = validate_data(
            &json!({
                "Pump": [{"id": 1}, 5, "x", {"id": 2}],
                "Valve": {"id": 3},
                "Tank": [null]
            }),
            &mut findings,
        )
        .unwrap_err();

        assert_eq!(err.violations(), 4);
        assert_eq!(
            findings.structural_errors(),
            [
                "Object #1 in class 'Pump' should be a mapping",
                "Object #2 in class 'Pump' should be a mapping",
                "The value for class 'Valve' should be a list of objects",
                "Object #0 in class 'Tank' should be a mapping",
            ]
        );
    }

    #[test]
    fn test_empty_data_is_valid() {
        let mut findings = FindingCollector::new();
        let data = validate_data(&json!({}), &mut findings).unwrap();
        assert!(data.is_empty());
        assert!(findings.is_empty());
    }
}
