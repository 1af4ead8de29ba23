//! # Schema Model
//!
//! Typed view of a structurally valid schema document. Fields the engine
//! only checks for presence (`version`, `pos_x`, descriptions, ...) stay as
//! raw `serde_json::Value`; identifiers the cross-checks dereference are
//! strings.
//!
//! Values of these types are produced by [`validate_schema`](crate::validate_schema)
//! after the structural checks pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema version, presence only.
    pub version: Value,
    /// Release date, presence only.
    pub release_date: Value,
    /// Free-form commentary, presence only.
    pub commentary: Value,
    /// Tables in document order.
    pub tables: Vec<Table>,
    /// Table type lookup table.
    pub table_types: Vec<TypeDef>,
    /// Column type lookup table. Names drive type coercion.
    pub column_types: Vec<TypeDef>,
    /// Relationship type lookup table.
    pub relationship_types: Vec<TypeDef>,
    /// Property type lookup table.
    pub property_types: Vec<TypeDef>,
}

/// A schema table, matched against data classes by `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub uuid: String,
    pub name: String,
    pub description: Value,
    /// Reference into `table_types`.
    #[serde(rename = "type")]
    pub table_type: Value,
    pub pos_x: Value,
    pub pos_y: Value,
    pub columns: Vec<Column>,
}

impl Table {
    /// Look up a column by name. The first column wins on duplicates.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column by uuid.
    pub fn column_by_uuid(&self, uuid: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.uuid == uuid)
    }

    /// Returns true if the table declares a column called `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// A column of a schema table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub uuid: String,
    pub name: String,
    pub description: Value,
    /// Uuid of an entry in `column_types`.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Foreign-key targets, `None` when the document has `null`.
    pub relationship: Option<Vec<Relationship>>,
    /// Constraints, `None` when the document has `null`.
    pub properties: Option<Vec<Property>>,
}

impl Column {
    /// Foreign-key targets, empty when none are declared.
    pub fn relationships(&self) -> &[Relationship] {
        self.relationship.as_deref().unwrap_or(&[])
    }

    /// Declared constraints, empty when none are declared.
    pub fn constraints(&self) -> &[Property] {
        self.properties.as_deref().unwrap_or(&[])
    }
}

/// A foreign-key link to another table's column, by uuid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub table_uuid: String,
    pub column_uuid: String,
}

/// A per-column constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Constraint tag (`regex-prop`, ...) or a uuid into `property_types`.
    #[serde(rename = "type")]
    pub tag: String,
    /// Constraint parameter: a pattern, a boolean/string, or a numeric bound.
    pub value: Value,
}

/// An entry of one of the four type lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub uuid: String,
    pub name: String,
    pub description: Value,
    /// Required for `table_types` entries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(name: &str, uuid: &str) -> Column {
        Column {
            uuid: uuid.to_string(),
            name: name.to_string(),
            description: json!(""),
            column_type: "t-int".to_string(),
            relationship: None,
            properties: None,
        }
    }

    #[test]
    fn test_column_lookup_by_name_and_uuid() {
        let table = Table {
            uuid: "t1".to_string(),
            name: "Pump".to_string(),
            description: json!(""),
            table_type: json!("tt"),
            pos_x: json!(0),
            pos_y: json!(0),
            columns: vec![column("id", "c1"), column("flow", "c2")],
        };
        assert_eq!(table.column("flow").map(|c| c.uuid.as_str()), Some("c2"));
        assert_eq!(table.column_by_uuid("c1").map(|c| c.name.as_str()), Some("id"));
        assert!(!table.has_column("pressure"));
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "flow"]);
    }

    #[test]
    fn test_null_lists_deserialize_to_none() {
        let c: Column = serde_json::from_value(json!({
            "uuid": "c1", "name": "id", "description": null, "type": "t",
            "relationship": null, "properties": null
        }))
        .unwrap();
        assert!(c.relationship.is_none());
        assert!(c.relationships().is_empty());
        assert!(c.constraints().is_empty());
    }
}
