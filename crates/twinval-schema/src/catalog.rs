//! # Schema Catalog
//!
//! Lookup indexes over a validated [`Schema`]. The schema refers to tables,
//! columns and type definitions by opaque uuid; the data refers to tables and
//! columns by name. The catalog answers both kinds of question without
//! re-scanning the table list for every attribute of every object.
//!
//! When names or uuids repeat, the first declaration wins.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Column, Relationship, Schema, Table, TypeDef};

/// A relationship whose target does not resolve in the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    /// No table has the referenced uuid.
    #[error("table uuid '{table_uuid}' does not match any schema table")]
    Table {
        /// The unresolved table uuid.
        table_uuid: String,
    },

    /// The table exists but has no column with the referenced uuid.
    #[error("column uuid '{column_uuid}' does not match any column of table '{table}'")]
    Column {
        /// Name of the resolved table.
        table: String,
        /// The unresolved column uuid.
        column_uuid: String,
    },
}

/// Name and uuid indexes over a validated schema.
#[derive(Debug, Clone)]
pub struct SchemaCatalog<'a> {
    schema: &'a Schema,
    tables_by_name: HashMap<&'a str, &'a Table>,
    tables_by_uuid: HashMap<&'a str, &'a Table>,
    column_types: HashMap<&'a str, &'a str>,
    property_types: HashMap<&'a str, &'a str>,
}

impl<'a> SchemaCatalog<'a> {
    /// Index a validated schema.
    pub fn new(schema: &'a Schema) -> Self {
        let mut tables_by_name = HashMap::with_capacity(schema.tables.len());
        let mut tables_by_uuid = HashMap::with_capacity(schema.tables.len());
        for table in &schema.tables {
            tables_by_name.entry(table.name.as_str()).or_insert(table);
            tables_by_uuid.entry(table.uuid.as_str()).or_insert(table);
        }

        Self {
            schema,
            tables_by_name,
            tables_by_uuid,
            column_types: name_index(&schema.column_types),
            property_types: name_index(&schema.property_types),
        }
    }

    /// The indexed schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Tables in schema order.
    pub fn tables(&self) -> &'a [Table] {
        &self.schema.tables
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&'a Table> {
        self.tables_by_name.get(name).copied()
    }

    /// Returns true if the schema declares a table called `name`.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables_by_name.contains_key(name)
    }

    /// Look up a table by uuid.
    pub fn table_by_uuid(&self, uuid: &str) -> Option<&'a Table> {
        self.tables_by_uuid.get(uuid).copied()
    }

    /// Resolve a column's type uuid to the type name in `column_types`.
    pub fn column_type_name(&self, uuid: &str) -> Option<&'a str> {
        self.column_types.get(uuid).copied()
    }

    /// Resolve a uuid to the type name in `property_types`.
    pub fn property_type_name(&self, uuid: &str) -> Option<&'a str> {
        self.property_types.get(uuid).copied()
    }

    /// Resolve a relationship to its target table and column.
    ///
    /// # Errors
    ///
    /// Returns [`DanglingReference`] naming whichever half of the reference
    /// does not resolve.
    pub fn resolve(
        &self,
        relationship: &Relationship,
    ) -> Result<(&'a Table, &'a Column), DanglingReference> {
        let table = self.table_by_uuid(&relationship.table_uuid).ok_or_else(|| {
            DanglingReference::Table {
                table_uuid: relationship.table_uuid.clone(),
            }
        })?;
        let column = table
            .column_by_uuid(&relationship.column_uuid)
            .ok_or_else(|| DanglingReference::Column {
                table: table.name.clone(),
                column_uuid: relationship.column_uuid.clone(),
            })?;
        Ok((table, column))
    }
}

fn name_index(defs: &[TypeDef]) -> HashMap<&str, &str> {
    let mut index = HashMap::with_capacity(defs.len());
    for def in defs {
        index.entry(def.uuid.as_str()).or_insert(def.name.as_str());
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        serde_json::from_value(json!({
            "version": "1", "release_date": "", "commentary": "",
            "tables": [
                {"uuid": "t-site", "name": "Site", "description": "", "type": "tt", "pos_x": 0, "pos_y": 0,
                 "columns": [{"uuid": "c-site-id", "name": "id", "description": "", "type": "ct-int",
                              "relationship": null, "properties": null}]},
                {"uuid": "t-pump", "name": "Pump", "description": "", "type": "tt", "pos_x": 0, "pos_y": 0,
                 "columns": [{"uuid": "c-pump-site", "name": "site", "description": "", "type": "ct-int",
                              "relationship": [{"table_uuid": "t-site", "column_uuid": "c-site-id"}],
                              "properties": null}]}
            ],
            "table_types": [{"uuid": "tt", "name": "Asset", "description": "", "color": "red"}],
            "column_types": [{"uuid": "ct-int", "name": "INT", "description": ""},
                             {"uuid": "ct-int", "name": "FLOAT", "description": ""}],
            "relationship_types": [],
            "property_types": [{"uuid": "pt-re", "name": "regex", "description": ""}]
        }))
        .unwrap()
    }

    #[test]
    fn test_lookups() {
        let schema = schema();
        let catalog = SchemaCatalog::new(&schema);
        assert!(catalog.has_table("Pump"));
        assert!(!catalog.has_table("pump"));
        assert_eq!(catalog.table_by_uuid("t-site").map(|t| t.name.as_str()), Some("Site"));
        assert_eq!(catalog.property_type_name("pt-re"), Some("regex"));
        assert_eq!(catalog.column_type_name("missing"), None);
    }

    #[test]
    fn test_first_type_definition_wins() {
        let schema = schema();
        let catalog = SchemaCatalog::new(&schema);
        assert_eq!(catalog.column_type_name("ct-int"), Some("INT"));
    }

    #[test]
    fn test_resolve_relationship() {
        let schema = schema();
        let catalog = SchemaCatalog::new(&schema);
        let rel = &schema.tables[1].columns[0].relationships()[0];
        let (table, column) = catalog.resolve(rel).unwrap();
        assert_eq!((table.name.as_str(), column.name.as_str()), ("Site", "id"));
    }

    #[test]
    fn test_resolve_dangling_relationship() {
        let schema = schema();
        let catalog = SchemaCatalog::new(&schema);

        let err = catalog
            .resolve(&Relationship {
                table_uuid: "t-gone".to_string(),
                column_uuid: "c-site-id".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, DanglingReference::Table { .. }));

        let err = catalog
            .resolve(&Relationship {
                table_uuid: "t-site".to_string(),
                column_uuid: "c-gone".to_string(),
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "column uuid 'c-gone' does not match any column of table 'Site'"
        );
    }
}
