//! # Schema - The Table Registry
//!
//! Tables refer to one another by id, an index into the registry, so a
//! `Monster` may hold an `enemy: Monster` or a `[Monster]` without any
//! cycle of owned descriptors. Ids are positions in the table list, which
//! lets a table name a table declared after it.
//!
//! ```ignore
//! // Weapon = 0, Monster = 1
//! let monster = TableSchema::new(
//!     "Monster",
//!     vec![
//!         FieldDef::new("name", FieldType::String),
//!         FieldDef::new("enemy", FieldType::Table(1)),
//!         FieldDef::new("weapons", FieldType::Vector(ElemType::Table(0))),
//!     ],
//! )?;
//! let schema = Schema::new(vec![weapon, monster], "Monster")?;
//! ```

use eyre::Result;
use hashbrown::HashMap;

use crate::error::FlatError;
use crate::schema::table::TableSchema;
use crate::schema::types::{ElemType, FieldType};

#[derive(Debug, Clone)]
pub struct Schema {
    tables: Vec<TableSchema>,
    by_name: HashMap<String, usize>,
    root: usize,
}

impl Schema {
    /// Checks that table names are unique and that every table id a field
    /// refers to exists.
    pub fn new(tables: Vec<TableSchema>, root: &str) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(tables.len());
        for (id, table) in tables.iter().enumerate() {
            if by_name.insert(table.name().to_string(), id).is_some() {
                return Err(FlatError::schema_mismatch(format!(
                    "duplicate table {}",
                    table.name()
                )));
            }
        }

        for table in &tables {
            for field in table.fields() {
                for id in field.field_type().table_refs() {
                    if id >= tables.len() {
                        return Err(FlatError::schema_mismatch(format!(
                            "{}.{} refers to table #{}, schema has {} tables",
                            table.name(),
                            field.name(),
                            id,
                            tables.len()
                        )));
                    }
                }
            }
        }

        let root = *by_name.get(root).ok_or_else(|| {
            FlatError::schema_mismatch(format!("root table {} is not in the schema", root))
        })?;

        Ok(Self {
            tables,
            by_name,
            root,
        })
    }

    /// A schema of one table, which is also its root.
    pub fn single(table: TableSchema) -> Result<Self> {
        let root = table.name().to_string();
        Self::new(vec![table], &root)
    }

    pub fn root_id(&self) -> usize {
        self.root
    }

    pub fn root(&self) -> &TableSchema {
        &self.tables[self.root]
    }

    pub fn table(&self, id: usize) -> Option<&TableSchema> {
        self.tables.get(id)
    }

    pub fn table_by_id(&self, id: usize) -> Result<&TableSchema> {
        self.table(id).ok_or_else(|| {
            FlatError::schema_mismatch(format!(
                "no table #{} in a schema of {} tables",
                id,
                self.tables.len()
            ))
        })
    }

    pub fn table_id(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn resolve_table(&self, name: &str) -> Result<&TableSchema> {
        let id = self
            .table_id(name)
            .ok_or_else(|| FlatError::schema_mismatch(format!("no table named {}", name)))?;
        Ok(&self.tables[id])
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Like [`FieldType::describe`], with tables named.
    pub fn describe(&self, field_type: &FieldType) -> String {
        let name = |id: usize| self.table(id).map_or("?", TableSchema::name).to_string();
        match field_type {
            FieldType::Table(id) => name(*id),
            FieldType::Vector(ElemType::Table(id)) => format!("[{}]", name(*id)),
            FieldType::Nested(id) => format!("nested {}", name(*id)),
            other => other.describe(),
        }
    }
}
