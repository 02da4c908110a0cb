//! # Table Schema
//!
//! ## Field Rules
//!
//! | Rule | Applies to |
//! |------|------------|
//! | default must match the field type | scalar fields |
//! | default has the enum's underlying type | enum fields |
//! | no default | string, vector, table, struct, union and nested fields |
//! | `required` | non-scalar, non-enum fields only |
//! | `key` | at most one per table, string fields only |
//!
//! A deprecated field keeps its id; it is never written and always reads
//! as [`Value::Absent`].
//!
//! ## Unions
//!
//! A union field named `equipped` occupies two ids: `equipped_type`, a `u8`
//! tag inserted right before it, and `equipped` itself. Declaring the union
//! is enough; the tag field is added by [`TableSchema::new`] and can be read
//! but not set on its own.

use eyre::Result;
use hashbrown::HashMap;

use crate::error::FlatError;
use crate::layout::check_field_count;
use crate::schema::types::{FieldType, ScalarType};
use crate::schema::value::Value;

#[derive(Debug, Clone)]
pub struct FieldDef {
    name: String,
    field_type: FieldType,
    default: Value<'static>,
    required: bool,
    deprecated: bool,
    key: bool,
    union_tag: bool,
}

impl FieldDef {
    /// A field with the implicit default: zero for scalars, absent otherwise.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let default = match field_type.scalar_type() {
            Some(t) => t.zero(),
            None => Value::Absent,
        };
        Self {
            name: name.into(),
            field_type,
            default,
            required: false,
            deprecated: false,
            key: false,
            union_tag: false,
        }
    }

    /// The `u8` tag field paired with `union`.
    fn union_tag_of(union: &FieldDef) -> Self {
        let mut tag = Self::new(
            format!("{}_type", union.name),
            FieldType::Scalar(ScalarType::UInt8),
        );
        tag.deprecated = union.deprecated;
        tag.union_tag = true;
        tag
    }

    pub fn with_default(mut self, default: impl Into<Value<'static>>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn with_key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn default(&self) -> &Value<'static> {
        &self.default
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn is_key(&self) -> bool {
        self.key
    }

    /// Whether this is the tag half of a union, written through the union.
    pub fn is_union_tag(&self) -> bool {
        self.union_tag
    }

    fn validate(&self, table: &str) -> Result<()> {
        match &self.field_type {
            FieldType::Scalar(t) => {
                if self.default.scalar_type() != Some(*t) {
                    return Err(FlatError::schema_mismatch(format!(
                        "default of {}.{} is {}, field is {}",
                        table,
                        self.name,
                        self.default.kind(),
                        t.name()
                    )));
                }
                if self.required {
                    return Err(FlatError::schema_mismatch(format!(
                        "scalar field {}.{} cannot be required",
                        table, self.name
                    )));
                }
            }
            FieldType::Enum(e) => {
                if self.default.scalar_type() != Some(e.underlying()) {
                    return Err(FlatError::schema_mismatch(format!(
                        "default of {}.{} is {}, field is {}",
                        table,
                        self.name,
                        self.default.kind(),
                        e.name()
                    )));
                }
                if self.required {
                    return Err(FlatError::schema_mismatch(format!(
                        "enum field {}.{} cannot be required",
                        table, self.name
                    )));
                }
            }
            other => {
                if !self.default.is_absent() {
                    return Err(FlatError::schema_mismatch(format!(
                        "{} field {}.{} cannot have a default",
                        other.describe(),
                        table,
                        self.name
                    )));
                }
            }
        }
        if self.key && !matches!(self.field_type, FieldType::String) {
            return Err(FlatError::schema_mismatch(format!(
                "key field {}.{} must be a string",
                table, self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    fields: Vec<FieldDef>,
    by_name: HashMap<String, usize>,
    key_field: Option<usize>,
}

impl TableSchema {
    /// Field ids are assigned by position in `fields`, after each union has
    /// been preceded by its tag field.
    pub fn new(name: impl Into<String>, declared: Vec<FieldDef>) -> Result<Self> {
        let name = name.into();
        let mut fields = Vec::with_capacity(declared.len());
        for field in declared {
            if matches!(field.field_type, FieldType::Union(_)) {
                fields.push(FieldDef::union_tag_of(&field));
            }
            fields.push(field);
        }
        check_field_count(fields.len())?;

        let mut by_name = HashMap::with_capacity(fields.len());
        let mut key_field = None;
        for (id, field) in fields.iter().enumerate() {
            field.validate(&name)?;
            if by_name.insert(field.name.clone(), id).is_some() {
                return Err(FlatError::schema_mismatch(format!(
                    "duplicate field {}.{}",
                    name, field.name
                )));
            }
            if field.key {
                if let Some(prev) = key_field.replace(id) {
                    return Err(FlatError::schema_mismatch(format!(
                        "table {} has two key fields: {} and {}",
                        name, fields[prev].name, field.name
                    )));
                }
            }
        }

        Ok(Self {
            name,
            fields,
            by_name,
            key_field,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, name: &str) -> Option<(usize, &FieldDef)> {
        let id = *self.by_name.get(name)?;
        Some((id, &self.fields[id]))
    }

    pub fn field_by_id(&self, id: usize) -> Option<&FieldDef> {
        self.fields.get(id)
    }

    /// Like [`TableSchema::field`], failing with `SchemaMismatch` for an
    /// unknown name.
    pub fn resolve(&self, name: &str) -> Result<(usize, &FieldDef)> {
        self.field(name).ok_or_else(|| {
            FlatError::schema_mismatch(format!("table {} has no field {}", self.name, name))
        })
    }

    pub fn key_field(&self) -> Option<usize> {
        self.key_field
    }

    pub fn required_fields(&self) -> impl Iterator<Item = (usize, &FieldDef)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.required && !f.deprecated)
    }
}
