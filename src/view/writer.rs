//! # TableWriter - Writing a Table by Field Name
//!
//! Values are type-checked against the schema when they are set, so
//! `finish` only fails on builder errors or missing required fields.
//! Sub-tables must be finished before their parent and are passed in by
//! offset through [`TableWriter::set_table`], [`TableWriter::set_tables`]
//! and [`TableWriter::set_union`]. A vector of tables whose element schema
//! declares a key is written sorted by that key. Enum fields take either a
//! value of the underlying type or the name of a declared value.

use eyre::Result;
use smallvec::SmallVec;
use tracing::trace;

use crate::buffer::Endian;
use crate::builder::{Builder, Offset, StructWriter, TableTag};
use crate::error::FlatError;
use crate::schema::{
    ElemType, FieldDef, FieldType, ScalarType, Schema, StructSchema, TableSchema, Value,
};
use crate::view::scalar;

#[derive(Debug, Clone)]
enum Pending<'v> {
    Value(Value<'v>),
    Table(Offset<TableTag>),
    Tables(Vec<Offset<TableTag>>),
    Union(u8, Offset<TableTag>),
    Nested(&'v [u8]),
}

/// A field ready to be added to the open table.
enum Slot<'p> {
    Scalar {
        ty: ScalarType,
        value: &'p Value<'p>,
        default: &'p Value<'static>,
    },
    Offset(Offset<()>),
    Union {
        tag: u8,
        value: Offset<TableTag>,
    },
    Struct {
        schema: &'p StructSchema,
        members: &'p [Value<'p>],
    },
}

fn struct_writer<'l>(
    schema: &'l StructSchema,
    members: &[Value<'_>],
    endian: Endian,
) -> Result<StructWriter<'l>> {
    let mut writer = StructWriter::new(schema.layout(), endian);
    for (idx, (value, (_, ty))) in members.iter().zip(schema.members()).enumerate() {
        scalar::set_member(&mut writer, idx, ty, value)?;
    }
    Ok(writer)
}

fn check_struct(schema: &StructSchema, members: &[Value<'_>]) -> Result<()> {
    if members.len() != schema.member_count() {
        return Err(FlatError::schema_mismatch(format!(
            "struct {} has {} members, got {}",
            schema.name(),
            schema.member_count(),
            members.len()
        )));
    }
    for (value, (_, ty)) in members.iter().zip(schema.members()) {
        if value.scalar_type() != Some(ty) {
            return Err(scalar::type_mismatch(ty, value));
        }
    }
    Ok(())
}

/// Type-checks `value` for `field`, resolving enum value names to numbers.
fn check_value<'v>(schema: &Schema, field: &FieldDef, value: Value<'v>) -> Result<Value<'v>> {
    let mismatch = |value: &Value<'_>| {
        FlatError::schema_mismatch(format!(
            "field {} is {}, got {}",
            field.name(),
            schema.describe(field.field_type()),
            value.kind()
        ))
    };
    match (field.field_type(), value) {
        (FieldType::Enum(e), v) => e.coerce(v),
        (FieldType::Vector(ElemType::Enum(e)), Value::List(items)) => Ok(Value::List(
            items
                .into_iter()
                .map(|item| e.coerce(item))
                .collect::<Result<Vec<_>>>()?,
        )),
        (FieldType::Scalar(ty), v) if v.scalar_type() == Some(*ty) => Ok(v),
        (FieldType::String, v @ Value::Str(_)) => Ok(v),
        (FieldType::Struct(schema), Value::Struct(members)) => {
            check_struct(schema, &members)?;
            Ok(Value::Struct(members))
        }
        (FieldType::Vector(elem), Value::List(items)) => {
            for item in &items {
                match (elem, item) {
                    (ElemType::Scalar(ty), v) if v.scalar_type() == Some(*ty) => {}
                    (ElemType::String, Value::Str(_)) => {}
                    (ElemType::Struct(schema), Value::Struct(members)) => {
                        check_struct(schema, members)?
                    }
                    (_, item) => return Err(mismatch(item)),
                }
            }
            Ok(Value::List(items))
        }
        (_, value) => Err(mismatch(&value)),
    }
}

#[derive(Debug, Clone)]
pub struct TableWriter<'s, 'v> {
    schema: &'s Schema,
    table: &'s TableSchema,
    pending: Vec<Option<Pending<'v>>>,
}

impl<'s, 'v> TableWriter<'s, 'v> {
    /// A writer for the root table of `schema`.
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_table(schema, schema.root())
    }

    /// A writer for the table type called `name`.
    pub fn for_table(schema: &'s Schema, name: &str) -> Result<Self> {
        Ok(Self::with_table(schema, schema.resolve_table(name)?))
    }

    fn with_table(schema: &'s Schema, table: &'s TableSchema) -> Self {
        Self {
            schema,
            table,
            pending: vec![None; table.field_count()],
        }
    }

    pub fn schema(&self) -> &'s TableSchema {
        self.table
    }

    fn writable(&self, name: &str) -> Result<(usize, &'s FieldDef)> {
        let (id, field) = self.table.resolve(name)?;
        if field.is_deprecated() {
            return Err(FlatError::schema_mismatch(format!(
                "field {}.{} is deprecated",
                self.table.name(),
                name
            )));
        }
        if field.is_union_tag() {
            return Err(FlatError::schema_mismatch(format!(
                "field {}.{} is a union tag, set the union with set_union",
                self.table.name(),
                name
            )));
        }
        Ok((id, field))
    }

    fn wrong_setter(&self, name: &str, field: &FieldDef, expected: &str) -> eyre::Report {
        FlatError::schema_mismatch(format!(
            "field {} is {}, not {}",
            name,
            self.schema.describe(field.field_type()),
            expected
        ))
    }

    /// Sets a scalar, enum, string, struct or vector-of-values field.
    /// Setting `Value::Absent` clears the field.
    pub fn set(&mut self, name: &str, value: impl Into<Value<'v>>) -> Result<&mut Self> {
        let (id, field) = self.writable(name)?;
        let value = value.into();
        if value.is_absent() {
            self.pending[id] = None;
            return Ok(self);
        }
        let value = check_value(self.schema, field, value)?;
        self.pending[id] = Some(Pending::Value(value));
        Ok(self)
    }

    /// Sets a sub-table field to a table finished earlier.
    pub fn set_table(&mut self, name: &str, table: Offset<TableTag>) -> Result<&mut Self> {
        let (id, field) = self.writable(name)?;
        if !matches!(field.field_type(), FieldType::Table(_)) {
            return Err(self.wrong_setter(name, field, "a table"));
        }
        self.pending[id] = Some(Pending::Table(table));
        Ok(self)
    }

    /// Sets a vector-of-tables field to tables finished earlier.
    pub fn set_tables(&mut self, name: &str, tables: Vec<Offset<TableTag>>) -> Result<&mut Self> {
        let (id, field) = self.writable(name)?;
        if !matches!(field.field_type(), FieldType::Vector(ElemType::Table(_))) {
            return Err(self.wrong_setter(name, field, "a vector of tables"));
        }
        self.pending[id] = Some(Pending::Tables(tables));
        Ok(self)
    }

    /// Sets union field `name` to a `member` table finished earlier. The
    /// tag field is written along with it.
    pub fn set_union(
        &mut self,
        name: &str,
        member: &str,
        table: Offset<TableTag>,
    ) -> Result<&mut Self> {
        let (id, field) = self.writable(name)?;
        let union = match field.field_type() {
            FieldType::Union(union) => union,
            _ => return Err(self.wrong_setter(name, field, "a union")),
        };
        let tag = union.tag_of(member).ok_or_else(|| {
            FlatError::schema_mismatch(format!("union {} has no member {}", union.name(), member))
        })?;
        self.pending[id] = Some(Pending::Union(tag, table));
        Ok(self)
    }

    /// Sets nested-buffer field `name` to the bytes of a finished buffer.
    pub fn set_nested(&mut self, name: &str, finished: &'v [u8]) -> Result<&mut Self> {
        let (id, field) = self.writable(name)?;
        if !matches!(field.field_type(), FieldType::Nested(_)) {
            return Err(self.wrong_setter(name, field, "a nested buffer"));
        }
        self.pending[id] = Some(Pending::Nested(finished));
        Ok(self)
    }

    /// Writes the children, then the table itself. The builder must be idle.
    pub fn finish(&self, builder: &mut Builder) -> Result<Offset<TableTag>> {
        let mut slots: SmallVec<[(usize, usize, Slot<'_>); 16]> = SmallVec::new();

        for (id, pending) in self.pending.iter().enumerate() {
            let field = match self.table.field_by_id(id) {
                Some(field) => field,
                None => continue,
            };
            let pending = match pending {
                Some(pending) => pending,
                None if field.is_required() => {
                    return Err(FlatError::schema_mismatch(format!(
                        "required field {}.{} is not set",
                        self.table.name(),
                        field.name()
                    )))
                }
                None => continue,
            };
            let size = field.field_type().slot_size();
            let slot = match (pending, field.field_type()) {
                (Pending::Table(table), _) => Slot::Offset(Offset::new(table.value())),
                (Pending::Union(tag, value), _) => Slot::Union {
                    tag: *tag,
                    value: *value,
                },
                (Pending::Nested(finished), _) => {
                    Slot::Offset(Offset::new(builder.create_nested_buffer(finished)?.value()))
                }
                (Pending::Tables(tables), FieldType::Vector(ElemType::Table(elem))) => {
                    let mut tables = tables.clone();
                    let vector = match self.schema.table_by_id(*elem)?.key_field() {
                        Some(key) => builder.create_vector_of_sorted_tables(&mut tables, key)?,
                        None => builder.create_vector_of_offsets(&tables)?,
                    };
                    Slot::Offset(Offset::new(vector.value()))
                }
                (Pending::Value(value), FieldType::Scalar(ty)) => Slot::Scalar {
                    ty: *ty,
                    value,
                    default: field.default(),
                },
                (Pending::Value(value), FieldType::Enum(e)) => Slot::Scalar {
                    ty: e.underlying(),
                    value,
                    default: field.default(),
                },
                (Pending::Value(Value::Str(s)), FieldType::String) => {
                    Slot::Offset(Offset::new(builder.create_string(s)?.value()))
                }
                (Pending::Value(Value::Struct(members)), FieldType::Struct(schema)) => {
                    Slot::Struct {
                        schema: schema.as_ref(),
                        members,
                    }
                }
                (Pending::Value(Value::List(items)), FieldType::Vector(elem)) => {
                    Slot::Offset(Offset::new(Self::create_vector(builder, elem, items)?))
                }
                _ => {
                    return Err(FlatError::schema_mismatch(format!(
                        "field {}.{} holds a value of the wrong kind",
                        self.table.name(),
                        field.name()
                    )))
                }
            };
            slots.push((id, size, slot));
        }

        slots.sort_by(|a, b| b.1.cmp(&a.1));

        builder.start_object(self.table.field_count())?;
        for (id, _, slot) in &slots {
            match slot {
                Slot::Scalar { ty, value, default } => {
                    scalar::add_field(builder, *id, *ty, value, default)?
                }
                Slot::Offset(target) => builder.add_offset(*id, *target)?,
                Slot::Union { tag, value } => builder.add_union(*id, *tag, *value)?,
                Slot::Struct { schema, members } => {
                    let writer = struct_writer(schema, members, builder.endian())?;
                    builder.add_struct(*id, &writer)?
                }
            }
        }
        let table = builder.end_object()?;
        trace!(
            table = self.table.name(),
            fields = slots.len(),
            offset = table.value(),
            "table written"
        );
        Ok(table)
    }

    fn create_vector(builder: &mut Builder, elem: &ElemType, items: &[Value<'_>]) -> Result<u32> {
        match elem {
            ElemType::Scalar(ty) => scalar::create_vector(builder, *ty, items),
            ElemType::Enum(e) => scalar::create_vector(builder, e.underlying(), items),
            ElemType::String => {
                let strings = items
                    .iter()
                    .map(|item| {
                        item.as_str().ok_or_else(|| {
                            FlatError::schema_mismatch(format!(
                                "expected string element, got {}",
                                item.kind()
                            ))
                        })
                    })
                    .collect::<Result<SmallVec<[&str; 16]>>>()?;
                Ok(builder.create_vector_of_strings(&strings)?.value())
            }
            ElemType::Struct(schema) => {
                let endian = builder.endian();
                let writers = items
                    .iter()
                    .map(|item| match item {
                        Value::Struct(members) => struct_writer(schema, members, endian),
                        other => Err(FlatError::schema_mismatch(format!(
                            "expected {} element, got {}",
                            schema.name(),
                            other.kind()
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(builder
                    .create_vector_of_structs(schema.layout(), &writers)?
                    .value())
            }
            ElemType::Table(_) => Err(FlatError::schema_mismatch(
                "a vector of tables must be set with set_tables",
            )),
        }
    }
}
