//! # TableView - Reading and Mutating by Field Name
//!
//! ## Value Mapping
//!
//! | Field type | Present | Absent |
//! |------------|---------|--------|
//! | scalar | `Value::<Scalar>` | the field default |
//! | string | `Value::Str` (borrowed) | `Value::Absent` |
//! | vector | `Value::List` | `Value::Absent` |
//! | enum | the underlying `Value::<Scalar>` | the field default |
//! | table | `Value::Table` | `Value::Absent` |
//! | struct | `Value::Struct` | `Value::Absent` |
//! | union | `Value::Union` | `Value::Absent` |
//! | nested buffer | `Value::Table` of the nested root | `Value::Absent` |
//!
//! Deprecated fields always read as `Value::Absent`, and so does a union
//! whose tag names no member of the union.

use std::borrow::Cow;

use eyre::Result;

use crate::buffer::Endian;
use crate::error::FlatError;
use crate::reader::{
    root_table_mut_with_endian, root_table_with_endian, Struct, StructVector, Table, TableMut,
    Vector,
};
use crate::schema::{
    ElemType, FieldDef, FieldType, ScalarType, Schema, StructSchema, TableSchema, Value,
};
use crate::view::scalar;

#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    table: Table<'a>,
    schema: &'a Schema,
    table_schema: &'a TableSchema,
}

/// Two views are equal when they show the same table of the same buffer
/// through the same schema.
impl PartialEq for TableView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.table.buf().data(), other.table.buf().data())
            && self.table.pos() == other.table.pos()
            && std::ptr::eq(self.table_schema, other.table_schema)
    }
}

fn read_struct<'a>(st: &Struct<'a>, schema: &StructSchema) -> Result<Value<'a>> {
    let layout = schema.layout();
    let members = schema
        .members()
        .enumerate()
        .map(|(idx, (name, ty))| {
            let offset = layout.offset(idx).ok_or_else(|| {
                FlatError::schema_mismatch(format!(
                    "struct {} has no member {}",
                    schema.name(),
                    name
                ))
            })?;
            scalar::read_member(st, offset, ty)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::Struct(members))
}

impl<'a> TableView<'a> {
    /// Views `table` as the root table of `schema`.
    pub fn new(table: Table<'a>, schema: &'a Schema) -> Self {
        Self::with_table(table, schema, schema.root())
    }

    /// Views `table` as the table type called `name`.
    pub fn of_type(table: Table<'a>, schema: &'a Schema, name: &str) -> Result<Self> {
        Ok(Self::with_table(table, schema, schema.resolve_table(name)?))
    }

    fn with_table(table: Table<'a>, schema: &'a Schema, table_schema: &'a TableSchema) -> Self {
        Self {
            table,
            schema,
            table_schema,
        }
    }

    fn child(&self, table: Table<'a>, id: usize) -> Result<Self> {
        Ok(Self::with_table(table, self.schema, self.schema.table_by_id(id)?))
    }

    pub fn root(buf: &'a [u8], schema: &'a Schema) -> Result<Self> {
        Self::root_with_endian(buf, schema, Endian::Little)
    }

    pub fn root_with_endian(buf: &'a [u8], schema: &'a Schema, endian: Endian) -> Result<Self> {
        Ok(Self::new(root_table_with_endian(buf, endian)?, schema))
    }

    pub fn table(&self) -> Table<'a> {
        self.table
    }

    pub fn schema(&self) -> &'a TableSchema {
        self.table_schema
    }

    pub fn registry(&self) -> &'a Schema {
        self.schema
    }

    pub fn get(&self, name: &str) -> Result<Value<'a>> {
        let (id, field) = self.table_schema.resolve(name)?;
        self.read(id, field)
    }

    pub fn get_by_id(&self, id: usize) -> Result<Value<'a>> {
        let field = self.table_schema.field_by_id(id).ok_or_else(|| {
            FlatError::schema_mismatch(format!(
                "table {} has no field with id {}",
                self.table_schema.name(),
                id
            ))
        })?;
        self.read(id, field)
    }

    /// Whether the field was written. A scalar equal to its default usually
    /// is not, even though `get` returns a value for it.
    pub fn is_present(&self, name: &str) -> Result<bool> {
        let (id, _) = self.table_schema.resolve(name)?;
        self.table.is_present(id)
    }

    /// Fails on the first required field that is absent.
    pub fn check_required(&self) -> Result<()> {
        for (id, field) in self.table_schema.required_fields() {
            if !self.table.is_present(id)? {
                return Err(FlatError::schema_mismatch(format!(
                    "required field {}.{} is missing",
                    self.table_schema.name(),
                    field.name()
                )));
            }
        }
        Ok(())
    }

    /// Binary search in the vector-of-tables field `name`, whose element
    /// schema must declare a key field.
    pub fn lookup_by_key(&self, name: &str, key: &str) -> Result<Option<TableView<'a>>> {
        let (id, field) = self.table_schema.resolve(name)?;
        let elem_id = match field.field_type() {
            FieldType::Vector(ElemType::Table(elem)) => *elem,
            other => {
                return Err(FlatError::schema_mismatch(format!(
                    "field {} is {}, not a vector of tables",
                    name,
                    self.schema.describe(other)
                )))
            }
        };
        let elem = self.schema.table_by_id(elem_id)?;
        let key_field = elem.key_field().ok_or_else(|| {
            FlatError::schema_mismatch(format!("table {} has no key field", elem.name()))
        })?;
        let vector = match self.table.get_vector::<Table<'a>>(id)? {
            Some(vector) => vector,
            None => return Ok(None),
        };
        Ok(vector
            .lookup_by_key(key_field, key)?
            .map(|t| Self::with_table(t, self.schema, elem)))
    }

    fn read(&self, id: usize, field: &'a FieldDef) -> Result<Value<'a>> {
        if field.is_deprecated() {
            return Ok(Value::Absent);
        }
        let table = &self.table;
        match field.field_type() {
            FieldType::Scalar(ty) => scalar::read_field(table, id, *ty, field.default()),
            FieldType::Enum(e) => scalar::read_field(table, id, e.underlying(), field.default()),
            FieldType::String => Ok(table
                .get_str(id)?
                .map_or(Value::Absent, |s| Value::Str(Cow::Borrowed(s)))),
            FieldType::Vector(elem) => self.read_vector(id, elem),
            FieldType::Table(elem) => match table.get_table(id)? {
                Some(t) => Ok(Value::Table(self.child(t, *elem)?)),
                None => Ok(Value::Absent),
            },
            FieldType::Struct(schema) => match table.get_struct(id)? {
                Some(st) => read_struct(&st, schema),
                None => Ok(Value::Absent),
            },
            FieldType::Union(union) => {
                let (tag, t) = match table.get_union(id)? {
                    Some(found) => found,
                    None => return Ok(Value::Absent),
                };
                match union.member(tag) {
                    Some((_, member)) => Ok(Value::Union(tag, self.child(t, member)?)),
                    None => Ok(Value::Absent),
                }
            }
            FieldType::Nested(root) => match table.get_nested_root(id)? {
                Some(t) => Ok(Value::Table(self.child(t, *root)?)),
                None => Ok(Value::Absent),
            },
        }
    }

    fn read_vector(&self, id: usize, elem: &'a ElemType) -> Result<Value<'a>> {
        let table = &self.table;
        let pos = match table.follow_field(id)? {
            Some(pos) => pos,
            None => return Ok(Value::Absent),
        };
        let buf = table.buf();
        let items = match elem {
            ElemType::Scalar(ty) => scalar_items(StructVector::new(buf, pos, ty.size())?, *ty)?,
            ElemType::Enum(e) => {
                let ty = e.underlying();
                scalar_items(StructVector::new(buf, pos, ty.size())?, ty)?
            }
            ElemType::String => Vector::<&'a str>::new(buf, pos)?
                .iter()
                .map(|s| s.map(|s| Value::Str(Cow::Borrowed(s))))
                .collect::<Result<Vec<_>>>()?,
            ElemType::Table(elem) => Vector::<Table<'a>>::new(buf, pos)?
                .iter()
                .map(|t| -> Result<Value<'a>> { Ok(Value::Table(self.child(t?, *elem)?)) })
                .collect::<Result<Vec<_>>>()?,
            ElemType::Struct(schema) => StructVector::new(buf, pos, schema.layout().size())?
                .iter()
                .map(|st| read_struct(&st, schema))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Value::List(items))
    }
}

fn scalar_items<'a>(vector: StructVector<'a>, ty: ScalarType) -> Result<Vec<Value<'a>>> {
    let mut items = Vec::with_capacity(vector.len());
    for st in vector.iter() {
        items.push(scalar::read_member(&st, 0, ty)?);
    }
    Ok(items)
}

#[derive(Debug)]
pub struct TableViewMut<'a> {
    table: TableMut<'a>,
    schema: &'a Schema,
    table_schema: &'a TableSchema,
}

impl<'a> TableViewMut<'a> {
    /// Views `table` as the root table of `schema`.
    pub fn new(table: TableMut<'a>, schema: &'a Schema) -> Self {
        Self {
            table,
            schema,
            table_schema: schema.root(),
        }
    }

    /// Views `table` as the table type called `name`.
    pub fn of_type(table: TableMut<'a>, schema: &'a Schema, name: &str) -> Result<Self> {
        Ok(Self {
            table,
            schema,
            table_schema: schema.resolve_table(name)?,
        })
    }

    pub fn root(buf: &'a mut [u8], schema: &'a Schema) -> Result<Self> {
        Self::root_with_endian(buf, schema, Endian::Little)
    }

    /// The root of a buffer finished in `endian` byte order. Mutations are
    /// written in that order too.
    pub fn root_with_endian(buf: &'a mut [u8], schema: &'a Schema, endian: Endian) -> Result<Self> {
        Ok(Self::new(root_table_mut_with_endian(buf, endian)?, schema))
    }

    pub fn schema(&self) -> &'a TableSchema {
        self.table_schema
    }

    pub fn as_view(&self) -> TableView<'_> {
        TableView::with_table(self.table.as_table(), self.schema, self.table_schema)
    }

    /// Overwrites scalar or enum field `name` in place. Returns `Ok(false)`
    /// and leaves the buffer untouched when the field is absent. Enum fields
    /// also accept the name of a value.
    pub fn mutate<'v>(&mut self, name: &str, value: impl Into<Value<'v>>) -> Result<bool> {
        let (id, field) = self.table_schema.resolve(name)?;
        match field.field_type() {
            FieldType::Scalar(ty) => scalar::mutate_field(&mut self.table, id, *ty, &value.into()),
            FieldType::Enum(e) => {
                let value = e.coerce(value.into())?;
                scalar::mutate_field(&mut self.table, id, e.underlying(), &value)
            }
            other => Err(FlatError::schema_mismatch(format!(
                "field {} is {}, only scalars can be mutated",
                name,
                self.schema.describe(other)
            ))),
        }
    }

    /// Overwrites one member of the inline struct field `name`.
    pub fn mutate_struct_member<'v>(
        &mut self,
        name: &str,
        member: &str,
        value: impl Into<Value<'v>>,
    ) -> Result<bool> {
        let (id, field) = self.table_schema.resolve(name)?;
        let schema = match field.field_type() {
            FieldType::Struct(schema) => schema,
            other => {
                return Err(FlatError::schema_mismatch(format!(
                    "field {} is {}, not a struct",
                    name,
                    self.schema.describe(other)
                )))
            }
        };
        let (offset, ty) = schema
            .member_index(member)
            .and_then(|idx| Some((schema.layout().offset(idx)?, schema.member_type(idx)?)))
            .ok_or_else(|| {
                FlatError::schema_mismatch(format!(
                    "struct {} has no member {}",
                    schema.name(),
                    member
                ))
            })?;
        scalar::mutate_member(&mut self.table, id, offset, ty, &value.into())
    }

    /// Mutable view of the sub-table field `name`, or `None` when absent.
    pub fn get_table_mut(&mut self, name: &str) -> Result<Option<TableViewMut<'_>>> {
        let (id, field) = self.table_schema.resolve(name)?;
        let child = match field.field_type() {
            FieldType::Table(child) => self.schema.table_by_id(*child)?,
            other => {
                return Err(FlatError::schema_mismatch(format!(
                    "field {} is {}, not a table",
                    name,
                    self.schema.describe(other)
                )))
            }
        };
        let schema = self.schema;
        Ok(self.table.get_table_mut(id)?.map(|table| TableViewMut {
            table,
            schema,
            table_schema: child,
        }))
    }
}
