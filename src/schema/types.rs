//! # Field Types
//!
//! | ScalarType | Rust | Size |
//! |------------|------|------|
//! | Bool | bool | 1 |
//! | Int8 / UInt8 | i8 / u8 | 1 |
//! | Int16 / UInt16 | i16 / u16 | 2 |
//! | Int32 / UInt32 | i32 / u32 | 4 |
//! | Int64 / UInt64 | i64 / u64 | 8 |
//! | Float32 / Float64 | f32 / f64 | 4 / 8 |
//!
//! Strings, vectors, sub-tables, unions and nested buffers occupy a 4-byte
//! uoffset slot in their table; enums occupy their underlying scalar;
//! structs occupy their own size, inline.
//!
//! Tables are referred to by their id in a [`Schema`](crate::schema::Schema)
//! rather than owned, so a table may refer to itself or to a table declared
//! after it.

use std::sync::Arc;

use crate::config::SIZE_UOFFSET;
use crate::schema::enums::{EnumSchema, UnionSchema};
use crate::schema::structs::StructSchema;
use crate::schema::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ScalarType {
    pub fn size(self) -> usize {
        match self {
            ScalarType::Bool | ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Int64 | ScalarType::UInt64 | ScalarType::Float64 => 8,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            ScalarType::Bool | ScalarType::Float32 | ScalarType::Float64
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int8 => "byte",
            ScalarType::UInt8 => "ubyte",
            ScalarType::Int16 => "short",
            ScalarType::UInt16 => "ushort",
            ScalarType::Int32 => "int",
            ScalarType::UInt32 => "uint",
            ScalarType::Int64 => "long",
            ScalarType::UInt64 => "ulong",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        }
    }

    /// The implicit default of a scalar field.
    pub fn zero(self) -> Value<'static> {
        match self {
            ScalarType::Bool => Value::Bool(false),
            ScalarType::Int8 => Value::Int8(0),
            ScalarType::UInt8 => Value::UInt8(0),
            ScalarType::Int16 => Value::Int16(0),
            ScalarType::UInt16 => Value::UInt16(0),
            ScalarType::Int32 => Value::Int32(0),
            ScalarType::UInt32 => Value::UInt32(0),
            ScalarType::Int64 => Value::Int64(0),
            ScalarType::UInt64 => Value::UInt64(0),
            ScalarType::Float32 => Value::Float32(0.0),
            ScalarType::Float64 => Value::Float64(0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ElemType {
    Scalar(ScalarType),
    Enum(Arc<EnumSchema>),
    String,
    /// Id of the element table in the schema.
    Table(usize),
    Struct(Arc<StructSchema>),
}

impl ElemType {
    /// Width of one element inside the vector.
    pub fn width(&self) -> usize {
        match self {
            ElemType::Scalar(t) => t.size(),
            ElemType::Enum(e) => e.underlying().size(),
            ElemType::String | ElemType::Table(_) => SIZE_UOFFSET,
            ElemType::Struct(s) => s.layout().size(),
        }
    }

    /// The scalar stored for each element, for scalar and enum elements.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            ElemType::Scalar(t) => Some(*t),
            ElemType::Enum(e) => Some(e.underlying()),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            ElemType::Scalar(t) => t.name().to_string(),
            ElemType::Enum(e) => e.name().to_string(),
            ElemType::String => "string".to_string(),
            ElemType::Table(id) => format!("table #{}", id),
            ElemType::Struct(s) => s.name().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum(Arc<EnumSchema>),
    String,
    Vector(ElemType),
    /// Id of the sub-table's schema.
    Table(usize),
    Struct(Arc<StructSchema>),
    /// The value slot of a union. Its `u8` type tag gets a field of its own,
    /// named `<field>_type`, right before it.
    Union(Arc<UnionSchema>),
    /// A byte vector holding a finished buffer whose root is the table with
    /// this id.
    Nested(usize),
}

impl FieldType {
    /// Bytes the field occupies in its table.
    pub fn slot_size(&self) -> usize {
        match self {
            FieldType::Scalar(t) => t.size(),
            FieldType::Enum(e) => e.underlying().size(),
            FieldType::String
            | FieldType::Vector(_)
            | FieldType::Table(_)
            | FieldType::Union(_)
            | FieldType::Nested(_) => SIZE_UOFFSET,
            FieldType::Struct(s) => s.layout().size(),
        }
    }

    /// The scalar stored in the field, for scalar and enum fields.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            FieldType::Scalar(t) => Some(*t),
            FieldType::Enum(e) => Some(e.underlying()),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.scalar_type().is_some()
    }

    /// Ids of the tables this field refers to.
    pub fn table_refs(&self) -> Vec<usize> {
        match self {
            FieldType::Table(id) | FieldType::Nested(id) => vec![*id],
            FieldType::Vector(ElemType::Table(id)) => vec![*id],
            FieldType::Union(u) => u.members().map(|(_, _, id)| id).collect(),
            _ => Vec::new(),
        }
    }

    /// Type name for messages. Tables appear by id; use
    /// [`Schema::describe`](crate::schema::Schema::describe) for their names.
    pub fn describe(&self) -> String {
        match self {
            FieldType::Scalar(t) => t.name().to_string(),
            FieldType::Enum(e) => e.name().to_string(),
            FieldType::String => "string".to_string(),
            FieldType::Vector(elem) => format!("[{}]", elem.describe()),
            FieldType::Table(id) => format!("table #{}", id),
            FieldType::Struct(s) => s.name().to_string(),
            FieldType::Union(u) => u.name().to_string(),
            FieldType::Nested(id) => format!("nested table #{}", id),
        }
    }
}
