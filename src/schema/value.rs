//! # Value - Dynamically Typed Field Values
//!
//! What a [`TableView`] returns and what a [`TableWriter`] accepts. String
//! values borrow from the buffer when read (`Cow::Borrowed`) and may be
//! owned when written.
//!
//! [`TableView`]: crate::view::TableView
//! [`TableWriter`]: crate::view::TableWriter

use std::borrow::Cow;

use crate::schema::types::ScalarType;
use crate::view::TableView;

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// A reference field that is not present, or a deprecated field.
    Absent,
    Bool(bool),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Str(Cow<'a, str>),
    List(Vec<Value<'a>>),
    /// Struct members in declaration order.
    Struct(Vec<Value<'a>>),
    Table(TableView<'a>),
    /// A set union: its type tag and the member table.
    Union(u8, TableView<'a>),
}

impl<'a> Value<'a> {
    pub fn scalar_type(&self) -> Option<ScalarType> {
        Some(match self {
            Value::Bool(_) => ScalarType::Bool,
            Value::Int8(_) => ScalarType::Int8,
            Value::UInt8(_) => ScalarType::UInt8,
            Value::Int16(_) => ScalarType::Int16,
            Value::UInt16(_) => ScalarType::UInt16,
            Value::Int32(_) => ScalarType::Int32,
            Value::UInt32(_) => ScalarType::UInt32,
            Value::Int64(_) => ScalarType::Int64,
            Value::UInt64(_) => ScalarType::UInt64,
            Value::Float32(_) => ScalarType::Float32,
            Value::Float64(_) => ScalarType::Float64,
            _ => return None,
        })
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Struct(_) => "struct",
            Value::Table(_) => "table",
            Value::Union(..) => "union",
            scalar => scalar.scalar_type().map_or("scalar", ScalarType::name),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer variant that fits in an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::UInt8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::UInt16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::UInt32(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            Value::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float32(v) => Some(v as f64),
            Value::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableView<'a>> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<(u8, &TableView<'a>)> {
        match self {
            Value::Union(tag, t) => Some((*tag, t)),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
);

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Str(Cow::Owned(s))
    }
}

impl<'a, T: Into<Value<'a>>> From<Vec<T>> for Value<'a> {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
