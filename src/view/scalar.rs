//! Bridges between [`Value`] and the generic, statically typed scalar APIs.
//! Each function picks the Rust type from a [`ScalarType`] and fails with
//! `SchemaMismatch` when the value is of another type.

use eyre::Result;

use crate::builder::{Builder, StructWriter};
use crate::error::FlatError;
use crate::reader::{Struct, Table, TableMut};
use crate::schema::{ScalarType, Value};

/// Expands `$body!(Variant, rust_type)` for the Rust type of `$ty`.
macro_rules! dispatch {
    ($ty:expr, $body:ident) => {
        match $ty {
            ScalarType::Bool => $body!(Bool, bool),
            ScalarType::Int8 => $body!(Int8, i8),
            ScalarType::UInt8 => $body!(UInt8, u8),
            ScalarType::Int16 => $body!(Int16, i16),
            ScalarType::UInt16 => $body!(UInt16, u16),
            ScalarType::Int32 => $body!(Int32, i32),
            ScalarType::UInt32 => $body!(UInt32, u32),
            ScalarType::Int64 => $body!(Int64, i64),
            ScalarType::UInt64 => $body!(UInt64, u64),
            ScalarType::Float32 => $body!(Float32, f32),
            ScalarType::Float64 => $body!(Float64, f64),
        }
    };
}

pub(crate) fn type_mismatch(expected: ScalarType, got: &Value<'_>) -> eyre::Report {
    FlatError::schema_mismatch(format!(
        "expected {} value, got {}",
        expected.name(),
        got.kind()
    ))
}

pub(crate) fn read_field<'a>(
    table: &Table<'a>,
    id: usize,
    ty: ScalarType,
    default: &Value<'_>,
) -> Result<Value<'a>> {
    macro_rules! read {
        ($variant:ident, $t:ty) => {{
            let default = match default {
                Value::$variant(d) => *d,
                _ => <$t>::default(),
            };
            Value::$variant(table.get::<$t>(id, default)?)
        }};
    }
    Ok(dispatch!(ty, read))
}

/// Reads the scalar `offset` bytes into `st`.
pub(crate) fn read_member<'a>(st: &Struct<'a>, offset: usize, ty: ScalarType) -> Result<Value<'a>> {
    macro_rules! read {
        ($variant:ident, $t:ty) => {
            Value::$variant(st.get::<$t>(offset)?)
        };
    }
    Ok(dispatch!(ty, read))
}

pub(crate) fn add_field(
    builder: &mut Builder,
    id: usize,
    ty: ScalarType,
    value: &Value<'_>,
    default: &Value<'_>,
) -> Result<()> {
    macro_rules! add {
        ($variant:ident, $t:ty) => {{
            let value = match value {
                Value::$variant(v) => *v,
                other => return Err(type_mismatch(ty, other)),
            };
            let default = match default {
                Value::$variant(d) => *d,
                _ => <$t>::default(),
            };
            builder.add_field::<$t>(id, value, default)
        }};
    }
    dispatch!(ty, add)
}

pub(crate) fn set_member(
    writer: &mut StructWriter<'_>,
    idx: usize,
    ty: ScalarType,
    value: &Value<'_>,
) -> Result<()> {
    macro_rules! set {
        ($variant:ident, $t:ty) => {
            match value {
                Value::$variant(v) => writer.set::<$t>(idx, *v),
                other => Err(type_mismatch(ty, other)),
            }
        };
    }
    dispatch!(ty, set)
}

/// Writes a scalar vector and returns its raw offset.
pub(crate) fn create_vector(
    builder: &mut Builder,
    ty: ScalarType,
    items: &[Value<'_>],
) -> Result<u32> {
    macro_rules! create {
        ($variant:ident, $t:ty) => {{
            let typed = items
                .iter()
                .map(|item| match item {
                    Value::$variant(v) => Ok(*v),
                    other => Err(type_mismatch(ty, other)),
                })
                .collect::<Result<Vec<$t>>>()?;
            builder.create_vector::<$t>(&typed)?.value()
        }};
    }
    Ok(dispatch!(ty, create))
}

pub(crate) fn mutate_field(
    table: &mut TableMut<'_>,
    id: usize,
    ty: ScalarType,
    value: &Value<'_>,
) -> Result<bool> {
    macro_rules! mutate {
        ($variant:ident, $t:ty) => {
            match value {
                Value::$variant(v) => table.mutate::<$t>(id, *v),
                other => Err(type_mismatch(ty, other)),
            }
        };
    }
    dispatch!(ty, mutate)
}

pub(crate) fn mutate_member(
    table: &mut TableMut<'_>,
    id: usize,
    offset: usize,
    ty: ScalarType,
    value: &Value<'_>,
) -> Result<bool> {
    macro_rules! mutate {
        ($variant:ident, $t:ty) => {
            match value {
                Value::$variant(v) => table.mutate_struct_member::<$t>(id, offset, *v),
                other => Err(type_mismatch(ty, other)),
            }
        };
    }
    dispatch!(ty, mutate)
}
