//! # Enums and Unions
//!
//! An enum names values of an integer scalar; on the wire it is just that
//! scalar. A union is a tagged reference: a `u8` tag picks which table type
//! the paired offset points to, with tag 0 meaning "none". Tags are assigned
//! by position, starting at 1.
//!
//! ```ignore
//! let color = EnumSchema::new(
//!     "Color",
//!     ScalarType::UInt8,
//!     [("Red", 0), ("Green", 1), ("Blue", 2)],
//! )?;
//! let equipment = UnionSchema::new("Equipment", [("Weapon", weapon_id)])?;
//! ```

use eyre::Result;

use crate::error::FlatError;
use crate::schema::types::ScalarType;
use crate::schema::value::Value;

#[derive(Debug, Clone)]
pub struct EnumSchema {
    name: String,
    underlying: ScalarType,
    values: Vec<(String, i64)>,
}

impl EnumSchema {
    pub fn new<I, N>(name: impl Into<String>, underlying: ScalarType, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, i64)>,
        N: Into<String>,
    {
        let name = name.into();
        if !underlying.is_integer() {
            return Err(FlatError::schema_mismatch(format!(
                "enum {} must be backed by an integer type, not {}",
                name,
                underlying.name()
            )));
        }
        let values: Vec<(String, i64)> = values.into_iter().map(|(n, v)| (n.into(), v)).collect();

        let schema = Self {
            name,
            underlying,
            values,
        };
        for (i, (member, value)) in schema.values.iter().enumerate() {
            if schema.values[..i].iter().any(|(prev, _)| prev == member) {
                return Err(FlatError::schema_mismatch(format!(
                    "duplicate enum value {}.{}",
                    schema.name, member
                )));
            }
            schema.to_value(*value)?;
        }
        Ok(schema)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn underlying(&self) -> ScalarType {
        self.underlying
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = (&str, i64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// The name of `value`, or `None` for a value this enum does not declare.
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    /// `value` as a [`Value`] of the underlying type. Fails when it does not
    /// fit.
    pub fn to_value(&self, value: i64) -> Result<Value<'static>> {
        let overflow = || {
            FlatError::schema_mismatch(format!(
                "value {} of enum {} does not fit in {}",
                value,
                self.name,
                self.underlying.name()
            ))
        };
        Ok(match self.underlying {
            ScalarType::Int8 => Value::Int8(i8::try_from(value).map_err(|_| overflow())?),
            ScalarType::UInt8 => Value::UInt8(u8::try_from(value).map_err(|_| overflow())?),
            ScalarType::Int16 => Value::Int16(i16::try_from(value).map_err(|_| overflow())?),
            ScalarType::UInt16 => Value::UInt16(u16::try_from(value).map_err(|_| overflow())?),
            ScalarType::Int32 => Value::Int32(i32::try_from(value).map_err(|_| overflow())?),
            ScalarType::UInt32 => Value::UInt32(u32::try_from(value).map_err(|_| overflow())?),
            ScalarType::Int64 => Value::Int64(value),
            ScalarType::UInt64 => Value::UInt64(u64::try_from(value).map_err(|_| overflow())?),
            ScalarType::Bool | ScalarType::Float32 | ScalarType::Float64 => return Err(overflow()),
        })
    }

    /// Accepts either a value of the underlying type or the name of a
    /// declared value.
    pub fn coerce<'v>(&self, value: Value<'v>) -> Result<Value<'v>> {
        match value {
            Value::Str(name) => {
                let value = self.value_of(&name).ok_or_else(|| {
                    FlatError::schema_mismatch(format!("enum {} has no value {}", self.name, name))
                })?;
                self.to_value(value)
            }
            v if v.scalar_type() == Some(self.underlying) => Ok(v),
            other => Err(FlatError::schema_mismatch(format!(
                "expected {} value, got {}",
                self.name,
                other.kind()
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnionSchema {
    name: String,
    members: Vec<(String, usize)>,
}

impl UnionSchema {
    /// `members` pairs a member name with the id of its table in the
    /// [`Schema`](crate::schema::Schema). The first member gets tag 1.
    pub fn new<I, N>(name: impl Into<String>, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        let name = name.into();
        let members: Vec<(String, usize)> =
            members.into_iter().map(|(n, t)| (n.into(), t)).collect();
        if members.len() > u8::MAX as usize {
            return Err(FlatError::schema_mismatch(format!(
                "union {} has {} members, at most {} fit in a type tag",
                name,
                members.len(),
                u8::MAX
            )));
        }
        for (i, (member, _)) in members.iter().enumerate() {
            if members[..i].iter().any(|(prev, _)| prev == member) {
                return Err(FlatError::schema_mismatch(format!(
                    "duplicate union member {}.{}",
                    name, member
                )));
            }
        }
        Ok(Self { name, members })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Name and table id of the member selected by `tag`.
    pub fn member(&self, tag: u8) -> Option<(&str, usize)> {
        let idx = (tag as usize).checked_sub(1)?;
        self.members.get(idx).map(|(n, t)| (n.as_str(), *t))
    }

    pub fn tag_of(&self, name: &str) -> Option<u8> {
        self.members
            .iter()
            .position(|(n, _)| n == name)
            .map(|idx| idx as u8 + 1)
    }

    /// `(tag, name, table id)` for every member.
    pub fn members(&self) -> impl ExactSizeIterator<Item = (u8, &str, usize)> {
        self.members
            .iter()
            .enumerate()
            .map(|(idx, (n, t))| (idx as u8 + 1, n.as_str(), *t))
    }
}
