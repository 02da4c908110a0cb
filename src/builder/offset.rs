//! # Typed Offsets
//!
//! An [`Offset`] is the builder's handle to something it already wrote. The
//! value is the distance from the END of the buffer to the start of the
//! object, which stays valid while the buffer grows. The type parameter
//! records what the offset points at so a string cannot be stored where a
//! table is expected.

use std::marker::PhantomData;

#[derive(Debug)]
pub struct StringTag;

#[derive(Debug)]
pub struct TableTag;

#[derive(Debug)]
pub struct StructTag;

#[derive(Debug)]
pub struct VectorTag<T>(PhantomData<T>);

pub struct Offset<T> {
    value: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Offset<T> {
    pub(crate) const fn new(value: u32) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// An offset that refers to nothing. Adding it as a field is a no-op.
    pub const fn null() -> Self {
        Self::new(0)
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn is_null(&self) -> bool {
        self.value == 0
    }
}

impl<T> Clone for Offset<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Offset<T> {}

impl<T> PartialEq for Offset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Offset<T> {}

impl<T> std::fmt::Debug for Offset<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Offset({})", self.value)
    }
}
