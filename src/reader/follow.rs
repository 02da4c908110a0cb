//! # Follow - Decoding Vector Elements
//!
//! A vector element is either stored inline (scalars) or as a uoffset to
//! the real object (strings, tables). `Follow` hides the difference so one
//! [`Vector`](super::Vector) type serves all element kinds.

use eyre::Result;

use crate::buffer::ByteView;
use crate::config::SIZE_UOFFSET;
use crate::error::FlatError;
use crate::reader::table::{read_string_bytes, Table};

pub trait Follow<'a>: Sized {
    /// Bytes each element occupies inside the vector.
    const WIDTH: usize;

    fn follow(buf: ByteView<'a>, pos: usize) -> Result<Self>;
}

macro_rules! impl_follow_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a> Follow<'a> for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn follow(buf: ByteView<'a>, pos: usize) -> Result<Self> {
                    buf.get::<$ty>(pos)
                }
            }
        )*
    };
}

impl_follow_scalar!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl<'a> Follow<'a> for &'a str {
    const WIDTH: usize = SIZE_UOFFSET;

    fn follow(buf: ByteView<'a>, pos: usize) -> Result<Self> {
        let target = buf.follow_uoffset(pos)?;
        let bytes = read_string_bytes(buf, target)?;
        std::str::from_utf8(bytes).map_err(|e| {
            FlatError::schema_mismatch(format!("invalid UTF-8 in string at {}: {}", target, e))
        })
    }
}

impl<'a> Follow<'a> for &'a [u8] {
    const WIDTH: usize = SIZE_UOFFSET;

    fn follow(buf: ByteView<'a>, pos: usize) -> Result<Self> {
        let target = buf.follow_uoffset(pos)?;
        read_string_bytes(buf, target)
    }
}

impl<'a> Follow<'a> for Table<'a> {
    const WIDTH: usize = SIZE_UOFFSET;

    fn follow(buf: ByteView<'a>, pos: usize) -> Result<Self> {
        let target = buf.follow_uoffset(pos)?;
        Ok(Table::new(buf, target))
    }
}
