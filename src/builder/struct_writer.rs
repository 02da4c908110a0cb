//! # StructWriter - Inline Struct Assembly
//!
//! Structs are written in one piece, so their bytes are assembled up front
//! against a [`StructLayout`] and then copied into the buffer by
//! [`Builder::create_struct`](super::Builder::create_struct) or
//! [`Builder::add_struct`](super::Builder::add_struct). Padding bytes are
//! always zero.
//!
//! ```ignore
//! let mut vec3 = StructWriter::new(&layout, Endian::Little);
//! vec3.set(0, 1.0f32)?;
//! vec3.set(1, 2.0f32)?;
//! vec3.set(2, 3.0f32)?;
//! builder.add_struct(0, &vec3)?;
//! ```

use eyre::Result;
use smallvec::{smallvec, SmallVec};

use crate::buffer::{Endian, Scalar};
use crate::error::FlatError;
use crate::layout::StructLayout;

#[derive(Debug, Clone)]
pub struct StructWriter<'l> {
    layout: &'l StructLayout,
    bytes: SmallVec<[u8; 64]>,
    endian: Endian,
}

impl<'l> StructWriter<'l> {
    pub fn new(layout: &'l StructLayout, endian: Endian) -> Self {
        Self {
            layout,
            bytes: smallvec![0u8; layout.size()],
            endian,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn layout(&self) -> &'l StructLayout {
        self.layout
    }

    pub fn set<T: Scalar>(&mut self, member: usize, value: T) -> Result<()> {
        let slot = (self.layout.offset(member), self.layout.member(member));
        let (offset, member_layout) = match slot {
            (Some(offset), Some(member_layout)) => (offset, member_layout),
            _ => {
                return Err(FlatError::schema_mismatch(format!(
                    "struct member {} out of range for {} members",
                    member,
                    self.layout.member_count()
                )))
            }
        };
        if member_layout.size != T::SIZE {
            return Err(FlatError::schema_mismatch(format!(
                "struct member {} is {} bytes wide, value is {} bytes",
                member,
                member_layout.size,
                T::SIZE
            )));
        }
        value.write_to(&mut self.bytes[offset..offset + T::SIZE], self.endian);
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Zeroes every member so the writer can be reused for the next element.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}
