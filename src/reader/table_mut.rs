//! # TableMut - In-Place Mutation
//!
//! The only writes allowed on a finished buffer: overwriting a scalar that is
//! already present. Nothing moves and nothing is inserted, so an absent
//! field (one that was left at its default) cannot be mutated; `mutate`
//! reports that with `Ok(false)` and leaves the buffer untouched.
//!
//! ```ignore
//! let mut stat = root_table_mut(&mut bytes)?;
//! assert!(stat.mutate_u16(2, 8)?);   // present: rewritten in place
//! assert!(!stat.mutate_i64(1, 5)?);  // absent: nothing written
//! ```

use eyre::Result;

use crate::buffer::{ByteViewMut, Scalar};
use crate::config::SIZE_LENGTH_PREFIX;
use crate::error::FlatError;
use crate::reader::table::Table;

#[derive(Debug)]
pub struct TableMut<'a> {
    buf: ByteViewMut<'a>,
    pos: usize,
}

impl<'a> TableMut<'a> {
    pub fn new(buf: ByteViewMut<'a>, pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// A read-only view of the same table.
    pub fn as_table(&self) -> Table<'_> {
        Table::new(self.buf.as_view(), self.pos)
    }

    /// Overwrites field `id` if it is present. Returns `Ok(false)` when the
    /// field is absent.
    pub fn mutate<T: Scalar>(&mut self, id: usize, value: T) -> Result<bool> {
        match self.as_table().field_pos(id)? {
            Some(pos) => {
                self.buf.put(pos, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    typed_mutators!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

    /// Overwrites the struct member `offset` bytes into struct field `id`.
    pub fn mutate_struct_member<T: Scalar>(
        &mut self,
        id: usize,
        offset: usize,
        value: T,
    ) -> Result<bool> {
        match self.as_table().field_pos(id)? {
            Some(pos) => {
                let member = pos
                    .checked_add(offset)
                    .ok_or_else(|| FlatError::out_of_range(pos, offset, self.buf.len()))?;
                self.buf.put(member, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Overwrites element `idx` of the scalar vector in field `id`.
    pub fn mutate_vector_element<T: Scalar>(
        &mut self,
        id: usize,
        idx: usize,
        value: T,
    ) -> Result<bool> {
        let vector_pos = match self.as_table().field_pos(id)? {
            Some(field) => self.buf.as_view().follow_uoffset(field)?,
            None => return Ok(false),
        };
        let len = self.buf.get::<u32>(vector_pos)? as usize;
        if idx >= len {
            return Err(FlatError::out_of_range(idx, 1, len));
        }
        self.buf
            .put(vector_pos + SIZE_LENGTH_PREFIX + idx * T::SIZE, value)?;
        Ok(true)
    }

    /// Mutable access to the sub-table in field `id`.
    pub fn get_table_mut(&mut self, id: usize) -> Result<Option<TableMut<'_>>> {
        let target = match self.as_table().field_pos(id)? {
            Some(field) => self.buf.as_view().follow_uoffset(field)?,
            None => return Ok(None),
        };
        Ok(Some(TableMut::new(self.buf.reborrow(), target)))
    }
}
