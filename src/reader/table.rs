//! # Table - Zero-Copy Table Access
//!
//! ## Usage
//!
//! ```ignore
//! let stat = root_table(bytes)?;
//! let id: Option<&str> = stat.get_str(0)?;  // borrowed from `bytes`
//! let val: i64 = stat.get_i64(1, 0)?;       // default when absent
//! let count: u16 = stat.get_u16(2, 0)?;
//! ```

use eyre::Result;

use crate::buffer::{ByteView, Scalar};
use crate::config::{SIZE_LENGTH_PREFIX, SIZE_SOFFSET, SIZE_VOFFSET, VTABLE_METADATA_SIZE};
use crate::error::FlatError;
use crate::layout::{
    field_index_to_voffset, union_type_field, voffset_to_field_index, StructLayout,
};
use crate::reader::follow::Follow;
use crate::reader::root::root_table_with_endian;
use crate::reader::structs::{Struct, StructVector};
use crate::reader::vector::Vector;

/// Reads the bytes of a length-prefixed string at `pos`, without the
/// trailing terminator.
pub(crate) fn read_string_bytes<'a>(buf: ByteView<'a>, pos: usize) -> Result<&'a [u8]> {
    let len = buf.get::<u32>(pos)? as usize;
    buf.bytes(pos + SIZE_LENGTH_PREFIX, len)
}

#[derive(Debug, Clone, Copy)]
pub struct VTable<'a> {
    buf: ByteView<'a>,
    pos: usize,
    size: usize,
    object_size: usize,
}

impl<'a> VTable<'a> {
    /// Locates and validates the vtable of the table at `table_pos`.
    pub fn load(buf: ByteView<'a>, table_pos: usize) -> Result<Self> {
        let soffset = buf.get::<i32>(table_pos)? as i64;
        let vt_pos = table_pos as i64 - soffset;
        if vt_pos < 0 || vt_pos as usize + VTABLE_METADATA_SIZE > buf.len() {
            return Err(FlatError::schema_mismatch(format!(
                "vtable of table at {} points to {}, outside buffer of {} bytes",
                table_pos,
                vt_pos,
                buf.len()
            )));
        }
        let pos = vt_pos as usize;

        let size = buf.get::<u16>(pos)? as usize;
        let object_size = buf.get::<u16>(pos + SIZE_VOFFSET)? as usize;

        if size < VTABLE_METADATA_SIZE || size % SIZE_VOFFSET != 0 {
            return Err(FlatError::schema_mismatch(format!(
                "malformed vtable at {}: size {}",
                pos, size
            )));
        }
        if pos + size > buf.len() {
            return Err(FlatError::schema_mismatch(format!(
                "vtable at {} of {} bytes runs past buffer of {} bytes",
                pos,
                size,
                buf.len()
            )));
        }
        if object_size < SIZE_SOFFSET || table_pos + object_size > buf.len() {
            return Err(FlatError::schema_mismatch(format!(
                "table at {} claims {} bytes, buffer has {}",
                table_pos,
                object_size,
                buf.len()
            )));
        }

        Ok(Self {
            buf,
            pos,
            size,
            object_size,
        })
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Size of the vtable itself in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Size of the table it describes, including the soffset.
    pub fn object_size(&self) -> usize {
        self.object_size
    }

    pub fn field_count(&self) -> usize {
        voffset_to_field_index(self.size)
    }

    /// Offset of field `id` inside the table, or 0 when the field is absent.
    pub fn field_offset(&self, id: usize) -> Result<u16> {
        let at = field_index_to_voffset(id);
        if at + SIZE_VOFFSET > self.size {
            return Ok(0);
        }
        let voffset = self.buf.get::<u16>(self.pos + at)?;
        if voffset != 0
            && ((voffset as usize) < SIZE_SOFFSET || voffset as usize >= self.object_size)
        {
            return Err(FlatError::schema_mismatch(format!(
                "field {} at offset {} lies outside its table of {} bytes",
                id, voffset, self.object_size
            )));
        }
        Ok(voffset)
    }

    pub fn as_bytes(&self) -> Result<&'a [u8]> {
        self.buf.bytes(self.pos, self.size)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    buf: ByteView<'a>,
    pos: usize,
}

impl<'a> Table<'a> {
    /// A view of the table starting at `pos`. Nothing is validated until a
    /// field is read.
    pub fn new(buf: ByteView<'a>, pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn buf(&self) -> ByteView<'a> {
        self.buf
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn vtable(&self) -> Result<VTable<'a>> {
        VTable::load(self.buf, self.pos)
    }

    pub fn field_offset(&self, id: usize) -> Result<u16> {
        self.vtable()?.field_offset(id)
    }

    pub fn is_present(&self, id: usize) -> Result<bool> {
        Ok(self.field_offset(id)? != 0)
    }

    /// Absolute position of field `id`, if present.
    pub fn field_pos(&self, id: usize) -> Result<Option<usize>> {
        match self.field_offset(id)? {
            0 => Ok(None),
            voffset => Ok(Some(self.pos + voffset as usize)),
        }
    }

    pub fn get<T: Scalar>(&self, id: usize, default: T) -> Result<T> {
        match self.field_pos(id)? {
            Some(pos) => self.buf.get::<T>(pos),
            None => Ok(default),
        }
    }

    pub fn get_opt<T: Scalar>(&self, id: usize) -> Result<Option<T>> {
        self.field_pos(id)?
            .map(|pos| self.buf.get::<T>(pos))
            .transpose()
    }

    typed_getters!(bool, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

    /// Position of the string, vector or table that field `id` refers to.
    pub fn follow_field(&self, id: usize) -> Result<Option<usize>> {
        self.field_pos(id)?
            .map(|pos| self.buf.follow_uoffset(pos))
            .transpose()
    }

    /// Raw bytes of a string field, without the terminator.
    pub fn get_bytes(&self, id: usize) -> Result<Option<&'a [u8]>> {
        self.follow_field(id)?
            .map(|pos| read_string_bytes(self.buf, pos))
            .transpose()
    }

    pub fn get_str(&self, id: usize) -> Result<Option<&'a str>> {
        match self.get_bytes(id)? {
            Some(bytes) => std::str::from_utf8(bytes).map(Some).map_err(|e| {
                FlatError::schema_mismatch(format!("invalid UTF-8 in string field {}: {}", id, e))
            }),
            None => Ok(None),
        }
    }

    pub fn get_vector<T: Follow<'a>>(&self, id: usize) -> Result<Option<Vector<'a, T>>> {
        self.follow_field(id)?
            .map(|pos| Vector::new(self.buf, pos))
            .transpose()
    }

    pub fn get_table(&self, id: usize) -> Result<Option<Table<'a>>> {
        Ok(self.follow_field(id)?.map(|pos| Table::new(self.buf, pos)))
    }

    /// An inline struct field. Members are read by byte offset through the
    /// returned [`Struct`].
    pub fn get_struct(&self, id: usize) -> Result<Option<Struct<'a>>> {
        Ok(self.field_pos(id)?.map(|pos| Struct::new(self.buf, pos)))
    }

    pub fn get_struct_vector(
        &self,
        id: usize,
        layout: &StructLayout,
    ) -> Result<Option<StructVector<'a>>> {
        self.follow_field(id)?
            .map(|pos| StructVector::new(self.buf, pos, layout.size()))
            .transpose()
    }

    /// The union in field `id`: its type tag and the table it selects.
    /// `None` when the tag is 0 or the value is absent.
    pub fn get_union(&self, id: usize) -> Result<Option<(u8, Table<'a>)>> {
        let tag = self.get::<u8>(union_type_field(id)?, 0)?;
        if tag == 0 {
            return Ok(None);
        }
        Ok(self.get_table(id)?.map(|table| (tag, table)))
    }

    /// The root table of a finished buffer stored in the byte vector field
    /// `id`. The nested buffer is read with this buffer's byte order.
    pub fn get_nested_root(&self, id: usize) -> Result<Option<Table<'a>>> {
        match self.get_vector::<u8>(id)? {
            Some(bytes) => root_table_with_endian(bytes.as_bytes(), self.buf.endian()).map(Some),
            None => Ok(None),
        }
    }
}
