//! # Root Access
//!
//! Entry points from a finished buffer to its root table, plus file
//! identifier checks.
//!
//! ```text
//! plain:          | root: u32 | ident? | ...
//! size-prefixed:  | size: u32 | root: u32 | ident? | ...
//! ```

use eyre::Result;

use crate::buffer::{ByteView, ByteViewMut, Endian};
use crate::config::{FILE_IDENTIFIER_LENGTH, SIZE_PREFIX_LENGTH, SIZE_UOFFSET};
use crate::error::FlatError;
use crate::layout::FileIdentifier;
use crate::reader::table::Table;
use crate::reader::table_mut::TableMut;

pub fn root_table(buf: &[u8]) -> Result<Table<'_>> {
    root_table_with_endian(buf, Endian::Little)
}

pub fn root_table_with_endian(buf: &[u8], endian: Endian) -> Result<Table<'_>> {
    let view = ByteView::with_endian(buf, endian);
    let root = view.follow_uoffset(0)?;
    Ok(Table::new(view, root))
}

/// Reads a buffer written with `finish_size_prefixed`. The prefix must not
/// claim more bytes than `buf` holds; trailing bytes after the prefixed
/// region are ignored.
pub fn size_prefixed_root_table(buf: &[u8]) -> Result<Table<'_>> {
    size_prefixed_root_table_with_endian(buf, Endian::Little)
}

pub fn size_prefixed_root_table_with_endian(buf: &[u8], endian: Endian) -> Result<Table<'_>> {
    let inner = size_prefixed_region(buf, endian)?;
    root_table_with_endian(inner, endian)
}

/// The bytes covered by the size prefix, without the prefix itself.
pub fn size_prefixed_region(buf: &[u8], endian: Endian) -> Result<&[u8]> {
    let size = ByteView::with_endian(buf, endian).get::<u32>(0)? as usize;
    let end = SIZE_PREFIX_LENGTH
        .checked_add(size)
        .filter(|&end| end <= buf.len())
        .ok_or_else(|| FlatError::out_of_range(SIZE_PREFIX_LENGTH, size, buf.len()))?;
    Ok(&buf[SIZE_PREFIX_LENGTH..end])
}

pub fn root_table_mut(buf: &mut [u8]) -> Result<TableMut<'_>> {
    root_table_mut_with_endian(buf, Endian::Little)
}

pub fn root_table_mut_with_endian(buf: &mut [u8], endian: Endian) -> Result<TableMut<'_>> {
    let root = ByteView::with_endian(buf, endian).follow_uoffset(0)?;
    Ok(TableMut::new(ByteViewMut::with_endian(buf, endian), root))
}

/// Mutable access to the root of a size-prefixed buffer.
pub fn size_prefixed_root_table_mut(buf: &mut [u8], endian: Endian) -> Result<TableMut<'_>> {
    let len = size_prefixed_region(buf, endian)?.len();
    root_table_mut_with_endian(&mut buf[SIZE_PREFIX_LENGTH..SIZE_PREFIX_LENGTH + len], endian)
}

/// The four identifier bytes following the root offset, if the buffer is
/// long enough to hold them. Whether they are a real identifier is up to the
/// caller.
pub fn buffer_identifier(buf: &[u8], size_prefixed: bool) -> Option<&FileIdentifier> {
    let start = SIZE_UOFFSET + if size_prefixed { SIZE_PREFIX_LENGTH } else { 0 };
    buf.get(start..start + FILE_IDENTIFIER_LENGTH)?
        .try_into()
        .ok()
}

pub fn buffer_has_identifier(buf: &[u8], ident: &FileIdentifier, size_prefixed: bool) -> bool {
    buffer_identifier(buf, size_prefixed) == Some(ident)
}
