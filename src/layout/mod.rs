//! # Object Layout Rules
//!
//! The contract shared by the builder and the reader. Nothing in here touches
//! a buffer; it only answers "where does this go" questions.
//!
//! ## Finished Buffer Layout
//!
//! ```text
//! +-------------+-------------------+----------------------------------------+
//! | root: u32   | ident: [u8; 4]    | vtables, tables, strings, vectors ...  |
//! | (uoffset)   | (optional)        | (children at higher addresses)         |
//! +-------------+-------------------+----------------------------------------+
//! ```
//!
//! A size-prefixed buffer has one more `u32` in front holding the length of
//! everything after it.
//!
//! ## Table and VTable
//!
//! ```text
//! vtable:  | vtable_size: u16 | object_size: u16 | voffset[0]: u16 | ... | voffset[N-1] |
//!                                                      │
//! table:   | soffset: i32 | field slots ...            │
//!          ^ table_pos     ^ table_pos + voffset[i] <──┘
//!
//! vtable_pos = table_pos - soffset
//! ```
//!
//! `voffset[i] == 0` means field `i` is absent. Entries past the end of a
//! vtable are absent too, which lets a reader built for a newer schema read
//! tables written with fewer fields.
//!
//! ## Strings and Vectors
//!
//! | Kind | Layout |
//! |------|--------|
//! | String | `len: u32`, `len` UTF-8 bytes, `0u8` |
//! | Vector | `count: u32`, `count` elements at the element width |
//!
//! Offsets inside vectors (strings, tables) are uoffsets relative to the
//! element's own position. Struct elements are stored inline.
//!
//! ## Unions
//!
//! A union field takes two slots: a `u8` type tag (0 means none) followed by
//! a uoffset to a table whose type the tag selects.
//!
//! ## Alignment
//!
//! Every scalar is aligned to its own size within the finished buffer, and
//! the buffer as a whole is aligned to the largest scalar it contains. The
//! builder achieves this by padding in front of each write; see
//! [`padding_bytes`].

pub mod structs;

#[cfg(test)]
mod tests;

pub use structs::{StructLayout, StructMember};

use eyre::Result;

use crate::config::{
    FILE_IDENTIFIER_LENGTH, MAX_ALIGNMENT, MAX_FIELD_COUNT, SIZE_VOFFSET, VTABLE_METADATA_FIELDS,
    VTABLE_METADATA_SIZE,
};
use crate::error::FlatError;

pub type FileIdentifier = [u8; FILE_IDENTIFIER_LENGTH];

/// Position of field `id`'s entry inside a vtable.
#[inline]
pub const fn field_index_to_voffset(id: usize) -> usize {
    (VTABLE_METADATA_FIELDS + id) * SIZE_VOFFSET
}

#[inline]
pub const fn voffset_to_field_index(voffset: usize) -> usize {
    voffset / SIZE_VOFFSET - VTABLE_METADATA_FIELDS
}

/// Field id of the `u8` type tag that accompanies the union value stored in
/// field `id`. The tag always occupies the slot right before the value.
pub fn union_type_field(id: usize) -> Result<usize> {
    id.checked_sub(1)
        .ok_or_else(|| FlatError::schema_mismatch("a union value cannot be field 0"))
}

/// Byte size of a vtable describing `field_count` fields.
#[inline]
pub const fn vtable_size(field_count: usize) -> usize {
    VTABLE_METADATA_SIZE + field_count * SIZE_VOFFSET
}

/// Number of zero bytes to insert so that `written + padding` is a multiple
/// of `alignment`. `alignment` must be a power of two.
#[inline]
pub const fn padding_bytes(written: usize, alignment: usize) -> usize {
    (!written).wrapping_add(1) & (alignment - 1)
}

pub fn check_alignment(alignment: usize) -> Result<()> {
    if alignment == 0 || !alignment.is_power_of_two() || alignment > MAX_ALIGNMENT {
        return Err(FlatError::schema_mismatch(format!(
            "alignment {} is not a power of two in 1..={}",
            alignment, MAX_ALIGNMENT
        )));
    }
    Ok(())
}

pub fn check_field_count(field_count: usize) -> Result<()> {
    if field_count > MAX_FIELD_COUNT {
        return Err(FlatError::schema_mismatch(format!(
            "table declares {} fields, at most {} are addressable",
            field_count, MAX_FIELD_COUNT
        )));
    }
    Ok(())
}

pub fn file_identifier(ident: &str) -> Result<FileIdentifier> {
    ident.as_bytes().try_into().map_err(|_| {
        FlatError::schema_mismatch(format!(
            "file identifier must be exactly {} bytes, got {}",
            FILE_IDENTIFIER_LENGTH,
            ident.len()
        ))
    })
}
