//! # Reader - Lazy Field Access
//!
//! Readers never parse a buffer up front. A [`Table`] is a byte view plus
//! the position of one table; each getter resolves its field through the
//! table's vtable and reads only the bytes it needs.
//!
//! ## Field Resolution
//!
//! ```text
//! 1. soffset    = i32 at table_pos
//! 2. vtable_pos = table_pos - soffset
//! 3. voffset    = u16 at vtable_pos + 4 + 2 * field_id   (0 if past the vtable)
//! 4. value      = read at table_pos + voffset            (default if voffset == 0)
//! ```
//!
//! ## Absent Fields
//!
//! A zero voffset is not an error. Scalar getters take the schema default
//! and return it; reference getters (strings, vectors, tables) return
//! `Ok(None)`.
//!
//! ## Errors
//!
//! Every position is bounds-checked, so a truncated or corrupt buffer yields
//! `OutOfRange` or `SchemaMismatch` instead of a panic. There is no type
//! information in the format: reading a `u16` field as an `i64` is not
//! detected, it simply reads eight bytes.
//!
//! ## Thread Safety
//!
//! `Table`, `Vector` and `Struct` are `Copy` views over `&[u8]` and can be
//! shared freely across threads. [`TableMut`] needs `&mut [u8]`, so the
//! borrow checker keeps mutation and reading apart.

pub mod follow;
pub mod root;
pub mod structs;
pub mod table;
pub mod table_mut;
pub mod vector;


pub use follow::Follow;
pub use root::{
    buffer_has_identifier, buffer_identifier, root_table, root_table_mut,
    root_table_mut_with_endian, root_table_with_endian, size_prefixed_region,
    size_prefixed_root_table, size_prefixed_root_table_mut, size_prefixed_root_table_with_endian,
};
pub use structs::{Struct, StructVector};
pub use table::{Table, VTable};
pub use table_mut::TableMut;
pub use vector::{Vector, VectorIter};
