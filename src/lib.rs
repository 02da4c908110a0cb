//! # flatlay - Zero-Copy Binary Serialization
//!
//! flatlay writes structured data into a single contiguous byte buffer that
//! can be read in place, without parsing or unpacking. Tables carry a
//! per-table field directory (a vtable), so fields can be added or left at
//! their defaults without breaking old readers, and identical directories are
//! stored once per buffer.
//!
//! - **Zero-copy reads**: getters decode only the bytes they touch and
//!   strings borrow straight from the buffer
//! - **Compact tables**: fields equal to their default are not written
//! - **Bounds-checked**: corrupt or truncated input yields an error, never a
//!   panic
//!
//! ## Quick Start
//!
//! ```ignore
//! use flatlay::{root_table, Builder};
//!
//! let mut builder = Builder::new();
//! let id = builder.create_string("x")?;
//! builder.start_object(3)?;
//! builder.add_field::<i64>(1, 0, 0)?;
//! builder.add_field::<u16>(2, 7, 0)?;
//! builder.add_offset(0, id)?;
//! let stat = builder.end_object()?;
//! builder.finish(stat, None)?;
//!
//! let stat = root_table(builder.finished_data()?)?;
//! assert_eq!(stat.get_str(0)?, Some("x"));
//! assert_eq!(stat.get_i64(1, 0)?, 0);
//! assert_eq!(stat.get_u16(2, 0)?, 7);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   view: TableView / TableWriter      │  by field name, via schema
//! ├──────────────────┬──────────────────┤
//! │ builder: Builder │ reader: Table    │  by field id
//! │   VtableCache    │   Vector, Struct │
//! ├──────────────────┴──────────────────┤
//! │   layout: wire rules, StructLayout   │
//! ├─────────────────────────────────────┤
//! │   buffer: ByteBuffer, ByteView       │
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`buffer`]: growable back-to-front storage and borrowed byte views
//! - [`builder`]: the back-to-front writer and vtable deduplication
//! - [`config`]: wire-format constants
//! - [`error`]: the error kinds carried inside `eyre` reports
//! - [`layout`]: alignment, vtable and struct layout rules
//! - [`reader`]: lazy, zero-copy access to finished buffers
//! - [`schema`]: runtime descriptions of tables, structs, enums and unions
//! - [`view`]: schema-driven reading, mutation and writing

#[macro_use]
mod macros;

pub mod buffer;
pub mod builder;
pub mod config;
pub mod error;
pub mod layout;
pub mod reader;
pub mod schema;
pub mod view;

pub use buffer::{ByteBuffer, Endian, Scalar};
pub use builder::{Builder, BuilderOptions, Offset, StructWriter};
pub use error::FlatError;
pub use layout::{file_identifier, FileIdentifier, StructLayout, StructMember};
pub use reader::{
    buffer_has_identifier, root_table, root_table_mut, root_table_mut_with_endian,
    root_table_with_endian, size_prefixed_root_table, size_prefixed_root_table_mut,
    size_prefixed_root_table_with_endian, Table, TableMut, Vector,
};
pub use schema::{
    ElemType, EnumSchema, FieldDef, FieldType, ScalarType, Schema, StructSchema, TableSchema,
    UnionSchema, Value,
};
pub use view::{TableView, TableViewMut, TableWriter};
