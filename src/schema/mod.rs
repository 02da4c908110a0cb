//! # Schema Descriptors
//!
//! A schema describes, at runtime, what generated accessor code would
//! otherwise hard-wire: which field id holds what type and which default.
//! The builder and reader never need one; the typed views in
//! [`crate::view`] use it to turn field names into ids and bytes into
//! [`Value`]s.
//!
//! ## Example
//!
//! The `Stat` record (`id: string`, `val: long`, `count: ushort`):
//!
//! ```ignore
//! let stat = TableSchema::new(
//!     "Stat",
//!     vec![
//!         FieldDef::new("id", FieldType::String),
//!         FieldDef::new("val", FieldType::Scalar(ScalarType::Int64)),
//!         FieldDef::new("count", FieldType::Scalar(ScalarType::UInt16)),
//!     ],
//! )?;
//! ```
//!
//! Field ids are positions in the field list. Deprecated fields keep their
//! id so later fields do not shift. Tables are gathered into a [`Schema`],
//! which names the root table and resolves the table ids fields refer to.
//!
//! ## Module Structure
//!
//! - `types`: ScalarType, ElemType, FieldType
//! - `value`: Value, the dynamically typed field value
//! - `table`: FieldDef and TableSchema
//! - `structs`: StructSchema with its computed layout
//! - `enums`: EnumSchema and UnionSchema
//! - `registry`: Schema, the set of tables fields refer to by id

pub mod enums;
pub mod registry;
pub mod structs;
pub mod table;
pub mod types;
pub mod value;


pub use enums::{EnumSchema, UnionSchema};
pub use registry::Schema;
pub use structs::StructSchema;
pub use table::{FieldDef, TableSchema};
pub use types::{ElemType, FieldType, ScalarType};
pub use value::Value;
