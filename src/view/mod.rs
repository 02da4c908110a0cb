//! # Schema-Driven Views
//!
//! Generated accessor code, expressed at runtime. A [`TableSchema`] maps
//! field names to ids and types, and the [`Schema`] holding it resolves the
//! tables its fields refer to; the views here use it to read, mutate and
//! write tables by name, with default substitution and required-field
//! checks, on top of the untyped [`Builder`] and [`Table`] APIs.
//!
//! ```ignore
//! let schema = Schema::single(stat_schema)?;
//! let mut stat = TableWriter::new(&schema);
//! stat.set("id", "x")?.set("count", 7u16)?;
//! let root = stat.finish(&mut builder)?;
//! builder.finish(root, None)?;
//!
//! let view = TableView::root(builder.finished_data()?, &schema)?;
//! assert_eq!(view.get("val")?, Value::Int64(0));   // absent: default
//! assert_eq!(view.get("count")?, Value::UInt16(7));
//! ```
//!
//! ## Write Order
//!
//! [`TableWriter::finish`] writes every string and vector first, while the
//! builder is idle, then opens the table and adds its fields largest first
//! to keep padding low.
//!
//! [`TableSchema`]: crate::schema::TableSchema
//! [`Schema`]: crate::schema::Schema
//! [`Builder`]: crate::builder::Builder
//! [`Table`]: crate::reader::Table

mod scalar;
pub mod table_view;
pub mod writer;


pub use table_view::{TableView, TableViewMut};
pub use writer::TableWriter;
