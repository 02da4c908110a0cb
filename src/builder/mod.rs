//! # Builder Module
//!
//! Produces finished buffers. See [`Builder`] for the lifecycle and
//! [`crate::layout`] for the bytes it emits.
//!
//! ## Module Structure
//!
//! - `builder`: Builder, the back-to-front writer
//! - `offset`: typed handles to objects already written
//! - `options`: BuilderOptions
//! - `struct_writer`: StructWriter, assembles inline structs
//! - `vtable_cache`: VtableCache, content-addressed vtable dedup

#[allow(clippy::module_inception)]
mod builder;
pub mod offset;
pub mod options;
pub mod struct_writer;
pub mod vtable_cache;

#[cfg(test)]
mod tests;

pub use builder::Builder;
pub use offset::{Offset, StringTag, StructTag, TableTag, VectorTag};
pub use options::BuilderOptions;
pub use struct_writer::StructWriter;
pub use vtable_cache::{VtableBytes, VtableCache};
