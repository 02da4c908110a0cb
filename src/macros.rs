//! # Internal Macros
//!
//! Boilerplate reducers for the per-type accessors on [`Table`] and
//! [`TableMut`]. Each scalar type gets a named method that forwards to the
//! generic one, which reads better at call sites that mirror a schema:
//!
//! ```ignore
//! impl<'a> Table<'a> {
//!     typed_getters!(u16, i64);
//! }
//!
//! // Generates:
//! // pub fn get_u16(&self, id: usize, default: u16) -> Result<u16> { self.get::<u16>(id, default) }
//! // pub fn get_i64(&self, id: usize, default: i64) -> Result<i64> { self.get::<i64>(id, default) }
//! ```
//!
//! [`Table`]: crate::reader::Table
//! [`TableMut`]: crate::reader::TableMut

/// Generates `get_<ty>(id, default)` forwarding to `get::<ty>`.
macro_rules! typed_getters {
    ($($ty:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[inline]
                pub fn [<get_ $ty>](&self, id: usize, default: $ty) -> ::eyre::Result<$ty> {
                    self.get::<$ty>(id, default)
                }
            )*
        }
    };
}

/// Generates `mutate_<ty>(id, value)` forwarding to `mutate::<ty>`.
macro_rules! typed_mutators {
    ($($ty:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[inline]
                pub fn [<mutate_ $ty>](&mut self, id: usize, value: $ty) -> ::eyre::Result<bool> {
                    self.mutate::<$ty>(id, value)
                }
            )*
        }
    };
}
