//! # Byte Buffer Layer
//!
//! The lowest layer of the engine: fixed-width scalar reads and writes at
//! absolute byte positions, honoring a configured byte order.
//!
//! ## Components
//!
//! | Type | Owns bytes | Used by |
//! |------|------------|---------|
//! | [`ByteBuffer`] | yes, growable | the builder, while a buffer is under construction |
//! | [`ByteView`] | no, `&[u8]` | readers of a finished buffer |
//! | [`ByteViewMut`] | no, `&mut [u8]` | in-place mutation of a finished buffer |
//!
//! ## Back-to-Front Growth
//!
//! `ByteBuffer` fills from the end of its allocation towards the start. The
//! written region is always `[position, capacity)`. Growing doubles the
//! allocation and copies the written region to the END of the new one:
//!
//! ```text
//! before:  [ free free free | w0 w1 w2 ]          capacity 8, position 5
//! after:   [ free ... free free free | w0 w1 w2 ] capacity 16, position 13
//! ```
//!
//! A location's distance from the end never changes, which is why the builder
//! hands out offsets measured from the end and only converts them to absolute
//! positions once the buffer is finished.
//!
//! ## Byte Order
//!
//! All multi-byte values go through [`Scalar`], which encodes with the
//! [`Endian`] carried by the buffer or view. The format default is little
//! endian.

pub mod byte_buffer;
pub mod scalar;
pub mod view;

#[cfg(test)]
mod tests;

pub use byte_buffer::ByteBuffer;
pub use scalar::{Endian, Scalar};
pub use view::{ByteView, ByteViewMut};

use eyre::Result;

use crate::error::FlatError;

#[inline]
pub(crate) fn check_range(pos: usize, size: usize, len: usize) -> Result<()> {
    match pos.checked_add(size) {
        Some(end) if end <= len => Ok(()),
        _ => Err(FlatError::out_of_range(pos, size, len)),
    }
}
