//! # Inline Struct Access
//!
//! Structs carry no vtable: a member is read at a fixed byte offset from the
//! struct's start, taken from its [`StructLayout`](crate::layout::StructLayout).

use eyre::Result;

use crate::buffer::{ByteView, Scalar};
use crate::config::SIZE_LENGTH_PREFIX;
use crate::error::FlatError;

#[derive(Debug, Clone, Copy)]
pub struct Struct<'a> {
    buf: ByteView<'a>,
    pos: usize,
}

impl<'a> Struct<'a> {
    pub fn new(buf: ByteView<'a>, pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Reads the member that starts `offset` bytes into the struct.
    pub fn get<T: Scalar>(&self, offset: usize) -> Result<T> {
        let pos = self
            .pos
            .checked_add(offset)
            .ok_or_else(|| FlatError::out_of_range(self.pos, offset, self.buf.len()))?;
        self.buf.get::<T>(pos)
    }

    pub fn bytes(&self, size: usize) -> Result<&'a [u8]> {
        self.buf.bytes(self.pos, size)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StructVector<'a> {
    buf: ByteView<'a>,
    pos: usize,
    len: usize,
    elem_size: usize,
}

impl<'a> StructVector<'a> {
    pub fn new(buf: ByteView<'a>, pos: usize, elem_size: usize) -> Result<Self> {
        let len = buf.get::<u32>(pos)? as usize;
        let body = len
            .checked_mul(elem_size)
            .ok_or_else(|| FlatError::out_of_range(pos, usize::MAX, buf.len()))?;
        buf.bytes(pos + SIZE_LENGTH_PREFIX, body)?;
        Ok(Self {
            buf,
            pos,
            len,
            elem_size,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, idx: usize) -> Result<Struct<'a>> {
        if idx >= self.len {
            return Err(FlatError::out_of_range(idx, 1, self.len));
        }
        Ok(Struct::new(
            self.buf,
            self.pos + SIZE_LENGTH_PREFIX + idx * self.elem_size,
        ))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Struct<'a>> + '_ {
        let base = self.pos + SIZE_LENGTH_PREFIX;
        (0..self.len).map(move |idx| Struct::new(self.buf, base + idx * self.elem_size))
    }
}
