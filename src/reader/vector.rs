//! # Vector - Length-Prefixed Element Sequences
//!
//! `Vector<T>` reads a `u32` element count at construction and checks that
//! all elements fit in the buffer. Elements are decoded on access through
//! [`Follow`], so a vector of tables costs nothing until an element is read.

use std::marker::PhantomData;

use eyre::Result;

use crate::buffer::ByteView;
use crate::config::SIZE_LENGTH_PREFIX;
use crate::error::FlatError;
use crate::reader::follow::Follow;
use crate::reader::table::Table;

pub struct Vector<'a, T> {
    buf: ByteView<'a>,
    pos: usize,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T> Clone for Vector<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Vector<'_, T> {}

impl<T> std::fmt::Debug for Vector<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vector")
            .field("pos", &self.pos)
            .field("len", &self.len)
            .finish()
    }
}

impl<'a, T: Follow<'a>> Vector<'a, T> {
    /// `pos` is the position of the length prefix.
    pub fn new(buf: ByteView<'a>, pos: usize) -> Result<Self> {
        let len = buf.get::<u32>(pos)? as usize;
        let body = len
            .checked_mul(T::WIDTH)
            .ok_or_else(|| FlatError::out_of_range(pos, usize::MAX, buf.len()))?;
        buf.bytes(pos + SIZE_LENGTH_PREFIX, body)?;
        Ok(Self {
            buf,
            pos,
            len,
            _marker: PhantomData,
        })
    }

    /// Position of the length prefix.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn element_pos(&self, idx: usize) -> usize {
        self.pos + SIZE_LENGTH_PREFIX + idx * T::WIDTH
    }

    pub fn get(&self, idx: usize) -> Result<T> {
        if idx >= self.len {
            return Err(FlatError::out_of_range(idx, 1, self.len));
        }
        T::follow(self.buf, self.element_pos(idx))
    }

    /// Raw element bytes, for bulk copies of scalar vectors.
    pub fn as_bytes(&self) -> &'a [u8] {
        let start = self.pos + SIZE_LENGTH_PREFIX;
        &self.buf.data()[start..start + self.len * T::WIDTH]
    }

    pub fn iter(&self) -> VectorIter<'a, T> {
        VectorIter {
            vector: *self,
            next: 0,
        }
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

impl<'a> Vector<'a, Table<'a>> {
    /// Binary search over a vector of tables sorted by the string field
    /// `key_field`. Tables without the key sort as the empty string.
    pub fn lookup_by_key(&self, key_field: usize, key: &str) -> Result<Option<Table<'a>>> {
        let key = key.as_bytes();
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let table = self.get(mid)?;
            let candidate = table.get_bytes(key_field)?.unwrap_or(&[]);
            match candidate.cmp(key) {
                std::cmp::Ordering::Equal => return Ok(Some(table)),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        Ok(None)
    }
}

impl<'a, T: Follow<'a>> IntoIterator for Vector<'a, T> {
    type Item = Result<T>;
    type IntoIter = VectorIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct VectorIter<'a, T> {
    vector: Vector<'a, T>,
    next: usize,
}

impl<'a, T: Follow<'a>> Iterator for VectorIter<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.vector.len {
            return None;
        }
        let item = self.vector.get(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Follow<'a>> ExactSizeIterator for VectorIter<'a, T> {}
