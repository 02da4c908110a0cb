//! # ByteBuffer - Growable Back-to-Front Storage
//!
//! `ByteBuffer` owns the bytes of a buffer under construction. Writers claim
//! space in front of the current position and fill it; readers address bytes
//! by absolute position in the current allocation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut bb = ByteBuffer::with_capacity(16, Endian::Little);
//! let pos = bb.claim(4)?;
//! bb.put::<u32>(pos, 7)?;
//! assert_eq!(bb.get::<u32>(pos)?, 7);
//! assert_eq!(bb.written(), &[7, 0, 0, 0]);
//! ```

use eyre::Result;
use tracing::debug;

use crate::buffer::check_range;
use crate::buffer::scalar::{Endian, Scalar};
use crate::config::{DEFAULT_BUFFER_CAPACITY, MAX_ALIGNMENT, MAX_BUFFER_SIZE};
use crate::error::FlatError;

#[derive(Debug, Clone)]
pub struct ByteBuffer {
    data: Vec<u8>,
    head: usize,
    endian: Endian,
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY, Endian::Little)
    }
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize, endian: Endian) -> Self {
        let capacity = capacity.min(MAX_BUFFER_SIZE);
        Self {
            data: vec![0u8; capacity],
            head: capacity,
            endian,
        }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Start of the written region. Everything in `[position, capacity)` has
    /// been written.
    pub fn position(&self) -> usize {
        self.head
    }

    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(FlatError::out_of_range(pos, 0, self.data.len()));
        }
        self.head = pos;
        Ok(())
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free bytes in front of the written region.
    pub fn space(&self) -> usize {
        self.head
    }

    pub fn get<T: Scalar>(&self, pos: usize) -> Result<T> {
        check_range(pos, T::SIZE, self.data.len())?;
        Ok(T::read_from(&self.data[pos..pos + T::SIZE], self.endian))
    }

    pub fn put<T: Scalar>(&mut self, pos: usize, value: T) -> Result<()> {
        check_range(pos, T::SIZE, self.data.len())?;
        value.write_to(&mut self.data[pos..pos + T::SIZE], self.endian);
        Ok(())
    }

    pub fn bytes(&self, pos: usize, len: usize) -> Result<&[u8]> {
        check_range(pos, len, self.data.len())?;
        Ok(&self.data[pos..pos + len])
    }

    pub fn put_bytes(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        check_range(pos, bytes.len(), self.data.len())?;
        self.data[pos..pos + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Doubles the allocation and moves the written region to the end of the
    /// new one. Positions measured from the end are unchanged.
    pub fn grow(&mut self) -> Result<()> {
        let old_cap = self.data.len();
        if old_cap >= MAX_BUFFER_SIZE {
            return Err(FlatError::out_of_range(old_cap, 1, MAX_BUFFER_SIZE));
        }
        let new_cap = old_cap
            .saturating_mul(2)
            .max(MAX_ALIGNMENT)
            .min(MAX_BUFFER_SIZE);
        let shift = new_cap - old_cap;

        let mut data = vec![0u8; new_cap];
        data[shift + self.head..].copy_from_slice(&self.data[self.head..]);
        self.data = data;
        self.head += shift;

        debug!(old_cap, new_cap, written = self.len(), "byte buffer grown");
        Ok(())
    }

    /// Grows until at least `additional` free bytes precede the written region.
    pub fn ensure_space(&mut self, additional: usize) -> Result<()> {
        if additional > MAX_BUFFER_SIZE - self.len() {
            return Err(FlatError::out_of_range(
                self.len(),
                additional,
                MAX_BUFFER_SIZE,
            ));
        }
        while self.head < additional {
            self.grow()?;
        }
        Ok(())
    }

    /// Moves the position `len` bytes towards the start, growing first if
    /// needed, and returns the new position.
    pub fn claim(&mut self, len: usize) -> Result<usize> {
        self.ensure_space(len)?;
        self.head -= len;
        Ok(self.head)
    }

    /// The whole allocation, including the unwritten bytes in front.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn written(&self) -> &[u8] {
        &self.data[self.head..]
    }

    pub fn written_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.head..]
    }

    pub fn into_written(mut self) -> Vec<u8> {
        self.data.drain(..self.head);
        self.data
    }

    /// Forgets all written bytes but keeps the allocation.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.head = self.data.len();
    }
}
