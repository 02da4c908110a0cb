//! # Borrowed Byte Views
//!
//! `ByteView` and `ByteViewMut` give finished buffers the same checked scalar
//! access as [`ByteBuffer`](super::ByteBuffer) without owning the bytes.
//! `ByteView` is `Copy`, so readers pass it around freely; any number of
//! views may read the same slice at once.

use eyre::Result;

use crate::buffer::check_range;
use crate::buffer::scalar::{Endian, Scalar};

#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    data: &'a [u8],
    endian: Endian,
}

impl<'a> ByteView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    pub fn with_endian(data: &'a [u8], endian: Endian) -> Self {
        Self { data, endian }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get<T: Scalar>(&self, pos: usize) -> Result<T> {
        check_range(pos, T::SIZE, self.data.len())?;
        Ok(T::read_from(&self.data[pos..pos + T::SIZE], self.endian))
    }

    #[inline]
    pub fn bytes(&self, pos: usize, len: usize) -> Result<&'a [u8]> {
        check_range(pos, len, self.data.len())?;
        Ok(&self.data[pos..pos + len])
    }

    /// Follows the unsigned offset stored at `pos` and returns the absolute
    /// position it points to.
    #[inline]
    pub fn follow_uoffset(&self, pos: usize) -> Result<usize> {
        let off = self.get::<u32>(pos)? as usize;
        let target = pos + off;
        check_range(target, 0, self.data.len())?;
        Ok(target)
    }
}

#[derive(Debug)]
pub struct ByteViewMut<'a> {
    data: &'a mut [u8],
    endian: Endian,
}

impl<'a> ByteViewMut<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    pub fn with_endian(data: &'a mut [u8], endian: Endian) -> Self {
        Self { data, endian }
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A shorter-lived mutable view of the same bytes.
    pub fn reborrow(&mut self) -> ByteViewMut<'_> {
        ByteViewMut::with_endian(self.data, self.endian)
    }

    pub fn as_view(&self) -> ByteView<'_> {
        ByteView::with_endian(self.data, self.endian)
    }

    #[inline]
    pub fn get<T: Scalar>(&self, pos: usize) -> Result<T> {
        self.as_view().get(pos)
    }

    #[inline]
    pub fn put<T: Scalar>(&mut self, pos: usize, value: T) -> Result<()> {
        check_range(pos, T::SIZE, self.data.len())?;
        value.write_to(&mut self.data[pos..pos + T::SIZE], self.endian);
        Ok(())
    }
}
