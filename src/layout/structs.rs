//! # Struct Layout
//!
//! Structs are fixed-layout records stored inline. Members are placed in
//! declaration order, each aligned to its own alignment, and the total size
//! is rounded up to the struct's alignment (the largest member alignment) so
//! that structs can be packed back to back in a vector.
//!
//! ```text
//! struct Vec3 { x: f32, y: f32, z: f32, flag: u8, id: u64 }
//!
//! offset:  0    4    8    12  13      16        24
//!          | x  | y  | z  |fl| pad   |   id    |
//! size = 24, align = 8
//! ```

use eyre::Result;

use crate::error::FlatError;
use crate::layout::{check_alignment, padding_bytes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructMember {
    pub size: usize,
    pub align: usize,
}

impl StructMember {
    pub const fn scalar(size: usize) -> Self {
        Self { size, align: size }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    members: Vec<StructMember>,
    offsets: Vec<usize>,
    size: usize,
    align: usize,
}

impl StructLayout {
    pub fn new(members: Vec<StructMember>) -> Result<Self> {
        if members.is_empty() {
            return Err(FlatError::schema_mismatch("struct must have at least one member"));
        }

        let mut offsets = Vec::with_capacity(members.len());
        let mut offset = 0;
        let mut align = 1;

        for member in &members {
            check_alignment(member.align)?;
            offset += padding_bytes(offset, member.align);
            offsets.push(offset);
            offset += member.size;
            align = align.max(member.align);
        }

        let size = offset + padding_bytes(offset, align);

        Ok(Self {
            members,
            offsets,
            size,
            align,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn align(&self) -> usize {
        self.align
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn member(&self, idx: usize) -> Option<&StructMember> {
        self.members.get(idx)
    }

    pub fn offset(&self, idx: usize) -> Option<usize> {
        self.offsets.get(idx).copied()
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}
