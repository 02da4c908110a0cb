//! # Builder - Back-to-Front Buffer Construction
//!
//! `Builder` writes an object graph from the leaves up. Children (strings,
//! vectors, sub-tables) are written first and return an [`Offset`]; the
//! parent table written afterwards stores backward references to them. The
//! buffer fills from the end of its allocation towards the start, so every
//! reference a parent stores points at bytes that already exist.
//!
//! ## Lifecycle
//!
//! ```text
//!            start_object            end_object
//!   Idle ─────────────────> InObject ─────────> Idle
//!    │  ^                                        │
//!    │  └──── start_vector ─> InVector ─ end_vector
//!    │
//!    └─ finish ─> Finished ── reset ──> Idle
//! ```
//!
//! Only one object or vector may be in progress at a time. Strings and
//! vectors must be created while the builder is idle, i.e. before the table
//! that references them is started. Structs are the exception: they are
//! written inline, inside the table or vector that holds them.
//!
//! ## Usage
//!
//! ```ignore
//! let mut builder = Builder::new();
//! let id = builder.create_string("x")?;
//! builder.start_object(3)?;
//! builder.add_field::<i64>(1, 0, 0)?;   // equals default: not written
//! builder.add_offset(0, id)?;
//! builder.add_field::<u16>(2, 7, 0)?;
//! let stat = builder.end_object()?;
//! builder.finish(stat, None)?;
//! let bytes = builder.finished_data()?;
//! ```
//!
//! ## Field Order
//!
//! Fields may be added in any order. Adding larger scalars first minimizes
//! padding, which is what the schema-driven writer in [`crate::view`] does.

use eyre::Result;
use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::buffer::{ByteBuffer, ByteView, Endian, Scalar};
use crate::builder::offset::{Offset, StringTag, StructTag, TableTag, VectorTag};
use crate::builder::options::BuilderOptions;
use crate::builder::struct_writer::StructWriter;
use crate::builder::vtable_cache::{VtableBytes, VtableCache};
use crate::config::{
    FILE_IDENTIFIER_LENGTH, NESTED_BUFFER_ALIGNMENT, SIZE_SOFFSET, SIZE_UOFFSET, SIZE_VOFFSET,
};
use crate::error::FlatError;
use crate::layout::{
    check_alignment, check_field_count, padding_bytes, union_type_field, vtable_size,
    FileIdentifier, StructLayout,
};
use crate::reader::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildState {
    Idle,
    InObject { start: u32 },
    InVector { count: usize, elem_size: usize, start: u32 },
    Finished,
}

impl BuildState {
    fn describe(&self) -> &'static str {
        match self {
            BuildState::Idle => "no object is in progress",
            BuildState::InObject { .. } => "an object is in progress",
            BuildState::InVector { .. } => "a vector is in progress",
            BuildState::Finished => "the buffer is finished",
        }
    }
}

#[derive(Debug)]
pub struct Builder {
    bb: ByteBuffer,
    state: BuildState,
    min_align: usize,
    vtable: SmallVec<[u32; 16]>,
    vtables: VtableCache,
    shared_strings: HashMap<Box<[u8]>, u32>,
    force_defaults: bool,
    dedup_vtables: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::from_options(BuilderOptions::default())
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_options(BuilderOptions::default().initial_capacity(capacity))
    }

    pub fn options() -> BuilderOptions {
        BuilderOptions::default()
    }

    pub fn from_options(options: BuilderOptions) -> Self {
        Self {
            bb: ByteBuffer::with_capacity(options.initial_capacity, options.endian),
            state: BuildState::Idle,
            min_align: 1,
            vtable: SmallVec::new(),
            vtables: VtableCache::new(),
            shared_strings: HashMap::new(),
            force_defaults: options.force_defaults,
            dedup_vtables: options.dedup_vtables,
        }
    }

    pub fn endian(&self) -> Endian {
        self.bb.endian()
    }

    pub fn set_force_defaults(&mut self, force: bool) {
        self.force_defaults = force;
    }

    /// Bytes written so far, which is also the offset the next object will get.
    pub fn offset(&self) -> u32 {
        self.bb.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.bb.capacity()
    }

    pub fn is_finished(&self) -> bool {
        self.state == BuildState::Finished
    }

    /// Number of distinct vtables written into the current buffer.
    pub fn vtable_count(&self) -> usize {
        self.vtables.len()
    }

    pub fn vtable_cache(&self) -> &VtableCache {
        &self.vtables
    }

    /// Discards everything written and returns to the idle state, keeping
    /// the allocation.
    pub fn reset(&mut self) {
        self.bb.clear();
        self.state = BuildState::Idle;
        self.min_align = 1;
        self.vtable.clear();
        self.vtables.clear();
        self.shared_strings.clear();
    }

    fn expect_idle(&self, op: &'static str) -> Result<()> {
        match self.state {
            BuildState::Idle => Ok(()),
            other => Err(FlatError::invalid_state(op, other.describe())),
        }
    }

    fn expect_not_finished(&self, op: &'static str) -> Result<()> {
        match self.state {
            BuildState::Finished => Err(FlatError::invalid_state(op, self.state.describe())),
            _ => Ok(()),
        }
    }

    fn track_alignment(&mut self, size: usize) {
        if size > self.min_align {
            self.min_align = size;
        }
    }

    /// Pads so that, after `additional` more bytes are written, the next
    /// write of `size` bytes lands on a `size`-aligned position.
    fn prep(&mut self, size: usize, additional: usize) -> Result<()> {
        self.track_alignment(size);
        let pad = padding_bytes(self.bb.len() + additional, size);
        self.bb.ensure_space(pad + size + additional)?;
        self.pad(pad)
    }

    fn pad(&mut self, n: usize) -> Result<()> {
        if n > 0 {
            self.bb.claim(n)?;
            self.bb.written_mut()[..n].fill(0);
        }
        Ok(())
    }

    fn place<T: Scalar>(&mut self, value: T) -> Result<()> {
        let pos = self.bb.claim(T::SIZE)?;
        self.bb.put(pos, value)
    }

    fn push<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.prep(T::SIZE, 0)?;
        self.place(value)
    }

    /// Writes a uoffset pointing at `target`, relative to the slot itself.
    fn push_uoffset(&mut self, target: u32) -> Result<()> {
        self.prep(SIZE_UOFFSET, 0)?;
        let here = self.offset();
        if target == 0 || target > here {
            return Err(FlatError::out_of_range(target as usize, 0, here as usize));
        }
        self.place::<u32>(here - target + SIZE_UOFFSET as u32)
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    pub fn start_object(&mut self, field_count: usize) -> Result<()> {
        self.expect_idle("start an object")?;
        check_field_count(field_count)?;
        self.vtable.clear();
        self.vtable.resize(field_count, 0);
        self.state = BuildState::InObject {
            start: self.offset(),
        };
        Ok(())
    }

    fn check_field(&self, op: &'static str, id: usize) -> Result<()> {
        match self.state {
            BuildState::InObject { .. } => {}
            other => return Err(FlatError::invalid_state(op, other.describe())),
        }
        if id >= self.vtable.len() {
            return Err(FlatError::schema_mismatch(format!(
                "field id {} out of range for object with {} fields",
                id,
                self.vtable.len()
            )));
        }
        Ok(())
    }

    fn slot(&mut self, id: usize) {
        self.vtable[id] = self.offset();
    }

    /// Adds a scalar field. A value equal to `default` is not written unless
    /// the builder forces defaults; readers substitute the default instead.
    pub fn add_field<T: Scalar>(&mut self, id: usize, value: T, default: T) -> Result<()> {
        self.check_field("add a field", id)?;
        if value == default && !self.force_defaults {
            return Ok(());
        }
        self.push(value)?;
        self.slot(id);
        Ok(())
    }

    /// Adds a scalar field unconditionally, even if it equals the default.
    pub fn add_field_forced<T: Scalar>(&mut self, id: usize, value: T) -> Result<()> {
        self.check_field("add a field", id)?;
        self.push(value)?;
        self.slot(id);
        Ok(())
    }

    /// Adds a reference to a string, vector or table finished earlier. A null
    /// offset leaves the field absent.
    pub fn add_offset<T>(&mut self, id: usize, target: Offset<T>) -> Result<()> {
        self.check_field("add an offset", id)?;
        if target.is_null() {
            return Ok(());
        }
        self.push_uoffset(target.value())?;
        self.slot(id);
        Ok(())
    }

    /// Writes a struct inline as field `id` of the object in progress.
    pub fn add_struct(&mut self, id: usize, value: &StructWriter<'_>) -> Result<()> {
        self.check_field("add a struct", id)?;
        let written = self.create_struct(value)?;
        self.slot_struct(id, written)
    }

    /// Records a struct that was written with [`Builder::create_struct`]
    /// immediately before this call.
    pub fn slot_struct(&mut self, id: usize, written: Offset<StructTag>) -> Result<()> {
        self.check_field("add a struct", id)?;
        if written.value() != self.offset() {
            return Err(FlatError::invalid_state(
                "add a struct",
                "other data was written after the struct",
            ));
        }
        self.slot(id);
        Ok(())
    }

    /// Adds a union: the type tag `tag` goes into field `id - 1` and the
    /// reference to `value` into field `id`. A zero tag with a null value
    /// leaves the union absent.
    pub fn add_union(&mut self, id: usize, tag: u8, value: Offset<TableTag>) -> Result<()> {
        let type_id = union_type_field(id)?;
        self.check_field("add a union", id)?;
        match (tag, value.is_null()) {
            (0, true) => Ok(()),
            (0, false) | (_, true) => Err(FlatError::schema_mismatch(format!(
                "union in field {} needs both a type tag and a value, got tag {}",
                id, tag
            ))),
            _ => {
                self.add_offset(id, value)?;
                self.add_field_forced::<u8>(type_id, tag)
            }
        }
    }

    pub fn end_object(&mut self) -> Result<Offset<TableTag>> {
        let start = match self.state {
            BuildState::InObject { start } => start,
            other => return Err(FlatError::invalid_state("end an object", other.describe())),
        };

        let here = self.offset() as usize;
        let object_size = here + padding_bytes(here, SIZE_SOFFSET) + SIZE_SOFFSET - start as usize;
        if object_size > u16::MAX as usize {
            self.vtable.clear();
            self.state = BuildState::Idle;
            return Err(FlatError::schema_mismatch(format!(
                "object of {} bytes exceeds the {} bytes a vtable can address",
                object_size,
                u16::MAX
            )));
        }

        self.push::<i32>(0)?;
        let object_offset = self.offset();

        let used = self
            .vtable
            .iter()
            .rposition(|&slot| slot != 0)
            .map_or(0, |last| last + 1);
        let vt_size = vtable_size(used);

        let endian = self.endian();
        let mut key: VtableBytes = smallvec::smallvec![0u8; vt_size];
        (vt_size as u16).write_to(&mut key[0..2], endian);
        (object_size as u16).write_to(&mut key[2..4], endian);
        for (i, &slot) in self.vtable[..used].iter().enumerate() {
            let voffset = if slot == 0 { 0 } else { (object_offset - slot) as u16 };
            let at = 4 + i * SIZE_VOFFSET;
            voffset.write_to(&mut key[at..at + SIZE_VOFFSET], endian);
        }

        let existing = if self.dedup_vtables {
            self.vtables.lookup(&key)
        } else {
            None
        };

        let vt_offset = match existing {
            Some(vt_offset) => {
                trace!(vt_offset, object_offset, "reusing vtable");
                vt_offset
            }
            None => {
                let pos = self.bb.claim(vt_size)?;
                self.bb.put_bytes(pos, &key)?;
                let vt_offset = self.offset();
                trace!(vt_offset, vt_size, "writing new vtable");
                if self.dedup_vtables {
                    self.vtables.insert(key, vt_offset);
                }
                vt_offset
            }
        };

        let table_pos = self.bb.capacity() - object_offset as usize;
        self.bb
            .put::<i32>(table_pos, vt_offset as i32 - object_offset as i32)?;

        self.vtable.clear();
        self.state = BuildState::Idle;
        Ok(Offset::new(object_offset))
    }

    /// Fails unless field `id` of the already finished `table` was written.
    pub fn required(&self, table: Offset<TableTag>, id: usize) -> Result<()> {
        if self.table_at(table)?.field_offset(id)? == 0 {
            return Err(FlatError::schema_mismatch(format!(
                "required field {} is missing",
                id
            )));
        }
        Ok(())
    }

    /// Reader over a table already written into the buffer under construction.
    fn table_at(&self, table: Offset<TableTag>) -> Result<Table<'_>> {
        let here = self.offset();
        if table.is_null() || table.value() > here {
            return Err(FlatError::out_of_range(
                table.value() as usize,
                0,
                here as usize,
            ));
        }
        let view = ByteView::with_endian(self.bb.as_slice(), self.endian());
        Ok(Table::new(view, self.bb.capacity() - table.value() as usize))
    }

    // ------------------------------------------------------------------
    // Structs
    // ------------------------------------------------------------------

    /// Copies a struct into the buffer, aligned to its layout.
    pub fn create_struct(&mut self, value: &StructWriter<'_>) -> Result<Offset<StructTag>> {
        self.expect_not_finished("write a struct")?;
        if value.endian() != self.endian() {
            return Err(FlatError::schema_mismatch(format!(
                "struct encoded as {:?} endian, buffer is {:?}",
                value.endian(),
                self.endian()
            )));
        }
        let layout = value.layout();
        self.prep(layout.align(), layout.size())?;
        let pos = self.bb.claim(layout.size())?;
        self.bb.put_bytes(pos, value.bytes())?;
        Ok(Offset::new(self.offset()))
    }

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    pub fn create_string(&mut self, s: &str) -> Result<Offset<StringTag>> {
        self.create_byte_string(s.as_bytes())
    }

    /// Writes a length-prefixed, zero-terminated byte string.
    pub fn create_byte_string(&mut self, bytes: &[u8]) -> Result<Offset<StringTag>> {
        self.expect_idle("create a string")?;
        self.prep(SIZE_UOFFSET, bytes.len() + 1)?;
        self.place::<u8>(0)?;
        let pos = self.bb.claim(bytes.len())?;
        self.bb.put_bytes(pos, bytes)?;
        self.place::<u32>(bytes.len() as u32)?;
        Ok(Offset::new(self.offset()))
    }

    /// Like [`Builder::create_string`], but identical strings created through
    /// this method are written once and share an offset.
    pub fn create_shared_string(&mut self, s: &str) -> Result<Offset<StringTag>> {
        self.expect_idle("create a string")?;
        if let Some(&existing) = self.shared_strings.get(s.as_bytes()) {
            return Ok(Offset::new(existing));
        }
        let created = self.create_string(s)?;
        self.shared_strings
            .insert(s.as_bytes().into(), created.value());
        Ok(created)
    }

    // ------------------------------------------------------------------
    // Vectors
    // ------------------------------------------------------------------

    /// Begins a vector of `count` elements, each `elem_size` bytes wide and
    /// aligned to `alignment`. Elements are pushed last to first.
    pub fn start_vector(&mut self, elem_size: usize, count: usize, alignment: usize) -> Result<()> {
        self.expect_idle("start a vector")?;
        check_alignment(alignment)?;
        let body = elem_size.checked_mul(count).ok_or_else(|| {
            FlatError::out_of_range(count, elem_size, crate::config::MAX_BUFFER_SIZE)
        })?;
        self.prep(SIZE_UOFFSET, body)?;
        self.prep(alignment, body)?;
        self.state = BuildState::InVector {
            count,
            elem_size,
            start: self.offset(),
        };
        Ok(())
    }

    fn check_in_vector(&self, op: &'static str) -> Result<()> {
        match self.state {
            BuildState::InVector { .. } => Ok(()),
            other => Err(FlatError::invalid_state(op, other.describe())),
        }
    }

    pub fn push_element<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.check_in_vector("push a vector element")?;
        self.push(value)
    }

    pub fn push_element_offset<T>(&mut self, target: Offset<T>) -> Result<()> {
        self.check_in_vector("push a vector element")?;
        self.push_uoffset(target.value())
    }

    pub fn push_element_struct(&mut self, value: &StructWriter<'_>) -> Result<()> {
        self.check_in_vector("push a vector element")?;
        self.create_struct(value).map(|_| ())
    }

    /// Closes the vector started with [`Builder::start_vector`]. Fails if the
    /// bytes pushed do not add up to the announced element count.
    pub fn end_vector<T>(&mut self) -> Result<Offset<VectorTag<T>>> {
        let (count, elem_size, start) = match self.state {
            BuildState::InVector {
                count,
                elem_size,
                start,
            } => (count, elem_size, start),
            other => return Err(FlatError::invalid_state("end a vector", other.describe())),
        };
        let pushed = (self.offset() - start) as usize;
        if pushed != count * elem_size {
            return Err(FlatError::schema_mismatch(format!(
                "vector announced {} elements of {} bytes but {} bytes were pushed",
                count, elem_size, pushed
            )));
        }
        self.state = BuildState::Idle;
        self.push::<u32>(count as u32)?;
        Ok(Offset::new(self.offset()))
    }

    pub fn create_vector<T: Scalar>(&mut self, items: &[T]) -> Result<Offset<VectorTag<T>>> {
        self.start_vector(T::SIZE, items.len(), T::SIZE)?;
        let pos = self.bb.claim(items.len() * T::SIZE)?;
        for (i, &item) in items.iter().enumerate() {
            self.bb.put(pos + i * T::SIZE, item)?;
        }
        self.end_vector()
    }

    /// Stores a finished buffer as a byte vector whose contents can be read
    /// back with [`Table::get_nested_root`].
    pub fn create_nested_buffer(&mut self, finished: &[u8]) -> Result<Offset<VectorTag<u8>>> {
        self.start_vector(1, finished.len(), NESTED_BUFFER_ALIGNMENT)?;
        let pos = self.bb.claim(finished.len())?;
        self.bb.put_bytes(pos, finished)?;
        self.end_vector()
    }

    pub fn create_vector_of_offsets<T>(
        &mut self,
        items: &[Offset<T>],
    ) -> Result<Offset<VectorTag<Offset<T>>>> {
        self.start_vector(SIZE_UOFFSET, items.len(), SIZE_UOFFSET)?;
        for item in items.iter().rev() {
            self.push_uoffset(item.value())?;
        }
        self.end_vector()
    }

    pub fn create_vector_of_strings(
        &mut self,
        items: &[&str],
    ) -> Result<Offset<VectorTag<Offset<StringTag>>>> {
        let offsets = items
            .iter()
            .map(|s| self.create_string(s))
            .collect::<Result<SmallVec<[Offset<StringTag>; 16]>>>()?;
        self.create_vector_of_offsets(&offsets)
    }

    pub fn create_vector_of_structs(
        &mut self,
        layout: &StructLayout,
        items: &[StructWriter<'_>],
    ) -> Result<Offset<VectorTag<StructTag>>> {
        if let Some(other) = items.iter().find(|item| item.layout() != layout) {
            return Err(FlatError::schema_mismatch(format!(
                "vector element of {} bytes does not match struct layout of {} bytes",
                other.layout().size(),
                layout.size()
            )));
        }
        self.start_vector(layout.size(), items.len(), layout.align())?;
        for item in items.iter().rev() {
            self.push_element_struct(item)?;
        }
        self.end_vector()
    }

    /// Sorts `tables` by the string field `key_field` and writes them as a
    /// vector, so readers can binary search it with
    /// [`Vector::lookup_by_key`](crate::reader::Vector::lookup_by_key).
    pub fn create_vector_of_sorted_tables(
        &mut self,
        tables: &mut [Offset<TableTag>],
        key_field: usize,
    ) -> Result<Offset<VectorTag<Offset<TableTag>>>> {
        let mut keyed = Vec::with_capacity(tables.len());
        for &table in tables.iter() {
            let key = self.table_at(table)?.get_bytes(key_field)?.unwrap_or(&[]);
            keyed.push((key, table));
        }
        keyed.sort_by(|a, b| a.0.cmp(b.0));
        for (slot, (_, table)) in tables.iter_mut().zip(keyed) {
            *slot = table;
        }
        self.create_vector_of_offsets(tables)
    }

    // ------------------------------------------------------------------
    // Finishing
    // ------------------------------------------------------------------

    pub fn finish(
        &mut self,
        root: Offset<TableTag>,
        file_identifier: Option<&FileIdentifier>,
    ) -> Result<()> {
        self.finish_with(root, file_identifier, false)
    }

    /// Finishes with a leading `u32` holding the size of the rest of the
    /// buffer, for streams that carry several buffers back to back.
    pub fn finish_size_prefixed(
        &mut self,
        root: Offset<TableTag>,
        file_identifier: Option<&FileIdentifier>,
    ) -> Result<()> {
        self.finish_with(root, file_identifier, true)
    }

    fn finish_with(
        &mut self,
        root: Offset<TableTag>,
        file_identifier: Option<&FileIdentifier>,
        size_prefixed: bool,
    ) -> Result<()> {
        self.expect_idle("finish")?;

        let ident_len = if file_identifier.is_some() {
            FILE_IDENTIFIER_LENGTH
        } else {
            0
        };
        let prefix_len = if size_prefixed { SIZE_UOFFSET } else { 0 };
        let align = self.min_align.max(SIZE_UOFFSET);
        self.prep(align, SIZE_UOFFSET + ident_len + prefix_len)?;

        if let Some(ident) = file_identifier {
            let pos = self.bb.claim(FILE_IDENTIFIER_LENGTH)?;
            self.bb.put_bytes(pos, ident)?;
        }
        self.push_uoffset(root.value())?;
        if size_prefixed {
            let size = self.bb.len() as u32;
            self.push::<u32>(size)?;
        }

        self.state = BuildState::Finished;
        debug!(
            len = self.bb.len(),
            vtables = self.vtables.len(),
            vtable_hits = self.vtables.hits(),
            "buffer finished"
        );
        Ok(())
    }

    pub fn finished_data(&self) -> Result<&[u8]> {
        match self.state {
            BuildState::Finished => Ok(self.bb.written()),
            other => Err(FlatError::invalid_state("read finished data", other.describe())),
        }
    }

    pub fn into_finished_data(self) -> Result<Vec<u8>> {
        match self.state {
            BuildState::Finished => Ok(self.bb.into_written()),
            other => Err(FlatError::invalid_state("read finished data", other.describe())),
        }
    }
}
