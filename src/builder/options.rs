//! # Builder Options
//!
//! Runtime knobs for a [`Builder`]. Wire-format constants live in
//! [`crate::config`]; these only change how a buffer is produced, and every
//! combination yields a buffer any reader with the same byte order accepts.
//!
//! ```ignore
//! let builder = Builder::options()
//!     .initial_capacity(64 * 1024)
//!     .force_defaults(true)
//!     .build();
//! ```

use crate::buffer::Endian;
use crate::builder::Builder;
use crate::config::DEFAULT_BUFFER_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderOptions {
    pub initial_capacity: usize,
    /// Write scalars even when they equal the field default.
    pub force_defaults: bool,
    pub endian: Endian,
    /// Share identical vtables between tables.
    pub dedup_vtables: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_BUFFER_CAPACITY,
            force_defaults: false,
            endian: Endian::Little,
            dedup_vtables: true,
        }
    }
}

impl BuilderOptions {
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn force_defaults(mut self, force: bool) -> Self {
        self.force_defaults = force;
        self
    }

    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn dedup_vtables(mut self, dedup: bool) -> Self {
        self.dedup_vtables = dedup;
        self
    }

    pub fn build(self) -> Builder {
        Builder::from_options(self)
    }
}
