//! # Layout Constants
//!
//! Every size in this module is part of the binary format. A buffer written
//! with one set of values can only be read with the same set.
//!
//! ## Dependency Graph
//!
//! ```text
//! SIZE_UOFFSET (4 bytes)
//!       │
//!       ├─> root offset, string/vector length prefixes, child references
//!       │
//!       ├─> FILE_IDENTIFIER_LENGTH (must equal, identifier sits in one uoffset slot)
//!       │
//!       └─> SIZE_PREFIX_LENGTH (must equal)
//!
//! SIZE_SOFFSET (4 bytes)
//!       │
//!       └─> table header (signed distance to the vtable)
//!
//! SIZE_VOFFSET (2 bytes)
//!       │
//!       ├─> VTABLE_METADATA_SIZE = VTABLE_METADATA_FIELDS * SIZE_VOFFSET
//!       │
//!       └─> MAX_FIELD_COUNT (vtable size must fit in a voffset)
//!
//! DEFAULT_BUFFER_CAPACITY (1KB)
//!       │
//!       └─> doubled on growth until MAX_BUFFER_SIZE
//! ```
//!
//! ## Critical Invariants
//!
//! 1. `FILE_IDENTIFIER_LENGTH == SIZE_UOFFSET`
//! 2. `VTABLE_METADATA_SIZE + MAX_FIELD_COUNT * SIZE_VOFFSET <= u16::MAX`
//! 3. `MAX_BUFFER_SIZE` fits in a signed 32-bit offset
//! 4. `DEFAULT_BUFFER_CAPACITY` is a power of two

// ============================================================================
// OFFSET WIDTHS
// ============================================================================

/// Width of an unsigned forward offset (root, child references, lengths).
pub const SIZE_UOFFSET: usize = 4;

/// Width of the signed table-to-vtable offset at the start of every table.
pub const SIZE_SOFFSET: usize = 4;

/// Width of a vtable entry.
pub const SIZE_VOFFSET: usize = 2;

/// Width of the length prefix on strings and vectors.
pub const SIZE_LENGTH_PREFIX: usize = SIZE_UOFFSET;

/// Width of the optional size prefix placed in front of a finished buffer.
pub const SIZE_PREFIX_LENGTH: usize = SIZE_UOFFSET;

/// Length of the optional file identifier that follows the root offset.
pub const FILE_IDENTIFIER_LENGTH: usize = 4;

const _: () = assert!(
    FILE_IDENTIFIER_LENGTH == SIZE_UOFFSET,
    "file identifier must occupy exactly one uoffset slot"
);

const _: () = assert!(
    SIZE_PREFIX_LENGTH == SIZE_UOFFSET,
    "size prefix is a uoffset"
);

// ============================================================================
// VTABLE LAYOUT
// ============================================================================

/// Number of leading vtable entries that are not fields: vtable size and
/// object size.
pub const VTABLE_METADATA_FIELDS: usize = 2;

/// Byte size of the vtable header.
pub const VTABLE_METADATA_SIZE: usize = VTABLE_METADATA_FIELDS * SIZE_VOFFSET;

/// Largest number of fields a single table may declare.
pub const MAX_FIELD_COUNT: usize = (u16::MAX as usize - VTABLE_METADATA_SIZE) / SIZE_VOFFSET;

const _: () = assert!(
    VTABLE_METADATA_SIZE + MAX_FIELD_COUNT * SIZE_VOFFSET <= u16::MAX as usize,
    "vtable size must fit in a voffset"
);

// ============================================================================
// BUFFER SIZING
// ============================================================================

/// Initial capacity of a builder created without options.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Largest buffer the builder will produce. Offsets are 32-bit and the table
/// header is signed, so anything past `i32::MAX` is unaddressable.
pub const MAX_BUFFER_SIZE: usize = i32::MAX as usize;

/// Largest alignment any scalar or struct may request.
pub const MAX_ALIGNMENT: usize = 16;

/// Alignment of the bytes of a buffer nested inside a byte vector, so that
/// the widest scalars of the inner buffer stay aligned.
pub const NESTED_BUFFER_ALIGNMENT: usize = 8;

const _: () = assert!(
    DEFAULT_BUFFER_CAPACITY.is_power_of_two(),
    "DEFAULT_BUFFER_CAPACITY must be a power of two so doubling stays aligned"
);

const _: () = assert!(
    DEFAULT_BUFFER_CAPACITY <= MAX_BUFFER_SIZE,
    "default capacity exceeds the maximum buffer size"
);

const _: () = assert!(
    NESTED_BUFFER_ALIGNMENT.is_power_of_two() && NESTED_BUFFER_ALIGNMENT <= MAX_ALIGNMENT,
    "nested buffers must use an alignment the builder supports"
);

const _: () = assert!(
    MAX_ALIGNMENT.is_power_of_two() && MAX_ALIGNMENT <= DEFAULT_BUFFER_CAPACITY,
    "MAX_ALIGNMENT must be a power of two no larger than the default capacity"
);
