//! # Error Kinds
//!
//! Every fallible function in this crate returns `eyre::Result`. The three
//! contract violations the format can detect are carried as a [`FlatError`]
//! inside the report so callers can tell them apart:
//!
//! ```ignore
//! match builder.start_object(3) {
//!     Err(e) if FlatError::is_invalid_state(&e) => { /* wrong lifecycle */ }
//!     other => other?,
//! }
//! ```
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `OutOfRange` | a position plus a width runs past the buffer, or growth exceeds the size limit |
//! | `InvalidState` | an operation is called in the wrong lifecycle state (write after finish, end without start) |
//! | `SchemaMismatch` | a field id or vtable does not match what the caller expected |
//!
//! Reading an absent field is never an error: the caller's default is
//! returned instead.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatError {
    OutOfRange {
        pos: usize,
        size: usize,
        len: usize,
    },
    InvalidState {
        op: &'static str,
        state: &'static str,
    },
    SchemaMismatch {
        detail: String,
    },
}

impl FlatError {
    pub fn out_of_range(pos: usize, size: usize, len: usize) -> eyre::Report {
        FlatError::OutOfRange { pos, size, len }.into()
    }

    pub fn invalid_state(op: &'static str, state: &'static str) -> eyre::Report {
        FlatError::InvalidState { op, state }.into()
    }

    pub fn schema_mismatch(detail: impl Into<String>) -> eyre::Report {
        FlatError::SchemaMismatch {
            detail: detail.into(),
        }
        .into()
    }

    pub fn kind_of(report: &eyre::Report) -> Option<&FlatError> {
        report.downcast_ref::<FlatError>()
    }

    pub fn is_out_of_range(report: &eyre::Report) -> bool {
        matches!(Self::kind_of(report), Some(FlatError::OutOfRange { .. }))
    }

    pub fn is_invalid_state(report: &eyre::Report) -> bool {
        matches!(Self::kind_of(report), Some(FlatError::InvalidState { .. }))
    }

    pub fn is_schema_mismatch(report: &eyre::Report) -> bool {
        matches!(Self::kind_of(report), Some(FlatError::SchemaMismatch { .. }))
    }
}

impl std::fmt::Display for FlatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlatError::OutOfRange { pos, size, len } => write!(
                f,
                "out of range: {} bytes at position {} exceed buffer length {}",
                size, pos, len
            ),
            FlatError::InvalidState { op, state } => {
                write!(f, "invalid state: cannot {} while {}", op, state)
            }
            FlatError::SchemaMismatch { detail } => write!(f, "schema mismatch: {}", detail),
        }
    }
}

impl std::error::Error for FlatError {}
