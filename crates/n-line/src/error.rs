//! Edit errors — why a primitive refused to mutate.
//!
//! Only two things can go wrong in the engine: storage could not grow, or an
//! offset/index pointed outside the line or list. Either way the mutation is
//! not applied. [`TextCursor`](crate::TextCursor) turns these into
//! [`Damage::NONE`](crate::Damage::NONE); the primitives surface them so
//! hosts and tests can tell the cases apart.

use thiserror::Error;

/// A rejected buffer or list mutation. No partial change is ever left behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The allocator could not provide the requested capacity.
    #[error("allocation of {requested} bytes failed")]
    Alloc {
        /// Total capacity that was requested.
        requested: usize,
    },

    /// Growth would push a line past the configured length limit.
    #[error("line would grow to {requested} bytes (limit {limit})")]
    LineTooLong {
        /// Length the line would have reached.
        requested: usize,
        /// Configured maximum line length.
        limit: usize,
    },

    /// Offset or index outside valid bounds.
    #[error("index {index} out of range (len {len})")]
    OutOfRange {
        /// The attempted offset or index.
        index: usize,
        /// The length it was checked against.
        len: usize,
    },
}

impl EditError {
    /// True for the storage-exhaustion cases (allocator or line limit).
    #[inline]
    #[must_use]
    pub const fn is_alloc(&self) -> bool {
        matches!(self, Self::Alloc { .. } | Self::LineTooLong { .. })
    }
}

/// Result alias for engine primitives.
pub type Result<T> = std::result::Result<T, EditError>;
