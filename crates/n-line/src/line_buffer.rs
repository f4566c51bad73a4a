//! Line buffer — one line's growable byte storage.
//!
//! A `LineBuffer` knows nothing about documents or cursors. It holds raw
//! bytes (one byte is one cell) and supports offset-addressed insert,
//! overwrite, and delete. Storage grows through a [`GrowPolicy`], so a run of
//! single-byte inserts reallocates a logarithmic number of times.
//!
//! Every mutating method either applies completely or returns an
//! [`EditError`] and leaves the buffer untouched.

use tracing::trace;

use crate::config::GrowPolicy;
use crate::error::{EditError, Result};

/// A single line of raw bytes with amortized growth.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    /// Valid bytes. `data.len()` is the line length.
    data: Vec<u8>,

    /// Storage reserved under the growth policy. Always `>= data.len()`.
    capacity: usize,

    /// Number of times storage was reallocated.
    reallocations: usize,

    policy: GrowPolicy,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(GrowPolicy::new())
    }
}

impl PartialEq for LineBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for LineBuffer {}

impl LineBuffer {
    /// Create an empty line. Nothing is allocated until the first growth.
    #[must_use]
    pub const fn new(policy: GrowPolicy) -> Self {
        Self {
            data: Vec::new(),
            capacity: 0,
            reallocations: 0,
            policy,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Number of valid bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reserved storage size.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times storage has been reallocated over this buffer's life.
    #[inline]
    #[must_use]
    pub const fn reallocations(&self) -> usize {
        self.reallocations
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Byte at `offset`, if in bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    // -- Growth -------------------------------------------------------------

    /// Ensure room for `by` more bytes past the current length.
    ///
    /// # Errors
    ///
    /// [`EditError::LineTooLong`] if the line limit would be exceeded,
    /// [`EditError::Alloc`] if the allocator refuses. Length and content are
    /// unchanged either way.
    pub fn grow(&mut self, by: usize) -> Result<()> {
        self.reserve_total(self.data.len(), by)
    }

    /// Make room for `base + by` bytes, where `base` is the length the line
    /// will have before the new bytes land.
    fn reserve_total(&mut self, base: usize, by: usize) -> Result<()> {
        let needed = base
            .checked_add(by)
            .ok_or(EditError::Alloc { requested: usize::MAX })?;

        if let Some(limit) = self.policy.max_line_len() {
            if needed > limit {
                return Err(EditError::LineTooLong {
                    requested: needed,
                    limit,
                });
            }
        }

        if needed <= self.capacity {
            return Ok(());
        }

        let mut target = self
            .policy
            .target_capacity(needed, self.capacity)
            .ok_or(EditError::Alloc { requested: needed })?;
        if let Some(limit) = self.policy.max_line_len() {
            target = target.min(limit).max(needed);
        }

        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| EditError::Alloc { requested: target })?;

        trace!(from = self.capacity, to = target, "line buffer reallocated");
        self.capacity = target;
        self.reallocations += 1;
        Ok(())
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `byte` at `offset`, shifting the tail right.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] if `offset > len`, or a growth error.
    pub fn insert_at(&mut self, offset: usize, byte: u8) -> Result<()> {
        self.check_offset(offset)?;
        self.grow(1)?;
        self.data.insert(offset, byte);
        Ok(())
    }

    /// Replace the byte at `offset`. At `offset == len` this appends.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] if `offset > len`, or a growth error.
    pub fn overwrite_at(&mut self, offset: usize, byte: u8) -> Result<()> {
        self.check_offset(offset)?;
        if offset == self.data.len() {
            self.grow(1)?;
            self.data.push(byte);
        } else {
            self.data[offset] = byte;
        }
        Ok(())
    }

    /// Remove the byte at `offset`, shifting the tail left.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] if `offset >= len`.
    pub fn delete_at(&mut self, offset: usize) -> Result<u8> {
        if offset >= self.data.len() {
            return Err(EditError::OutOfRange {
                index: offset,
                len: self.data.len(),
            });
        }
        Ok(self.data.remove(offset))
    }

    /// Replace the whole content with `bytes`.
    ///
    /// # Errors
    ///
    /// A growth error; the old content is kept in that case.
    pub fn replace_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve_total(0, bytes.len())?;
        self.data.clear();
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append `bytes` to the end of the line.
    ///
    /// # Errors
    ///
    /// A growth error; nothing is appended in that case.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.grow(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Drop everything from `at` onward. No-op if `at >= len`.
    /// Capacity is kept.
    pub fn truncate(&mut self, at: usize) {
        self.data.truncate(at);
    }

    /// Reset the length to zero, keeping storage for reuse.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(EditError::OutOfRange {
                index: offset,
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
