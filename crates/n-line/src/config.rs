//! Engine configuration — growth policy and viewport extents.
//!
//! Plain typed values with defaults and builder-style setters. There is no
//! configuration file: the host constructs an [`EngineConfig`] and hands it to
//! [`TextCursor::with_config`](crate::TextCursor::with_config).

// ---------------------------------------------------------------------------
// GrowPolicy
// ---------------------------------------------------------------------------

/// How a [`LineBuffer`](crate::LineBuffer) sizes its storage when it grows.
///
/// A growth request that does not fit reserves
/// `round_up(needed + max(block, capacity), align)` bytes. The `block` term
/// keeps short lines from reallocating on every keystroke; the `capacity`
/// term doubles long lines so the number of reallocations stays logarithmic
/// in the line length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowPolicy {
    block: usize,
    align: usize,
    max_line_len: Option<usize>,
}

impl Default for GrowPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowPolicy {
    /// Extra bytes reserved beyond the request on every growth.
    pub const DEFAULT_BLOCK: usize = 128;

    /// Capacities are rounded up to a multiple of this.
    pub const DEFAULT_ALIGN: usize = 8;

    /// Default policy: grow by 128, align to 8, no line limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            block: Self::DEFAULT_BLOCK,
            align: Self::DEFAULT_ALIGN,
            max_line_len: None,
        }
    }

    /// Set the growth block (minimum 1).
    #[must_use]
    pub fn with_block(mut self, block: usize) -> Self {
        self.block = block.max(1);
        self
    }

    /// Set the capacity alignment (minimum 1).
    #[must_use]
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align.max(1);
        self
    }

    /// Cap every line at `limit` bytes. Growth past it is rejected.
    #[must_use]
    pub const fn with_max_line_len(mut self, limit: Option<usize>) -> Self {
        self.max_line_len = limit;
        self
    }

    #[inline]
    #[must_use]
    pub const fn block(&self) -> usize {
        self.block
    }

    #[inline]
    #[must_use]
    pub const fn align(&self) -> usize {
        self.align
    }

    #[inline]
    #[must_use]
    pub const fn max_line_len(&self) -> Option<usize> {
        self.max_line_len
    }

    /// Capacity to allocate so that `needed` bytes fit, given the current
    /// capacity. Returns `None` on arithmetic overflow.
    #[must_use]
    pub fn target_capacity(&self, needed: usize, capacity: usize) -> Option<usize> {
        let padded = needed.checked_add(self.block.max(capacity))?;
        padded.checked_next_multiple_of(self.align)
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Everything a [`TextCursor`](crate::TextCursor) needs at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    width: usize,
    height: usize,
    grow: GrowPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(80, 1)
    }
}

impl EngineConfig {
    /// A viewport of `width × height` cells with the default growth policy.
    /// Both extents are clamped to at least 1.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            grow: GrowPolicy::new(),
        }
    }

    #[must_use]
    pub const fn with_grow_policy(mut self, grow: GrowPolicy) -> Self {
        self.grow = grow;
        self
    }

    /// Visible columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Visible rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn grow_policy(&self) -> GrowPolicy {
        self.grow
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
