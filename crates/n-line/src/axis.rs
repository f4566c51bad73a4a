//! Viewport axis — the room-then-scroll rule.
//!
//! One axis of the viewport: a caret position inside the visible extent and
//! a scroll offset of hidden cells before it. Moving forward uses free room
//! first (`caret` grows until it reaches `extent - 1`), then scrolls
//! (`offset` grows). Moving back does the reverse. The logical position is
//! always `offset + caret`.
//!
//! [`TextCursor`](crate::TextCursor) keeps one axis for columns and one for
//! rows, so horizontal and vertical movement follow the same rule.

use crate::damage::Damage;

/// Caret, scroll offset, and visible extent along one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    caret: usize,
    offset: usize,
    extent: usize,
}

impl Axis {
    /// An axis at the origin with `extent` visible cells (minimum 1).
    #[must_use]
    pub fn new(extent: usize) -> Self {
        Self {
            caret: 0,
            offset: 0,
            extent: extent.max(1),
        }
    }

    /// Caret position within the visible extent.
    #[inline]
    #[must_use]
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Hidden cells before the first visible one.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of visible cells.
    #[inline]
    #[must_use]
    pub const fn extent(&self) -> usize {
        self.extent
    }

    /// Logical position: `offset + caret`.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.offset + self.caret
    }

    /// Last caret position before scrolling kicks in.
    #[inline]
    const fn last(&self) -> usize {
        self.extent - 1
    }

    /// One step forward: room first, then scroll.
    pub const fn step_forward(&mut self) -> Damage {
        if self.caret < self.last() {
            self.caret += 1;
            Damage::CURSOR
        } else {
            self.offset += 1;
            Damage::SCROLL
        }
    }

    /// One step back: caret first, then scroll. `NONE` at the origin.
    pub const fn step_back(&mut self) -> Damage {
        if self.caret > 0 {
            self.caret -= 1;
            Damage::CURSOR
        } else if self.offset > 0 {
            self.offset -= 1;
            Damage::SCROLL
        } else {
            Damage::NONE
        }
    }

    /// `steps` forward steps at once. Same result as calling
    /// [`step_forward`](Self::step_forward) `steps` times.
    pub fn advance(&mut self, steps: usize) -> Damage {
        if steps == 0 {
            return Damage::NONE;
        }
        let room = self.last() - self.caret;
        let used = room.min(steps);
        let scrolled = steps - used;
        self.caret += used;
        self.offset += scrolled;

        let mut damage = Damage::NONE;
        if used > 0 {
            damage |= Damage::CURSOR;
        }
        if scrolled > 0 {
            damage |= Damage::SCROLL;
        }
        damage
    }

    /// Re-derive caret and offset for `position` by replaying forward steps
    /// from the origin. Reports what changed relative to before.
    pub fn seek(&mut self, position: usize) -> Damage {
        let before = *self;
        self.caret = 0;
        self.offset = 0;
        self.advance(position);
        self.diff(before)
    }

    /// Change the extent and re-derive caret/offset for the same position.
    pub fn resize(&mut self, extent: usize) -> Damage {
        let position = self.position();
        self.extent = extent.max(1);
        self.seek(position)
    }

    fn diff(&self, before: Self) -> Damage {
        let mut damage = Damage::NONE;
        if self.caret != before.caret {
            damage |= Damage::CURSOR;
        }
        if self.offset != before.offset {
            damage |= Damage::SCROLL;
        }
        damage
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
