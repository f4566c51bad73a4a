//! Text cursor — the stateful editing engine.
//!
//! A `TextCursor` owns the document ([`LineList`]) and a handle to the
//! *active* line, the one holding the edit position. It tracks the position
//! two ways:
//!
//! - **Logical**: `slot_x` is the byte offset into the active line, and the
//!   active line's index is the row. `sticky_x` remembers the last column
//!   the user chose horizontally so vertical moves can return to it.
//! - **Viewport**: a column [`Axis`] and a row [`Axis`], each a caret inside
//!   the visible extent plus a scroll offset. Movement fills free room before
//!   scrolling, so `offset_x + caret_x == slot_x` and
//!   `offset_y + caret_y == row` always hold.
//!
//! Every operation returns [`Damage`] describing the smallest repaint that
//! covers what changed. A rejected edit (storage exhausted, bad offset) does
//! nothing and returns [`Damage::NONE`].
//!
//! # Sticky column
//!
//! ```text
//!   abcdef        right ×4 → col 4, sticky 4
//!   ab            down     → col 2 (line is short), sticky still 4
//!   abcdef        up       → col 4 again
//! ```
//!
//! Horizontal movement and edits reset the sticky column to the current
//! column; vertical movement never changes it.

use std::ops::Range;

use tracing::debug;

use crate::axis::Axis;
use crate::config::{EngineConfig, GrowPolicy};
use crate::damage::Damage;
use crate::error::{EditError, Result};
use crate::line_buffer::LineBuffer;
use crate::line_list::{LineId, LineList};

/// Stand-in returned when the active handle does not resolve. Never observed
/// while the cursor's invariants hold.
static EMPTY_LINE: LineBuffer = LineBuffer::new(GrowPolicy::new());

// ---------------------------------------------------------------------------
// VisibleRow
// ---------------------------------------------------------------------------

/// One screen row's slice of the document.
///
/// `bytes` is the part of line `line` that falls inside the horizontal
/// window `[offset_x, offset_x + len_x)`, clamped to the line's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    /// Row on screen, `0..len_y`.
    pub screen_y: usize,
    /// Document line index.
    pub line: usize,
    /// Byte offset of `bytes[0]` within the line.
    pub start: usize,
    /// The visible bytes.
    pub bytes: &'a [u8],
}

impl VisibleRow<'_> {
    /// Byte range of the visible slice within its line.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.start + self.bytes.len()
    }
}

// ---------------------------------------------------------------------------
// TextCursor
// ---------------------------------------------------------------------------

/// Cursor state saved across a composite edit so a rejected step can roll
/// the whole edit back.
#[derive(Debug, Clone, Copy)]
struct Position {
    active: LineId,
    slot_x: usize,
    sticky_x: usize,
    x: Axis,
    y: Axis,
}

/// The document plus a single edit cursor and its viewport.
#[derive(Debug, Clone)]
pub struct TextCursor {
    lines: LineList,

    /// The line holding the edit position. Always live in `lines`.
    active: LineId,

    /// Byte offset into the active line, `0..=len`.
    slot_x: usize,

    /// Column to return to on vertical movement.
    sticky_x: usize,

    /// Columns: caret, horizontal scroll, visible width.
    x: Axis,

    /// Rows: caret, vertical scroll, visible height.
    y: Axis,
}

impl TextCursor {
    /// An empty document viewed through `width × height` cells.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(EngineConfig::new(width, height))
    }

    /// An empty document with explicit configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let mut lines = LineList::new(config.grow_policy());
        let active = lines.reset();
        Self {
            lines,
            active,
            slot_x: 0,
            sticky_x: 0,
            x: Axis::new(config.width()),
            y: Axis::new(config.height()),
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Byte offset of the cursor in the active line.
    #[inline]
    #[must_use]
    pub const fn slot_x(&self) -> usize {
        self.slot_x
    }

    /// Remembered column for vertical movement.
    #[inline]
    #[must_use]
    pub const fn sticky_x(&self) -> usize {
        self.sticky_x
    }

    /// Caret column inside the viewport.
    #[inline]
    #[must_use]
    pub const fn caret_x(&self) -> usize {
        self.x.caret()
    }

    /// Caret row inside the viewport.
    #[inline]
    #[must_use]
    pub const fn caret_y(&self) -> usize {
        self.y.caret()
    }

    /// Bytes hidden to the left of the viewport.
    #[inline]
    #[must_use]
    pub const fn offset_x(&self) -> usize {
        self.x.offset()
    }

    /// Lines hidden above the viewport.
    #[inline]
    #[must_use]
    pub const fn offset_y(&self) -> usize {
        self.y.offset()
    }

    /// Viewport width in cells.
    #[inline]
    #[must_use]
    pub const fn len_x(&self) -> usize {
        self.x.extent()
    }

    /// Viewport height in rows.
    #[inline]
    #[must_use]
    pub const fn len_y(&self) -> usize {
        self.y.extent()
    }

    /// Index of the active line.
    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.y.position()
    }

    #[inline]
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Content of the active line.
    #[must_use]
    pub fn active_line(&self) -> &[u8] {
        self.line().as_bytes()
    }

    /// The whole document.
    #[inline]
    #[must_use]
    pub const fn lines(&self) -> &LineList {
        &self.lines
    }

    /// The document as bytes, lines joined by `\n`.
    #[must_use]
    pub fn get_value(&self) -> Vec<u8> {
        self.lines.to_text()
    }

    /// The rows currently inside the viewport, top to bottom. Rows past the
    /// end of the document are not yielded.
    pub fn visible_rows(&self) -> impl Iterator<Item = VisibleRow<'_>> + '_ {
        let first = self.y.offset();
        let start = self.x.offset();
        let width = self.x.extent();
        std::iter::successors(self.lines.nth(first), move |&id| self.lines.next(id))
            .take(self.y.extent())
            .enumerate()
            .filter_map(move |(screen_y, id)| {
                let bytes = self.lines.get(id)?.as_bytes();
                let lo = start.min(bytes.len());
                let hi = start.saturating_add(width).min(bytes.len());
                Some(VisibleRow {
                    screen_y,
                    line: first + screen_y,
                    start: lo,
                    bytes: &bytes[lo..hi],
                })
            })
    }

    // -- Whole value --------------------------------------------------------

    /// Replace the document with `bytes`, one line per `\n`-separated
    /// segment. A NUL byte ends the input. The cursor returns to the origin.
    ///
    /// # Errors
    ///
    /// A growth error while loading a line. The document is then left as a
    /// single empty line with the cursor at the origin.
    pub fn set_value(&mut self, bytes: &[u8]) -> Result<Damage> {
        let text = match bytes.iter().position(|&b| b == 0) {
            Some(end) => {
                debug!(at = end, "value truncated at NUL");
                &bytes[..end]
            }
            None => bytes,
        };

        let first = self.lines.reset();
        if let Err(err) = self.load(first, text) {
            debug!(%err, "set_value rejected");
            let empty = self.lines.reset();
            self.home_to(empty);
            return Err(err);
        }

        self.home_to(first);
        debug!(lines = self.lines.len(), "value set");
        Ok(Damage::EXPOSE)
    }

    /// Fill the document from `text`, starting with the already-linked
    /// `first` line.
    fn load(&mut self, first: LineId, text: &[u8]) -> Result<()> {
        for (i, segment) in text.split(|&b| b == b'\n').enumerate() {
            let id = if i == 0 { first } else { self.lines.append()? };
            let len = self.lines.len();
            self.lines
                .get_mut(id)
                .ok_or(EditError::OutOfRange { index: i, len })?
                .replace_all(segment)?;
        }
        Ok(())
    }

    /// Put the cursor at column 0 of `id`, which must be the first line.
    fn home_to(&mut self, id: LineId) {
        self.active = id;
        self.slot_x = 0;
        self.sticky_x = 0;
        self.x = Axis::new(self.x.extent());
        self.y = Axis::new(self.y.extent());
    }

    // -- Navigation ---------------------------------------------------------

    /// Move to column 0.
    pub fn home(&mut self) -> Damage {
        self.sticky_x = 0;
        if self.slot_x == 0 {
            return Damage::NONE;
        }
        self.slot_x = 0;
        self.x.seek(0)
    }

    /// Move past the last byte of the line.
    pub fn end(&mut self) -> Damage {
        let len = self.line().len();
        let steps = len.saturating_sub(self.slot_x);
        self.slot_x += steps;
        self.sticky_x = self.slot_x;
        self.x.advance(steps)
    }

    /// Move one byte left. Does not wrap to the previous line.
    pub fn left(&mut self) -> Damage {
        let mut damage = Damage::NONE;
        if self.slot_x > 0 {
            self.slot_x -= 1;
            damage = self.x.step_back();
        }
        self.sticky_x = self.slot_x;
        damage
    }

    /// Move one byte right. Does not wrap to the next line.
    pub fn right(&mut self) -> Damage {
        let mut damage = Damage::NONE;
        if self.slot_x < self.line().len() {
            self.slot_x += 1;
            damage = self.x.step_forward();
        }
        self.sticky_x = self.slot_x;
        damage
    }

    /// Move to the previous line, returning to the sticky column where the
    /// line is long enough.
    pub fn up(&mut self) -> Damage {
        let Some(prev) = self.lines.prev(self.active) else {
            return Damage::NONE;
        };
        self.active = prev;
        self.y.step_back() | self.restore_column()
    }

    /// Move to the next line, returning to the sticky column where the line
    /// is long enough.
    pub fn down(&mut self) -> Damage {
        let Some(next) = self.lines.next(self.active) else {
            return Damage::NONE;
        };
        self.active = next;
        self.y.step_forward() | self.restore_column()
    }

    /// Re-derive the column on a freshly activated line from `sticky_x`.
    fn restore_column(&mut self) -> Damage {
        self.slot_x = self.sticky_x.min(self.line().len());
        self.x.seek(self.slot_x)
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `byte` at the cursor and step past it.
    pub fn insert(&mut self, byte: u8) -> Damage {
        let slot = self.slot_x;
        match self.edit_line(|line| line.insert_at(slot, byte)) {
            Ok(()) => Damage::LINE | self.right(),
            Err(err) => {
                debug!(%err, slot, "insert rejected");
                Damage::NONE
            }
        }
    }

    /// Replace the byte under the cursor (append at end of line) and step
    /// past it.
    pub fn overwrite(&mut self, byte: u8) -> Damage {
        let slot = self.slot_x;
        match self.edit_line(|line| line.overwrite_at(slot, byte)) {
            Ok(()) => Damage::LINE | self.right(),
            Err(err) => {
                debug!(%err, slot, "overwrite rejected");
                Damage::NONE
            }
        }
    }

    /// [`insert`](Self::insert) each byte in turn.
    pub fn insert_bytes(&mut self, bytes: &[u8]) -> Damage {
        bytes
            .iter()
            .fold(Damage::NONE, |damage, &b| damage | self.insert(b))
    }

    /// [`overwrite`](Self::overwrite) each byte in turn.
    pub fn overwrite_bytes(&mut self, bytes: &[u8]) -> Damage {
        bytes
            .iter()
            .fold(Damage::NONE, |damage, &b| damage | self.overwrite(b))
    }

    /// Like [`insert_bytes`](Self::insert_bytes), but `\n` splits the line so
    /// multi-line text lands as separate lines.
    pub fn paste(&mut self, bytes: &[u8]) -> Damage {
        bytes.iter().fold(Damage::NONE, |damage, &b| {
            damage
                | if b == b'\n' {
                    self.split_line()
                } else {
                    self.insert(b)
                }
        })
    }

    /// Delete the byte under the cursor. At end of line, join the next line
    /// onto this one.
    pub fn delete(&mut self) -> Damage {
        let slot = self.slot_x;
        self.sticky_x = slot;
        if slot < self.line().len() {
            return match self.edit_line(|line| line.delete_at(slot).map(drop)) {
                Ok(()) => Damage::LINE,
                Err(err) => {
                    debug!(%err, slot, "delete rejected");
                    Damage::NONE
                }
            };
        }
        self.join_next()
    }

    /// Delete the byte before the cursor. At column 0, join this line onto
    /// the previous one.
    pub fn backspace(&mut self) -> Damage {
        if self.slot_x > 0 {
            return self.left() | self.delete();
        }
        if self.lines.prev(self.active).is_none() {
            return Damage::NONE;
        }
        let saved = self.snapshot();
        let damage = self.up() | self.end();
        let joined = self.delete();
        if joined.is_empty() {
            self.restore(saved);
            return Damage::NONE;
        }
        damage | joined
    }

    /// Split the active line at the cursor. The tail moves to a new line
    /// below and the cursor goes to its start.
    pub fn split_line(&mut self) -> Damage {
        match self.try_split() {
            Ok(()) => {
                self.sticky_x = 0;
                Damage::LINE | Damage::EXPOSE | self.down()
            }
            Err(err) => {
                debug!(%err, slot = self.slot_x, "split rejected");
                Damage::NONE
            }
        }
    }

    fn try_split(&mut self) -> Result<()> {
        let slot = self.slot_x;
        let tail = self.line().as_bytes().get(slot..).unwrap_or(&[]).to_vec();
        let len = self.lines.len();
        let row = self
            .lines
            .slot_of(self.active)
            .ok_or(EditError::OutOfRange { index: self.row(), len })?;

        let below = self.lines.insert_at(row + 1)?;
        let filled = self
            .lines
            .get_mut(below)
            .ok_or(EditError::OutOfRange { index: row + 1, len })
            .and_then(|line| line.replace_all(&tail));
        if let Err(err) = filled {
            self.lines.remove_at(row + 1)?;
            return Err(err);
        }

        self.edit_line(|line| {
            line.truncate(slot);
            Ok(())
        })
    }

    /// Merge the next line onto the end of the active one and pool it.
    fn join_next(&mut self) -> Damage {
        let Some(next) = self.lines.next(self.active) else {
            return Damage::NONE;
        };
        match self.try_join(next) {
            Ok(()) => Damage::EXPOSE,
            Err(err) => {
                debug!(%err, "join rejected");
                Damage::NONE
            }
        }
    }

    fn try_join(&mut self, next: LineId) -> Result<()> {
        let len = self.lines.len();
        let tail = self
            .lines
            .get(next)
            .map(|line| line.as_bytes().to_vec())
            .ok_or(EditError::OutOfRange { index: self.row() + 1, len })?;
        let index = self
            .lines
            .slot_of(next)
            .ok_or(EditError::OutOfRange { index: self.row() + 1, len })?;

        self.edit_line(|line| line.extend_from_slice(&tail))?;
        self.lines.remove_at(index).map(drop)
    }

    // -- Resize -------------------------------------------------------------

    /// Change the viewport extents (each clamped to at least 1) and
    /// re-derive carets and offsets for the current position.
    pub fn resize(&mut self, width: usize, height: usize) -> Damage {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.x.extent(), self.y.extent()) {
            return Damage::NONE;
        }
        debug!(width, height, "viewport resized");
        Damage::EXPOSE | self.x.resize(width) | self.y.resize(height)
    }

    // -- Internals ----------------------------------------------------------

    fn snapshot(&self) -> Position {
        Position {
            active: self.active,
            slot_x: self.slot_x,
            sticky_x: self.sticky_x,
            x: self.x,
            y: self.y,
        }
    }

    fn restore(&mut self, pos: Position) {
        self.active = pos.active;
        self.slot_x = pos.slot_x;
        self.sticky_x = pos.sticky_x;
        self.x = pos.x;
        self.y = pos.y;
    }

    fn line(&self) -> &LineBuffer {
        self.lines.get(self.active).unwrap_or(&EMPTY_LINE)
    }

    fn edit_line<T>(&mut self, f: impl FnOnce(&mut LineBuffer) -> Result<T>) -> Result<T> {
        let len = self.lines.len();
        let line = self.lines.get_mut(self.active).ok_or(EditError::OutOfRange {
            index: self.y.position(),
            len,
        })?;
        f(line)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
