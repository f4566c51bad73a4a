//! # n-line — Line-buffer engine for n-field
//!
//! The in-memory editing core behind a character-cell text-input control.
//! It owns the document's lines, tracks a single edit cursor in both logical
//! (column/row) and viewport (caret, scroll offset) coordinates, and reports
//! after every operation how much of the visible surface needs repainting.
//!
//! - **[`line_buffer`]** — `LineBuffer`, one line's growable byte storage
//! - **[`line_list`]** — `LineList`, an arena of lines with a recycling pool
//! - **[`axis`]** — the room-then-scroll rule for one viewport axis
//! - **[`cursor`]** — `TextCursor`, navigation, editing, and resize
//! - **[`damage`]** — the `Damage` flags every operation returns
//! - **[`config`]** — growth policy and viewport extents
//! - **[`error`]** — `EditError`, the reason a primitive was rejected
//!
//! Columns are raw bytes: one byte is one cell. Rendering, key mapping, and
//! selection live in the caller.
//!
//! ```
//! use n_line::{Damage, TextCursor};
//!
//! let mut cur = TextCursor::new(5, 3);
//! cur.set_value(b"Hello\nHi").unwrap();
//!
//! let mut damage = Damage::NONE;
//! for _ in 0..5 {
//!     damage = cur.right();
//! }
//! assert!(damage.contains(Damage::SCROLL));
//! assert_eq!((cur.slot_x(), cur.caret_x(), cur.offset_x()), (5, 4, 1));
//! assert_eq!(cur.get_value(), b"Hello\nHi");
//! ```

pub mod axis;
pub mod config;
pub mod cursor;
pub mod damage;
pub mod error;
pub mod line_buffer;
pub mod line_list;

pub use config::{EngineConfig, GrowPolicy};
pub use cursor::{TextCursor, VisibleRow};
pub use damage::Damage;
pub use error::{EditError, Result};
pub use line_buffer::LineBuffer;
pub use line_list::{LineId, LineList};
