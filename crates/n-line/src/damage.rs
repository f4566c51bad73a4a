//! Damage flags — what a caller must repaint after an operation.
//!
//! Every navigation or edit on a [`TextCursor`](crate::TextCursor) returns a
//! `Damage` set. Callers fold the results of several operations together with
//! `|` and repaint once:
//!
//! | Flag     | Meaning                                                    |
//! |----------|------------------------------------------------------------|
//! | `EXPOSE` | Lines were split or joined; everything below is stale      |
//! | `SCROLL` | A scroll offset changed; re-render from the new origin     |
//! | `CURSOR` | Only the caret's screen position moved                     |
//! | `LINE`   | The active line's content changed in place                 |
//!
//! The empty set, [`Damage::NONE`], means nothing changed on screen (a no-op
//! or a rejected edit).

use std::fmt;

bitflags::bitflags! {
    /// Redraw classification returned by every cursor operation.
    ///
    /// ```
    /// use n_line::Damage;
    ///
    /// let d = Damage::LINE | Damage::CURSOR;
    /// assert!(d.contains(Damage::LINE));
    /// assert!(!d.needs_full_repaint());
    /// assert!(Damage::NONE.is_empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Damage: u8 {
        /// Structural change: lines merged or split.
        const EXPOSE = 1 << 0;
        /// `offset_x` or `offset_y` changed.
        const SCROLL = 1 << 1;
        /// Only the caret moved.
        const CURSOR = 1 << 2;
        /// The active line's bytes changed; viewport unchanged.
        const LINE   = 1 << 3;
    }
}

impl Damage {
    /// No redraw required.
    pub const NONE: Self = Self::empty();

    /// Whether the whole viewport must be repainted (structure or origin
    /// changed), as opposed to a single row or just the caret.
    #[inline]
    #[must_use]
    pub const fn needs_full_repaint(self) -> bool {
        self.intersects(Self::EXPOSE.union(Self::SCROLL))
    }
}

impl fmt::Display for Damage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(&name.to_ascii_lowercase())?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
