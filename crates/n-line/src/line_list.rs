//! Line list — the document as a linked sequence of lines.
//!
//! Lines live in an arena (`Vec<Node>`) and link to their neighbours by
//! [`LineId`] rather than by pointer. Removed lines are not destroyed: they
//! go onto a free stack and are handed out again by the next append or
//! insert, storage and all. This keeps frequent line split/join cheap and
//! means a stale `LineId` can never dangle into freed memory: liveness is a
//! flag check.
//!
//! ```text
//!   head                         tail
//!    │                            │
//!    ▼                            ▼
//!  [ 2 ] ⇄ [ 0 ] ⇄ [ 3 ] ⇄ ... ⇄ [ 5 ]        free: [ 1, 4 ]
//! ```
//!
//! Positional operations (`nth`, `insert_at`, `remove_at`, `slot_of`) walk
//! from the head, so they are O(index). Splicing itself is O(1).

use tracing::trace;

use crate::config::GrowPolicy;
use crate::error::{EditError, Result};
use crate::line_buffer::LineBuffer;

// ---------------------------------------------------------------------------
// LineId
// ---------------------------------------------------------------------------

/// Handle to a line slot in a [`LineList`].
///
/// Stable for as long as the line stays live. After removal the slot may be
/// recycled for a different line, so holders must re-resolve handles after
/// structural edits they did not perform themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

impl LineId {
    /// Arena slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    line: LineBuffer,
    prev: Option<LineId>,
    next: Option<LineId>,
    live: bool,
}

// ---------------------------------------------------------------------------
// LineList
// ---------------------------------------------------------------------------

/// The document's lines plus a pool of recycled ones.
///
/// The list owns every node, live or pooled. `len()` counts live lines only.
#[derive(Debug, Clone)]
pub struct LineList {
    nodes: Vec<Node>,
    head: Option<LineId>,
    tail: Option<LineId>,
    free: Vec<LineId>,
    len: usize,
    policy: GrowPolicy,
}

impl Default for LineList {
    fn default() -> Self {
        Self::new(GrowPolicy::new())
    }
}

impl LineList {
    /// An empty list whose lines grow under `policy`.
    #[must_use]
    pub const fn new(policy: GrowPolicy) -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
            free: Vec::new(),
            len: 0,
            policy,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Number of live lines.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines waiting in the recycling pool.
    #[inline]
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    #[inline]
    #[must_use]
    pub const fn head(&self) -> Option<LineId> {
        self.head
    }

    #[inline]
    #[must_use]
    pub const fn tail(&self) -> Option<LineId> {
        self.tail
    }

    /// Whether `id` refers to a line currently in the document.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: LineId) -> bool {
        self.nodes.get(id.0).is_some_and(|n| n.live)
    }

    /// The line behind `id`, if live.
    #[must_use]
    pub fn get(&self, id: LineId) -> Option<&LineBuffer> {
        self.node(id).map(|n| &n.line)
    }

    /// Mutable access to the line behind `id`, if live.
    #[must_use]
    pub fn get_mut(&mut self, id: LineId) -> Option<&mut LineBuffer> {
        self.nodes
            .get_mut(id.0)
            .filter(|n| n.live)
            .map(|n| &mut n.line)
    }

    /// The line after `id`.
    #[must_use]
    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.node(id).and_then(|n| n.next)
    }

    /// The line before `id`.
    #[must_use]
    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.node(id).and_then(|n| n.prev)
    }

    /// The line at position `index`, walking from the head.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<LineId> {
        if index >= self.len {
            return None;
        }
        let mut cur = self.head;
        for _ in 0..index {
            cur = cur.and_then(|id| self.next(id));
        }
        cur
    }

    /// Position of `id` in the document, walking from the head.
    #[must_use]
    pub fn slot_of(&self, id: LineId) -> Option<usize> {
        self.ids().position(|other| other == id)
    }

    /// Live line handles in document order.
    pub fn ids(&self) -> impl Iterator<Item = LineId> + '_ {
        std::iter::successors(self.head, move |&id| self.next(id))
    }

    /// Live lines in document order.
    pub fn iter(&self) -> impl Iterator<Item = &LineBuffer> + '_ {
        self.ids().filter_map(move |id| self.get(id))
    }

    // -- Structure ----------------------------------------------------------

    /// Add an empty line at the end and return it.
    ///
    /// # Errors
    ///
    /// [`EditError::Alloc`] if a fresh node could not be allocated.
    pub fn append(&mut self) -> Result<LineId> {
        let id = self.acquire()?;
        let old_tail = self.tail;
        self.link(id, old_tail, None);
        Ok(id)
    }

    /// Insert an empty line so that it ends up at position `index`.
    ///
    /// If `index` is past the end the document is first extended with blank
    /// lines, so the new line lands exactly at `index`.
    ///
    /// # Errors
    ///
    /// [`EditError::Alloc`] if the nodes could not be allocated. Storage for
    /// the padding and the new line is reserved up front, so a failure
    /// leaves the document untouched.
    pub fn insert_at(&mut self, index: usize) -> Result<LineId> {
        let wanted = index.saturating_sub(self.len).saturating_add(1);
        let fresh = wanted.saturating_sub(self.free.len());
        self.nodes
            .try_reserve(fresh)
            .map_err(|_| EditError::Alloc {
                requested: self.nodes.len().saturating_add(fresh),
            })?;
        while self.len < index {
            self.append()?;
        }
        let Some(before) = self.nth(index) else {
            return self.append();
        };
        let id = self.acquire()?;
        let prev = self.prev(before);
        self.link(id, prev, Some(before));
        Ok(id)
    }

    /// Unlink the line at `index` and return it to the pool.
    ///
    /// The pooled line's length is reset to zero; its storage is kept.
    ///
    /// # Errors
    ///
    /// [`EditError::OutOfRange`] if there is no line at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<LineId> {
        let id = self.nth(index).ok_or(EditError::OutOfRange {
            index,
            len: self.len,
        })?;
        self.unlink(id);
        Ok(id)
    }

    /// Move every live line to the pool. Storage is kept for reuse.
    pub fn clear(&mut self) {
        let ids: Vec<LineId> = self.ids().collect();
        for id in ids.into_iter().rev() {
            self.unlink(id);
        }
    }

    /// Clear the document down to exactly one empty line and return it.
    ///
    /// Reuses a pooled node when there is one, so after the first line has
    /// ever existed this never allocates.
    pub fn reset(&mut self) -> LineId {
        self.clear();
        let id = self.revive_pooled().unwrap_or_else(|| self.push_node());
        self.link(id, None, None);
        id
    }

    /// The document as one byte string: lines joined by `\n`, no trailing
    /// newline.
    #[must_use]
    pub fn to_text(&self) -> Vec<u8> {
        let total = self.iter().map(LineBuffer::len).sum::<usize>() + self.len.saturating_sub(1);
        let mut out = Vec::with_capacity(total);
        for (i, line) in self.iter().enumerate() {
            if i > 0 {
                out.push(b'\n');
            }
            out.extend_from_slice(line.as_bytes());
        }
        out
    }

    // -- Internals ----------------------------------------------------------

    fn node(&self, id: LineId) -> Option<&Node> {
        self.nodes.get(id.0).filter(|n| n.live)
    }

    /// Take a node from the pool, or allocate one. The node is marked live
    /// but not yet linked.
    fn acquire(&mut self) -> Result<LineId> {
        if let Some(id) = self.revive_pooled() {
            return Ok(id);
        }
        self.nodes
            .try_reserve(1)
            .map_err(|_| EditError::Alloc {
                requested: self.nodes.len() + 1,
            })?;
        Ok(self.push_node())
    }

    fn revive_pooled(&mut self) -> Option<LineId> {
        let id = self.free.pop()?;
        let node = &mut self.nodes[id.0];
        node.line.clear();
        node.live = true;
        trace!(slot = id.0, "line node recycled");
        Some(id)
    }

    fn push_node(&mut self) -> LineId {
        let id = LineId(self.nodes.len());
        self.nodes.push(Node {
            line: LineBuffer::new(self.policy),
            prev: None,
            next: None,
            live: true,
        });
        id
    }

    /// Splice `id` between `prev` and `next`, fixing head/tail.
    fn link(&mut self, id: LineId, prev: Option<LineId>, next: Option<LineId>) {
        {
            let node = &mut self.nodes[id.0];
            node.prev = prev;
            node.next = next;
        }
        match prev {
            Some(p) => self.nodes[p.0].next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(n) => self.nodes[n.0].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.len += 1;
    }

    /// Detach a live node and push it onto the pool.
    fn unlink(&mut self, id: LineId) {
        let (prev, next) = {
            let node = &mut self.nodes[id.0];
            let links = (node.prev.take(), node.next.take());
            node.live = false;
            node.line.clear();
            links
        };
        match prev {
            Some(p) => self.nodes[p.0].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n.0].prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
        self.free.push(id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list_of(lines: &[&[u8]]) -> LineList {
        let mut list = LineList::default();
        for text in lines {
            let id = list.append().unwrap();
            list.get_mut(id).unwrap().replace_all(text).unwrap();
        }
        list
    }

    fn contents(list: &LineList) -> Vec<Vec<u8>> {
        list.iter().map(|l| l.as_bytes().to_vec()).collect()
    }

    /// Walk forward and backward and check both agree with `len`.
    fn assert_links(list: &LineList) {
        let forward: Vec<LineId> = list.ids().collect();
        let mut backward = Vec::new();
        let mut cur = list.tail();
        while let Some(id) = cur {
            backward.push(id);
            cur = list.prev(id);
        }
        backward.reverse();
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), list.len());
        assert_eq!(list.head(), forward.first().copied());
        assert_eq!(list.tail(), forward.last().copied());
    }

    // ── append ────────────────────────────────────────────────────────────

    #[test]
    fn new_list_is_empty() {
        let list = LineList::default();
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
        assert_eq!(list.to_text(), b"");
    }

    #[test]
    fn append_sets_head_and_tail() {
        let mut list = LineList::default();
        let a = list.append().unwrap();
        assert_eq!(list.head(), Some(a));
        assert_eq!(list.tail(), Some(a));
        let b = list.append().unwrap();
        assert_eq!(list.head(), Some(a));
        assert_eq!(list.tail(), Some(b));
        assert_eq!(list.next(a), Some(b));
        assert_eq!(list.prev(b), Some(a));
        assert_links(&list);
    }

    #[test]
    fn append_reuses_pooled_node() {
        let mut list = list_of(&[b"one", b"two"]);
        let removed = list.remove_at(1).unwrap();
        assert_eq!(list.pooled(), 1);
        let again = list.append().unwrap();
        assert_eq!(again, removed);
        assert_eq!(list.pooled(), 0);
        assert!(list.get(again).unwrap().is_empty());
    }

    #[test]
    fn recycled_node_keeps_storage() {
        let mut list = list_of(&[b"a fairly long line of text"]);
        let id = list.head().unwrap();
        let cap = list.get(id).unwrap().capacity();
        list.clear();
        let again = list.append().unwrap();
        assert_eq!(again, id);
        assert_eq!(list.get(again).unwrap().capacity(), cap);
    }

    // ── insert_at ─────────────────────────────────────────────────────────

    #[test]
    fn insert_at_front_becomes_head() {
        let mut list = list_of(&[b"b"]);
        let a = list.insert_at(0).unwrap();
        assert_eq!(list.head(), Some(a));
        assert_eq!(list.slot_of(a), Some(0));
        assert_links(&list);
    }

    #[test]
    fn insert_at_middle_splices() {
        let mut list = list_of(&[b"a", b"c"]);
        let b = list.insert_at(1).unwrap();
        list.get_mut(b).unwrap().replace_all(b"b").unwrap();
        assert_eq!(contents(&list), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_links(&list);
    }

    #[test]
    fn insert_at_len_appends() {
        let mut list = list_of(&[b"a"]);
        let b = list.insert_at(1).unwrap();
        assert_eq!(list.tail(), Some(b));
        assert_links(&list);
    }

    #[test]
    fn insert_past_end_pads_with_blank_lines() {
        let mut list = list_of(&[b"a"]);
        let id = list.insert_at(4).unwrap();
        list.get_mut(id).unwrap().replace_all(b"e").unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list.slot_of(id), Some(4));
        assert_eq!(list.to_text(), b"a\n\n\n\ne");
        assert_links(&list);
    }

    #[test]
    fn insert_past_end_mixes_pooled_and_fresh_nodes() {
        let mut list = list_of(&[b"a", b"b"]);
        list.remove_at(1).unwrap();
        assert_eq!(list.pooled(), 1);
        let id = list.insert_at(3).unwrap();
        assert_eq!(list.pooled(), 0);
        assert_eq!(list.len(), 4);
        assert_eq!(list.slot_of(id), Some(3));
        assert_eq!(list.to_text(), b"a\n\n\n");
        assert_links(&list);
    }

    #[test]
    fn insert_at_huge_index_fails_without_padding() {
        let mut list = list_of(&[b"a"]);
        assert!(list.insert_at(usize::MAX / 2).unwrap_err().is_alloc());
        assert_eq!(list.len(), 1);
        assert_eq!(list.to_text(), b"a");
        assert_links(&list);
    }

    // ── remove_at ─────────────────────────────────────────────────────────

    #[test]
    fn remove_head_middle_tail() {
        let mut list = list_of(&[b"a", b"b", b"c", b"d"]);
        list.remove_at(1).unwrap();
        assert_links(&list);
        list.remove_at(0).unwrap();
        assert_links(&list);
        list.remove_at(1).unwrap();
        assert_links(&list);
        assert_eq!(contents(&list), vec![b"c".to_vec()]);
        assert_eq!(list.pooled(), 3);
    }

    #[test]
    fn remove_out_of_range_is_rejected() {
        let mut list = list_of(&[b"a"]);
        assert_eq!(
            list.remove_at(1),
            Err(EditError::OutOfRange { index: 1, len: 1 })
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn removed_id_is_not_live() {
        let mut list = list_of(&[b"a", b"b"]);
        let id = list.remove_at(0).unwrap();
        assert!(!list.is_live(id));
        assert_eq!(list.get(id), None);
        assert_eq!(list.next(id), None);
        assert_eq!(list.slot_of(id), None);
    }

    #[test]
    fn remove_last_line_empties_list() {
        let mut list = list_of(&[b"only"]);
        list.remove_at(0).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    // ── nth / slot_of ─────────────────────────────────────────────────────

    #[test]
    fn nth_and_slot_of_agree() {
        let list = list_of(&[b"a", b"b", b"c"]);
        for i in 0..3 {
            let id = list.nth(i).unwrap();
            assert_eq!(list.slot_of(id), Some(i));
        }
        assert_eq!(list.nth(3), None);
    }

    // ── to_text / clear ───────────────────────────────────────────────────

    #[test]
    fn to_text_joins_without_trailing_newline() {
        let list = list_of(&[b"Hello", b"", b"World"]);
        assert_eq!(list.to_text(), b"Hello\n\nWorld");
    }

    #[test]
    fn single_empty_line_is_empty_text() {
        let list = list_of(&[b""]);
        assert_eq!(list.to_text(), b"");
    }

    #[test]
    fn reset_leaves_one_empty_line() {
        let mut list = list_of(&[b"a", b"b", b"c"]);
        let id = list.reset();
        assert_eq!(list.len(), 1);
        assert_eq!(list.head(), Some(id));
        assert_eq!(list.tail(), Some(id));
        assert!(list.get(id).unwrap().is_empty());
        assert_eq!(list.pooled(), 2);
        assert_links(&list);
    }

    #[test]
    fn reset_on_fresh_list_allocates_first_line() {
        let mut list = LineList::default();
        let id = list.reset();
        assert_eq!(list.len(), 1);
        assert_eq!(list.slot_of(id), Some(0));
        assert_eq!(list.to_text(), b"");
    }

    #[test]
    fn clear_pools_every_line() {
        let mut list = list_of(&[b"a", b"b", b"c"]);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.pooled(), 3);
        assert_links(&list);
        list.append().unwrap();
        list.append().unwrap();
        list.append().unwrap();
        list.append().unwrap();
        assert_eq!(list.pooled(), 0);
        assert_eq!(list.len(), 4);
        assert_links(&list);
    }
}
