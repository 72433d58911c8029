//! Positional access for indexed lists.
//!
//! Head sits at position 0 and the element at index i at position i + 1, so
//! a node's position is the sum of the widths on any path from the head to
//! it. Going down from the head finds a position; climbing back towards the
//! head from a node measures one.

use rand::Rng;

use crate::error::{Result, SkipListError};
use crate::node::{Arena, NodeRef, HEAD, TAIL};
use crate::range::SubList;
use crate::skiplist::{Boundary, SkipList};

impl<K, T> Arena<K, T> {
    /// Level 0 steps from the head to `slot`.
    pub(crate) fn position(&self, slot: usize) -> usize {
        let mut steps = 0;
        let mut cur = slot;
        while cur != HEAD {
            let top = self.node(cur).height() - 1;
            let prev = self.prev(cur, top);
            steps += self.node(prev).widths()[top];
            cur = prev;
        }
        steps
    }

    /// The node `steps` level 0 steps after the head.
    pub(crate) fn slot_at_position(&self, steps: usize) -> usize {
        debug_assert!(steps <= self.len() + 1);
        let mut cur = HEAD;
        let mut walked = 0;
        for level in (0..self.height()).rev() {
            while cur != TAIL {
                let width = self.node(cur).widths()[level];
                if walked + width > steps { break; }
                walked += width;
                cur = self.next(cur, level);
            }
            if walked == steps { break; }
        }
        debug_assert_eq!(walked, steps, "Internal consistency violation: widths do not add up");
        cur
    }
}

impl<T, K: Ord, F: Fn(&T) -> K, R: Rng> SkipList<T, K, F, R> {
    fn require_indexed(&self) -> Result<()> {
        if self.is_indexed() {
            Ok(())
        } else {
            Err(SkipListError::InvalidConfiguration(
                "positional operations need an indexed list".to_string(),
            ))
        }
    }

    /// Map `index` (negative counts from the end) into `[0, len)`.
    fn normalize_index(&self, index: isize) -> Result<usize> {
        let len = self.len() as isize;
        if index < -len || index >= len {
            return Err(SkipListError::IndexOutOfRange { index, len: self.len() });
        }
        let index = if index < 0 { index + len } else { index };
        Ok(index as usize)
    }

    fn slot_at(&self, index: isize) -> Result<usize> {
        self.require_indexed()?;
        let index = self.normalize_index(index)?;
        Ok(self.arena.slot_at_position(index + 1))
    }

    /// Handle to the element at `index`. Negative indexes count back from the
    /// end, so `-1` is the last element.
    pub fn node_at(&self, index: isize) -> Result<NodeRef> {
        self.slot_at(index).map(|slot| self.arena.handle(slot))
    }

    pub fn get(&self, index: isize) -> Result<&T> {
        self.slot_at(index).map(|slot| self.arena.element(slot))
    }

    /// Current index of the element a handle points to.
    pub fn index_of(&self, node: NodeRef) -> Result<usize> {
        self.require_indexed()?;
        let slot = self.arena.resolve(node).ok_or(SkipListError::StaleHandle)?;
        Ok(self.arena.position(slot) - 1)
    }

    pub fn pop_at(&mut self, index: isize) -> Result<T> {
        let slot = self.slot_at(index)?;
        trace_log!(slot, index, "popping by index");
        Ok(self.arena.detach(slot))
    }

    /// Index of the first element whose key is not less than `key`. This is
    /// where [`Placement::BeforeEqual`](crate::Placement) would insert it.
    pub fn bisect_left(&self, key: &K) -> Result<usize> {
        self.bisect(key, Boundary::Before)
    }

    /// Index of the first element whose key is greater than `key`.
    pub fn bisect_right(&self, key: &K) -> Result<usize> {
        self.bisect(key, Boundary::After)
    }

    fn bisect(&self, key: &K, boundary: Boundary) -> Result<usize> {
        self.require_indexed()?;
        if self.is_empty() { return Ok(0); }
        let prev = self.locate(key, boundary)[0];
        Ok(self.arena.position(prev))
    }

    /// A view of the elements at indexes `[start, end)`. Bounds past the end
    /// are clamped, like slicing a Python list.
    pub fn slice(&self, start: usize, end: usize) -> Result<SubList<'_, K, T>> {
        self.require_indexed()?;
        let end = end.min(self.len());
        if start >= end {
            return Ok(SubList::empty(&self.arena));
        }
        let first = self.arena.slot_at_position(start + 1);
        let last = self.arena.slot_at_position(end);
        debug_assert!(first != TAIL && last != HEAD);
        Ok(SubList::new(&self.arena, first, last))
    }
}
