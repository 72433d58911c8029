//! Borrowed views over a run of consecutive nodes, and iteration.
//!
//! A view only remembers its two boundary nodes and walks level 0 between
//! them, so creating one costs a search and nothing is copied. The borrow of
//! the list keeps the boundaries alive for as long as the view exists.

use std::iter::FusedIterator;

use rand::Rng;

use crate::node::{Arena, NodeRef, HEAD, TAIL};
use crate::skiplist::{Boundary, SkipList};

/// A contiguous run of elements, from [`SkipList::range`] or
/// [`SkipList::slice`].
pub struct SubList<'a, K, T> {
    arena: &'a Arena<K, T>,
    /// First and last slot, both inclusive. `None` for an empty view.
    bounds: Option<(usize, usize)>,
}

impl<'a, K, T> SubList<'a, K, T> {
    pub(crate) fn new(arena: &'a Arena<K, T>, first: usize, last: usize) -> Self {
        SubList { arena, bounds: Some((first, last)) }
    }

    pub(crate) fn empty(arena: &'a Arena<K, T>) -> Self {
        SubList { arena, bounds: None }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Number of elements in the view. O(log n) on indexed lists, otherwise
    /// a walk over the view.
    pub fn len(&self) -> usize {
        match self.bounds {
            None => 0,
            Some((first, last)) if self.arena.is_indexed() => {
                self.arena.position(last) - self.arena.position(first) + 1
            }
            Some(_) => self.slots().count(),
        }
    }

    pub fn first(&self) -> Option<&'a T> {
        let arena = self.arena;
        self.bounds.map(|(first, _)| arena.element(first))
    }

    pub fn last(&self) -> Option<&'a T> {
        let arena = self.arena;
        self.bounds.map(|(_, last)| arena.element(last))
    }

    pub fn iter(&self) -> Iter<'a, K, T> {
        Iter(self.slots())
    }

    pub fn keys(&self) -> Keys<'a, K, T> {
        Keys(self.slots())
    }

    /// Handles to every element in the view, in order.
    pub fn nodes(&self) -> Vec<NodeRef> {
        let arena = self.arena;
        self.slots().map(|slot| arena.handle(slot)).collect()
    }

    pub(crate) fn slots(&self) -> Slots<'a, K, T> {
        match self.bounds {
            Some((front, back)) => Slots { arena: self.arena, front, back, done: false },
            None => Slots { arena: self.arena, front: HEAD, back: HEAD, done: true },
        }
    }
}

impl<'a, K, T> IntoIterator for SubList<'a, K, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, K, T>;

    fn into_iter(self) -> Iter<'a, K, T> {
        self.iter()
    }
}

impl<'a, 'b, K, T> IntoIterator for &'b SubList<'a, K, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, K, T>;

    fn into_iter(self) -> Iter<'a, K, T> {
        self.iter()
    }
}

/// Walks level 0 between two slots (inclusive) from either end.
pub(crate) struct Slots<'a, K, T> {
    arena: &'a Arena<K, T>,
    front: usize,
    back: usize,
    done: bool,
}

impl<'a, K, T> Iterator for Slots<'a, K, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.done { return None; }
        let slot = self.front;
        if slot == self.back {
            self.done = true;
        } else {
            self.front = self.arena.next(slot, 0);
        }
        Some(slot)
    }
}

impl<'a, K, T> DoubleEndedIterator for Slots<'a, K, T> {
    fn next_back(&mut self) -> Option<usize> {
        if self.done { return None; }
        let slot = self.back;
        if slot == self.front {
            self.done = true;
        } else {
            self.back = self.arena.prev(slot, 0);
        }
        Some(slot)
    }
}

/// Iterator over elements in key order.
pub struct Iter<'a, K, T>(Slots<'a, K, T>);

impl<'a, K, T> Iterator for Iter<'a, K, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let arena = self.0.arena;
        self.0.next().map(|slot| arena.element(slot))
    }
}

impl<'a, K, T> DoubleEndedIterator for Iter<'a, K, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let arena = self.0.arena;
        self.0.next_back().map(|slot| arena.element(slot))
    }
}

impl<'a, K, T> FusedIterator for Iter<'a, K, T> {}

/// Iterator over the stored keys in order.
pub struct Keys<'a, K, T>(Slots<'a, K, T>);

impl<'a, K, T> Iterator for Keys<'a, K, T> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let arena = self.0.arena;
        self.0.next().and_then(|slot| arena.node(slot).key.as_key())
    }
}

impl<'a, K, T> DoubleEndedIterator for Keys<'a, K, T> {
    fn next_back(&mut self) -> Option<&'a K> {
        let arena = self.0.arena;
        self.0.next_back().and_then(|slot| arena.node(slot).key.as_key())
    }
}

impl<'a, K, T> FusedIterator for Keys<'a, K, T> {}

impl<T, K: Ord, F: Fn(&T) -> K, R: Rng> SkipList<T, K, F, R> {
    /// A view of every element with `start <= key <= end`. Empty when no key
    /// falls in that range, including when `end < start`.
    pub fn range(&self, start: &K, end: &K) -> SubList<'_, K, T> {
        if self.is_empty() {
            return SubList::empty(&self.arena);
        }
        let first = self.arena.next(self.locate(start, Boundary::Before)[0], 0);
        let last = self.locate(end, Boundary::After)[0];
        // first holds the smallest key >= start and last the largest key <=
        // end, so the range is empty exactly when those keys cross.
        if first == TAIL || last == HEAD || self.arena.node(first).key > self.arena.node(last).key {
            return SubList::empty(&self.arena);
        }
        SubList::new(&self.arena, first, last)
    }

    /// A view of the whole list.
    pub fn all(&self) -> SubList<'_, K, T> {
        match (self.arena.first(), self.arena.last()) {
            (Some(first), Some(last)) => SubList::new(&self.arena, first, last),
            _ => SubList::empty(&self.arena),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, T> {
        self.all().iter()
    }

    pub fn keys(&self) -> Keys<'_, K, T> {
        self.all().keys()
    }

    /// Remove every element with `start <= key <= end` and return them in
    /// order.
    pub fn pop_range(&mut self, start: &K, end: &K) -> Vec<T> {
        // Unlinking while walking would lose our place, so collect first.
        let slots: Vec<usize> = self.range(start, end).slots().collect();
        debug_log!(count = slots.len(), "popping range");
        slots.into_iter().map(|slot| self.arena.detach(slot)).collect()
    }
}
