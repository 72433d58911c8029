// Bulk construction and the std trait plumbing for skip lists.

use std::fmt;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::error::Result;
use crate::node::Arena;
use crate::options::Options;
use crate::range::Iter;
use crate::skiplist::{Placement, SkipList};

impl<T, K: Ord, F: Fn(&T) -> K> SkipList<T, K, F, SmallRng> {
    /// Build a list from elements which are already in key order. Each
    /// element is appended at the tail without a search, so this is O(n).
    /// Out of order elements are still placed correctly, just more slowly.
    pub fn from_sorted<I>(key_of: F, options: Options, items: I) -> Result<Self>
    where I: IntoIterator<Item = T> {
        let mut list = Self::with_options(key_of, options)?;
        list.extend_sorted(items);
        Ok(list)
    }

    /// Build a list from elements in any order. They are sorted once (stably,
    /// so equal keys keep their input order) and then appended.
    pub fn from_unsorted<I>(key_of: F, options: Options, items: I) -> Result<Self>
    where I: IntoIterator<Item = T> {
        let mut list = Self::with_options(key_of, options)?;
        list.extend(items);
        Ok(list)
    }
}

impl<T, K: Ord, F: Fn(&T) -> K, R: Rng> SkipList<T, K, F, R> {
    /// Insert elements which are expected to arrive in key order. While they
    /// do, each one is appended straight after the current last element.
    /// Any element which sorts before the current last element falls back to
    /// a normal insert, after existing equal keys.
    pub fn extend_sorted<I>(&mut self, items: I) where I: IntoIterator<Item = T> {
        for element in items {
            let key = (self.key_of)(&element);
            self.append_keyed(element, key);
        }
        debug_log!(len = self.len(), "extended list from sorted input");
    }

    fn append_keyed(&mut self, element: T, key: K) {
        let in_order = match self.arena.last() {
            Some(slot) => self.arena.node(slot).key.not_after(&key),
            None => true,
        };
        if in_order {
            self.push_back_keyed(element, key);
        } else {
            self.insert_keyed(element, key, Placement::AfterEqual);
        }
    }

    /// Remove every element, returning them in key order.
    pub fn drain(&mut self) -> Vec<T> {
        let indexed = self.arena.is_indexed();
        let mut arena = std::mem::replace(&mut self.arena, Arena::new(indexed));
        arena.slots()
            .into_iter()
            .filter_map(|slot| arena.nodes[slot].element.take())
            .collect()
    }
}

impl<T, K: Ord, F: Fn(&T) -> K, R: Rng> Extend<T> for SkipList<T, K, F, R> {
    /// Sorts the incoming elements by key, then appends them.
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        let key_of = &self.key_of;
        let mut keyed: Vec<(K, T)> = items.into_iter()
            .map(|element| (key_of(&element), element))
            .collect();
        // Stable, so equal keys keep their relative order.
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        debug_log!(count = keyed.len(), "extending list");
        for (key, element) in keyed {
            self.append_keyed(element, key);
        }
    }
}

impl<'a, T, K: Ord, F: Fn(&T) -> K, R: Rng> IntoIterator for &'a SkipList<T, K, F, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, K, T>;

    fn into_iter(self) -> Iter<'a, K, T> {
        self.iter()
    }
}

impl<T, K: Ord, F: Fn(&T) -> K, R: Rng> IntoIterator for SkipList<T, K, F, R> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(mut self) -> std::vec::IntoIter<T> {
        self.drain().into_iter()
    }
}

impl<T: fmt::Debug, K: Ord, F: Fn(&T) -> K, R: Rng> fmt::Debug for SkipList<T, K, F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
