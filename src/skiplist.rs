//! This is an ordered skip list. Elements are kept sorted by a key which a
//! user supplied function derives from each element, and any number of
//! elements may share a key.
//!
//! Every operation starts the same way: a walk from the head sentinel down
//! through the levels which records, per level, the last node before the
//! target key (the frontier). Insert splices a new tower in after the
//! frontier; removal unlinks the node right next to it.
//!
//! Indexed lists additionally keep a width on every forward pointer - the
//! number of level 0 steps it jumps over. That makes positional lookups
//! O(log n) too (see index.rs).

use std::fmt::Debug;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SkipListError};
use crate::height::{max_height, sample_height};
use crate::node::{Arena, NodeDescription, NodeRef, HEAD, TAIL};
use crate::options::Options;

/// Where a new element goes relative to elements which already have the same
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    BeforeEqual,
    AfterEqual,
}

/// Which end of a run of equal keys a search stops at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// Stop at the last node with a key strictly less than the target.
    Before,
    /// Stop at the last node with a key less than or equal to the target.
    After,
}

pub struct SkipList<T, K, F, R = SmallRng> {
    pub(crate) arena: Arena<K, T>,
    pub(crate) key_of: F,
    probability: f64,
    rng: R,
}

impl<T, K: Ord, F: Fn(&T) -> K> SkipList<T, K, F, SmallRng> {
    /// An empty indexed list with the default promotion probability, seeded
    /// from the OS.
    pub fn new(key_of: F) -> Self {
        let options = Options::default();
        SkipList {
            arena: Arena::new(options.indexed),
            key_of,
            probability: options.probability,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_options(key_of: F, options: Options) -> Result<Self> {
        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        SkipList::with_rng(key_of, options, rng)
    }
}

impl<T, K: Ord, F: Fn(&T) -> K, R: Rng> SkipList<T, K, F, R> {
    /// Build a list which draws its tower heights from `rng`. `options.seed`
    /// is ignored.
    pub fn with_rng(key_of: F, options: Options, rng: R) -> Result<Self> {
        options.validate()?;
        Ok(SkipList {
            arena: Arena::new(options.indexed),
            key_of,
            probability: options.probability,
            rng,
        })
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Number of levels in the sentinels. Grows as needed, never shrinks.
    pub fn height(&self) -> usize {
        self.arena.height()
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn is_indexed(&self) -> bool {
        self.arena.is_indexed()
    }

    fn random_height(&mut self) -> usize {
        let cap = max_height(self.arena.len(), self.probability);
        let height = sample_height(&mut self.rng, cap, self.probability);
        if height > self.arena.height() {
            debug_log!(from = self.arena.height(), to = height, "growing list height");
        }
        height
    }

    /// Walk down from the head and return the frontier: for every level, the
    /// last node which is still before `key` according to `boundary`.
    pub(crate) fn locate(&self, key: &K, boundary: Boundary) -> Vec<usize> {
        let height = self.arena.height();
        let mut frontier = vec![HEAD; height];
        let mut cur = HEAD;
        for level in (0..height).rev() {
            loop {
                let next = self.arena.next(cur, level);
                let next_key = &self.arena.node(next).key;
                let advance = match boundary {
                    Boundary::Before => next_key.precedes(key),
                    Boundary::After => next_key.not_after(key),
                };
                if !advance { break; }
                cur = next;
            }
            frontier[level] = cur;
        }
        frontier
    }

    /// Insert an element after any elements with an equal key.
    pub fn insert(&mut self, element: T) -> NodeRef {
        self.insert_with(element, Placement::AfterEqual)
    }

    pub fn insert_with(&mut self, element: T, placement: Placement) -> NodeRef {
        let key = (self.key_of)(&element);
        self.insert_keyed(element, key, placement)
    }

    pub(crate) fn insert_keyed(&mut self, element: T, key: K, placement: Placement) -> NodeRef {
        let height = self.random_height();
        self.arena.ensure_height(height);
        let boundary = match placement {
            Placement::BeforeEqual => Boundary::Before,
            Placement::AfterEqual => Boundary::After,
        };
        let frontier = self.locate(&key, boundary);
        let slot = self.arena.insert_after(element, key, height, &frontier);
        trace_log!(slot, height, "inserted node");
        self.arena.handle(slot)
    }

    /// Append at the tail without searching. The caller guarantees `key` is
    /// not less than the current last key.
    pub(crate) fn push_back_keyed(&mut self, element: T, key: K) -> NodeRef {
        let height = self.random_height();
        self.arena.ensure_height(height);
        let frontier = self.arena.node(TAIL).prevs.clone();
        let slot = self.arena.insert_after(element, key, height, &frontier);
        self.arena.handle(slot)
    }

    fn first_slot_with(&self, key: &K) -> Option<usize> {
        if self.is_empty() { return None; }
        let prev = self.locate(key, Boundary::Before)[0];
        let slot = self.arena.next(prev, 0);
        if self.arena.node(slot).key.matches(key) { Some(slot) } else { None }
    }

    fn last_slot_with(&self, key: &K) -> Option<usize> {
        if self.is_empty() { return None; }
        let slot = self.locate(key, Boundary::After)[0];
        if self.arena.node(slot).key.matches(key) { Some(slot) } else { None }
    }

    /// The first element (in list order) whose key equals `key`.
    pub fn find_first(&self, key: &K) -> Result<&T> {
        self.first_slot_with(key)
            .map(|slot| self.arena.element(slot))
            .ok_or(SkipListError::KeyNotFound)
    }

    pub fn find_last(&self, key: &K) -> Result<&T> {
        self.last_slot_with(key)
            .map(|slot| self.arena.element(slot))
            .ok_or(SkipListError::KeyNotFound)
    }

    /// Handle to the first element whose key equals `key`.
    pub fn find_first_node(&self, key: &K) -> Result<NodeRef> {
        self.first_slot_with(key)
            .map(|slot| self.arena.handle(slot))
            .ok_or(SkipListError::KeyNotFound)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.first_slot_with(key).is_some()
    }

    /// Number of elements whose key equals `key`.
    pub fn count_key(&self, key: &K) -> usize {
        let mut count = 0;
        let mut cur = match self.first_slot_with(key) {
            Some(slot) => slot,
            None => return 0,
        };
        while self.arena.node(cur).key.matches(key) {
            count += 1;
            cur = self.arena.next(cur, 0);
        }
        count
    }

    /// Remove and return the first element whose key equals `key`.
    pub fn remove_first(&mut self, key: &K) -> Result<T> {
        let slot = self.first_slot_with(key).ok_or(SkipListError::KeyNotFound)?;
        trace_log!(slot, "removing first match");
        Ok(self.arena.detach(slot))
    }

    /// Remove and return the last element whose key equals `key`.
    pub fn remove_last(&mut self, key: &K) -> Result<T> {
        let slot = self.last_slot_with(key).ok_or(SkipListError::KeyNotFound)?;
        trace_log!(slot, "removing last match");
        Ok(self.arena.detach(slot))
    }

    pub fn first(&self) -> Result<&T> {
        self.arena.first()
            .map(|slot| self.arena.element(slot))
            .ok_or(SkipListError::EmptyCollection)
    }

    pub fn last(&self) -> Result<&T> {
        self.arena.last()
            .map(|slot| self.arena.element(slot))
            .ok_or(SkipListError::EmptyCollection)
    }

    pub fn pop_first(&mut self) -> Result<T> {
        let slot = self.arena.first().ok_or(SkipListError::EmptyCollection)?;
        Ok(self.arena.detach(slot))
    }

    pub fn pop_last(&mut self) -> Result<T> {
        let slot = self.arena.last().ok_or(SkipListError::EmptyCollection)?;
        Ok(self.arena.detach(slot))
    }

    /// The element a handle points to.
    pub fn element(&self, node: NodeRef) -> Result<&T> {
        self.arena.resolve(node)
            .map(|slot| self.arena.element(slot))
            .ok_or(SkipListError::StaleHandle)
    }

    /// The key of the element a handle points to.
    pub fn key(&self, node: NodeRef) -> Result<&K> {
        self.arena.resolve(node)
            .and_then(|slot| self.arena.node(slot).key.as_key())
            .ok_or(SkipListError::StaleHandle)
    }

    /// Remove the element a handle points to. The handle (and any copies of
    /// it) is stale afterwards.
    pub fn remove(&mut self, node: NodeRef) -> Result<T> {
        let slot = self.arena.resolve(node).ok_or(SkipListError::StaleHandle)?;
        Ok(self.arena.detach(slot))
    }

    /// Drop every element. The list keeps its configuration but starts over
    /// with no levels.
    pub fn clear(&mut self) {
        debug_log!(len = self.arena.len(), "clearing list");
        self.arena = Arena::new(self.arena.is_indexed());
    }

    /// Call `f` once per node in level 0 order, sentinels included. Intended
    /// for diagnostics; the list is not modified.
    pub fn describe<D>(&self, mut f: D) where D: for<'n> FnMut(NodeDescription<'n, K, T>) {
        f(self.arena.describe(HEAD));
        for slot in self.arena.slots() {
            f(self.arena.describe(slot));
        }
        f(self.arena.describe(TAIL));
    }

    /// Check every structural invariant, panicking if one doesn't hold. This
    /// is O(n) and meant for tests.
    pub fn check(&self) {
        self.arena.check();
        for slot in self.arena.slots() {
            let stored = self.arena.node(slot).key.as_key();
            let derived = (self.key_of)(self.arena.element(slot));
            assert!(stored == Some(&derived), "stored key of slot {} is stale", slot);
        }
    }

    pub fn print(&self) where T: Debug, K: Debug {
        println!("items: {}\theight: {}\tindexed: {}", self.len(), self.height(), self.is_indexed());
        self.describe(|node| {
            match node.key.as_key() {
                Some(key) => print!("{:?}:", key),
                None => print!("{:?}:", node.key),
            }
            match node.widths {
                Some(widths) => for w in widths { print!(" |{} ", w); },
                None => print!(" height {}", node.height),
            }
            match node.element {
                Some(element) => println!("      : {:?}", element),
                None => println!(),
            }
        });
    }
}
