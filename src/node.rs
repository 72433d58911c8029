//! Nodes and their towers.
//!
//! Nodes live in an arena owned by the list and refer to their neighbours by
//! slot number, so the doubly linked levels never form an ownership cycle.
//! Slot 0 is the head sentinel and slot 1 the tail sentinel. Both always span
//! the full height of the list.

/// Slot of the head sentinel.
pub(crate) const HEAD: usize = 0;
/// Slot of the tail sentinel.
pub(crate) const TAIL: usize = 1;
/// The neighbour of a sentinel on its open side.
pub(crate) const NIL: usize = usize::MAX;

/// The key stored in a node. Sentinels carry the two infinities, which is why
/// variant order matters: the derived `Ord` puts `NegativeInfinity` below and
/// `PositiveInfinity` above every real key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKey<K> {
    NegativeInfinity,
    Key(K),
    PositiveInfinity,
}

impl<K: Ord> NodeKey<K> {
    /// `self < key`
    pub(crate) fn precedes(&self, key: &K) -> bool {
        match self {
            NodeKey::NegativeInfinity => true,
            NodeKey::Key(k) => k < key,
            NodeKey::PositiveInfinity => false,
        }
    }

    /// `self <= key`
    pub(crate) fn not_after(&self, key: &K) -> bool {
        match self {
            NodeKey::NegativeInfinity => true,
            NodeKey::Key(k) => k <= key,
            NodeKey::PositiveInfinity => false,
        }
    }

    pub(crate) fn matches(&self, key: &K) -> bool {
        match self {
            NodeKey::Key(k) => k == key,
            _ => false,
        }
    }
}

impl<K> NodeKey<K> {
    /// The real key, or `None` for a sentinel.
    pub fn as_key(&self) -> Option<&K> {
        match self {
            NodeKey::Key(k) => Some(k),
            _ => None,
        }
    }
}

/// A handle to an element inside a list.
///
/// Handles stay valid until their element leaves the list. After that every
/// operation taking the handle fails with
/// [`StaleHandle`](crate::SkipListError::StaleHandle), even once the slot has
/// been reused by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    slot: usize,
    generation: u64,
}

/// A read-only snapshot of one node, handed to
/// [`SkipList::describe`](crate::SkipList::describe).
#[derive(Debug)]
pub struct NodeDescription<'a, K, T> {
    /// `None` for the sentinels.
    pub element: Option<&'a T>,
    pub key: &'a NodeKey<K>,
    pub height: usize,
    /// `None` when the list is not indexed.
    pub widths: Option<&'a [usize]>,
}

pub(crate) struct Node<K, T> {
    pub(crate) element: Option<T>,
    pub(crate) key: NodeKey<K>,
    /// Level 0 is the next node in sorted order.
    pub(crate) nexts: Vec<usize>,
    pub(crate) prevs: Vec<usize>,
    /// `widths[i]` is the number of level 0 steps from this node to
    /// `nexts[i]`. `widths[0]` is always 1. Only kept by indexed lists.
    pub(crate) widths: Option<Vec<usize>>,
    generation: u64,
}

impl<K, T> Node<K, T> {
    fn sentinel(key: NodeKey<K>, indexed: bool) -> Self {
        Node {
            element: None,
            key,
            nexts: Vec::new(),
            prevs: Vec::new(),
            widths: if indexed { Some(Vec::new()) } else { None },
            generation: 0,
        }
    }

    pub(crate) fn height(&self) -> usize {
        self.nexts.len()
    }

    pub(crate) fn widths(&self) -> &[usize] {
        self.widths.as_deref().unwrap_or(&[])
    }

    fn is_live(&self) -> bool {
        self.element.is_some()
    }
}

/// Owns every node of one list, sentinels included.
pub(crate) struct Arena<K, T> {
    pub(crate) nodes: Vec<Node<K, T>>,
    free: Vec<usize>,
    len: usize,
    indexed: bool,
}

impl<K, T> Arena<K, T> {
    /// An empty list: just the two sentinels, with no levels yet. The first
    /// insert creates level 0.
    pub(crate) fn new(indexed: bool) -> Self {
        Arena {
            nodes: vec![
                Node::sentinel(NodeKey::NegativeInfinity, indexed),
                Node::sentinel(NodeKey::PositiveInfinity, indexed),
            ],
            free: Vec::new(),
            len: 0,
            indexed,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn height(&self) -> usize {
        self.nodes[HEAD].height()
    }

    pub(crate) fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub(crate) fn node(&self, slot: usize) -> &Node<K, T> {
        &self.nodes[slot]
    }

    pub(crate) fn next(&self, slot: usize, level: usize) -> usize {
        self.nodes[slot].nexts[level]
    }

    pub(crate) fn prev(&self, slot: usize, level: usize) -> usize {
        self.nodes[slot].prevs[level]
    }

    pub(crate) fn first(&self) -> Option<usize> {
        if self.len == 0 { None } else { Some(self.next(HEAD, 0)) }
    }

    pub(crate) fn last(&self) -> Option<usize> {
        if self.len == 0 { None } else { Some(self.prev(TAIL, 0)) }
    }

    /// The element stored in a real node.
    pub(crate) fn element(&self, slot: usize) -> &T {
        match &self.nodes[slot].element {
            Some(e) => e,
            None => panic!("Internal consistency violation: slot {} holds no element", slot),
        }
    }

    pub(crate) fn handle(&self, slot: usize) -> NodeRef {
        NodeRef { slot, generation: self.nodes[slot].generation }
    }

    /// Resolve a handle to its slot if the element is still in the list.
    pub(crate) fn resolve(&self, r: NodeRef) -> Option<usize> {
        match self.nodes.get(r.slot) {
            Some(node) if r.slot > TAIL && node.is_live() && node.generation == r.generation => {
                Some(r.slot)
            }
            _ => None,
        }
    }

    /// Grow the sentinels to at least `height` levels. New levels link head
    /// straight to tail, spanning every element.
    pub(crate) fn ensure_height(&mut self, height: usize) {
        while self.height() < height {
            let span = self.len + 1;
            let head = &mut self.nodes[HEAD];
            head.nexts.push(TAIL);
            head.prevs.push(NIL);
            if let Some(w) = &mut head.widths {
                w.push(span);
            }

            let tail = &mut self.nodes[TAIL];
            tail.nexts.push(NIL);
            tail.prevs.push(HEAD);
            if let Some(w) = &mut tail.widths {
                w.push(0);
            }
        }
    }

    /// Link a new node of `height` levels in after the frontier. `frontier`
    /// must hold one node per level of the list (not just per level of the new
    /// node), since in indexed mode the spans above the new tower grow too.
    pub(crate) fn insert_after(&mut self, element: T, key: K, height: usize, frontier: &[usize]) -> usize {
        debug_assert!(height >= 1 && height <= self.height());
        debug_assert_eq!(frontier.len(), self.height());

        let widths = if self.indexed { Some(vec![1; height]) } else { None };
        let slot = match self.free.pop() {
            Some(slot) => {
                let node = &mut self.nodes[slot];
                node.element = Some(element);
                node.key = NodeKey::Key(key);
                node.nexts.resize(height, NIL);
                node.prevs.resize(height, NIL);
                node.widths = widths;
                slot
            }
            None => {
                self.nodes.push(Node {
                    element: Some(element),
                    key: NodeKey::Key(key),
                    nexts: vec![NIL; height],
                    prevs: vec![NIL; height],
                    widths,
                    generation: 0,
                });
                self.nodes.len() - 1
            }
        };

        for level in 0..height {
            let prev = frontier[level];
            let next = self.nodes[prev].nexts[level];
            self.nodes[slot].prevs[level] = prev;
            self.nodes[slot].nexts[level] = next;
            self.nodes[prev].nexts[level] = slot;
            self.nodes[next].prevs[level] = slot;
        }
        self.len += 1;

        if self.indexed {
            for level in 1..self.height() {
                if level < height {
                    self.recompute_width(slot, level);
                }
                self.recompute_width(frontier[level], level);
            }
        }

        slot
    }

    /// Unlink a real node from every level and return its element. The slot
    /// goes on the free list with an empty tower.
    pub(crate) fn detach(&mut self, slot: usize) -> T {
        debug_assert!(slot > TAIL && self.nodes[slot].is_live());

        let preds = if self.indexed { self.predecessors(slot) } else { Vec::new() };

        for level in 0..self.nodes[slot].height() {
            let prev = self.nodes[slot].prevs[level];
            let next = self.nodes[slot].nexts[level];
            self.nodes[prev].nexts[level] = next;
            self.nodes[next].prevs[level] = prev;
        }

        let node = &mut self.nodes[slot];
        node.nexts.clear();
        node.prevs.clear();
        if let Some(w) = &mut node.widths {
            w.clear();
        }
        node.key = NodeKey::PositiveInfinity;
        node.generation += 1;
        let element = match node.element.take() {
            Some(e) => e,
            None => panic!("Internal consistency violation: detached an empty slot"),
        };
        self.free.push(slot);
        self.len -= 1;

        for (level, &prev) in preds.iter().enumerate().skip(1) {
            self.recompute_width(prev, level);
        }

        element
    }

    /// The last node before `slot` on every level of the list. Below the
    /// node's own height that's just its prevs. Above it we climb: from a
    /// predecessor that is too short, jumping back along its top level lands
    /// on the nearest node at least one level taller.
    pub(crate) fn predecessors(&self, slot: usize) -> Vec<usize> {
        let mut preds = Vec::with_capacity(self.height());
        preds.extend_from_slice(&self.nodes[slot].prevs);

        let mut cur = match preds.last() {
            Some(&p) => p,
            None => HEAD,
        };
        for level in preds.len()..self.height() {
            while self.nodes[cur].height() <= level {
                let top = self.nodes[cur].height() - 1;
                cur = self.nodes[cur].prevs[top];
            }
            preds.push(cur);
        }
        preds
    }

    /// Recompute `widths[level]` of `slot` by summing the level below across
    /// its span. Level `level - 1` must already be correct along the span.
    pub(crate) fn recompute_width(&mut self, slot: usize, level: usize) {
        debug_assert!(level >= 1);
        let end = self.nodes[slot].nexts[level];
        let mut cur = slot;
        let mut span = 0;
        while cur != end {
            let node = &self.nodes[cur];
            span += node.widths()[level - 1];
            cur = node.nexts[level - 1];
        }
        if let Some(w) = &mut self.nodes[slot].widths {
            w[level] = span;
        }
    }

    pub(crate) fn describe(&self, slot: usize) -> NodeDescription<'_, K, T> {
        let node = &self.nodes[slot];
        NodeDescription {
            element: node.element.as_ref(),
            key: &node.key,
            height: node.height(),
            widths: node.widths.as_deref(),
        }
    }

    /// Level 0 slots in order, sentinels excluded.
    pub(crate) fn slots(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len);
        let mut cur = HEAD;
        for _ in 0..self.len {
            cur = self.next(cur, 0);
            out.push(cur);
        }
        out
    }
}

impl<K: Ord, T> Arena<K, T> {
    /// Walk the whole structure and panic if anything is out of place.
    pub(crate) fn check(&self) {
        let height = self.height();
        assert!(matches!(self.nodes[HEAD].key, NodeKey::NegativeInfinity));
        assert!(matches!(self.nodes[TAIL].key, NodeKey::PositiveInfinity));
        assert_eq!(self.nodes[TAIL].height(), height);

        if height == 0 {
            assert_eq!(self.len, 0);
            return;
        }

        // Level 0 defines everyone's position. Head is 0, tail is len + 1.
        let mut position = vec![usize::MAX; self.nodes.len()];
        let mut order = vec![HEAD];
        position[HEAD] = 0;
        let mut cur = HEAD;
        while cur != TAIL {
            let next = self.next(cur, 0);
            assert_eq!(self.prev(next, 0), cur, "level 0 back link broken at slot {}", next);
            assert!(self.nodes[cur].key <= self.nodes[next].key, "keys out of order at slot {}", next);
            assert_eq!(position[next], usize::MAX, "level 0 cycle at slot {}", next);
            position[next] = order.len();
            order.push(next);
            cur = next;
        }
        assert_eq!(order.len(), self.len + 2, "length does not match level 0");

        for (slot, node) in self.nodes.iter().enumerate() {
            if slot > TAIL && !node.is_live() {
                assert_eq!(node.height(), 0, "freed slot {} kept its tower", slot);
                continue;
            }
            assert_ne!(position[slot], usize::MAX, "slot {} unreachable", slot);
            let h = node.height();
            assert!(h >= 1 && h <= height, "slot {} has height {}", slot, h);
            assert_eq!(node.prevs.len(), h);
            assert_eq!(node.widths.is_some(), self.indexed);
            if self.indexed {
                assert_eq!(node.widths().len(), h);
            }
        }

        for level in 0..height {
            let expected: Vec<usize> = order.iter().copied()
                .filter(|&slot| self.nodes[slot].height() > level)
                .collect();
            let mut walked = vec![HEAD];
            let mut cur = HEAD;
            while cur != TAIL {
                let next = self.next(cur, level);
                assert_eq!(self.prev(next, level), cur, "level {} back link broken at slot {}", level, next);
                if self.indexed {
                    assert_eq!(self.nodes[cur].widths()[level], position[next] - position[cur],
                        "width of slot {} at level {} is wrong", cur, level);
                }
                walked.push(next);
                cur = next;
            }
            assert_eq!(walked, expected, "level {} skips a tower", level);
        }
    }
}
