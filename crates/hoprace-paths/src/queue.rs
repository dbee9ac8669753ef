//! Indexed binary min-heap for the search frontier.
//!
//! `std::collections::BinaryHeap` cannot remove an arbitrary element, and the
//! search needs to pull a queued node back out when it finds a cheaper way to
//! reach it. [`OpenQueue`] keeps a node→slot index next to the heap array so
//! that removal is `O(log n)` as well.

/// Ordering key of a queued node: total cost, then heuristic, then
/// accumulated cost, all ascending.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    pub f: i32,
    pub h: i32,
    pub g: i32,
}

impl Priority {
    /// Key for a node with accumulated cost `g` and estimate `h`.
    #[inline]
    pub const fn new(g: i32, h: i32) -> Self {
        Self { f: g + h, h, g }
    }
}

#[derive(Copy, Clone, Debug)]
struct Entry {
    node: usize,
    prio: Priority,
}

/// Min-heap of node indices keyed by [`Priority`].
///
/// Nodes are dense indices in `0..capacity`. A node is queued at most once;
/// pushing a node that is already queued replaces its key.
#[derive(Clone, Debug, Default)]
pub struct OpenQueue {
    heap: Vec<Entry>,
    slots: Vec<Option<usize>>,
}

impl OpenQueue {
    /// Create an empty queue for nodes `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: Vec::new(),
            slots: vec![None; capacity],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `node` is currently queued.
    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        self.slots.get(node).is_some_and(Option::is_some)
    }

    /// Priority of a queued node.
    pub fn priority(&self, node: usize) -> Option<Priority> {
        let slot = (*self.slots.get(node)?)?;
        Some(self.heap[slot].prio)
    }

    /// Queue `node` with the given key.
    pub fn push(&mut self, node: usize, prio: Priority) {
        if node >= self.slots.len() {
            self.slots.resize(node + 1, None);
        }
        if self.contains(node) {
            self.remove(node);
        }
        let slot = self.heap.len();
        self.heap.push(Entry { node, prio });
        self.slots[node] = Some(slot);
        self.up(slot);
    }

    /// The node with the smallest key, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<usize> {
        self.heap.first().map(|e| e.node)
    }

    /// Remove and return the node with the smallest key.
    pub fn pop(&mut self) -> Option<usize> {
        let n = self.heap.len().checked_sub(1)?;
        self.swap(0, n);
        self.down(0, n);
        self.take_last()
    }

    /// Remove `node` from wherever it sits in the heap.
    ///
    /// Returns `false` if the node was not queued.
    pub fn remove(&mut self, node: usize) -> bool {
        let Some(slot) = self.slots.get(node).copied().flatten() else {
            return false;
        };
        let n = self.heap.len() - 1;
        if slot != n {
            self.swap(slot, n);
            if !self.down(slot, n) {
                self.up(slot);
            }
        }
        self.take_last();
        true
    }

    /// Drop every queued node.
    pub fn clear(&mut self) {
        for e in self.heap.drain(..) {
            self.slots[e.node] = None;
        }
    }

    // -----------------------------------------------------------------------
    // Heap plumbing
    // -----------------------------------------------------------------------

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.heap[i].prio < self.heap[j].prio
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.slots[self.heap[i].node] = Some(i);
        self.slots[self.heap[j].node] = Some(j);
    }

    fn take_last(&mut self) -> Option<usize> {
        let e = self.heap.pop()?;
        self.slots[e.node] = None;
        Some(e.node)
    }

    fn up(&mut self, mut j: usize) {
        while j > 0 {
            let i = (j - 1) / 2;
            if !self.less(j, i) {
                break;
            }
            self.swap(i, j);
            j = i;
        }
    }

    /// Sift `i0` down within `heap[..n]`. Returns whether it moved.
    fn down(&mut self, i0: usize, n: usize) -> bool {
        let mut i = i0;
        loop {
            let j1 = 2 * i + 1;
            if j1 >= n {
                break;
            }
            let mut j = j1;
            let j2 = j1 + 1;
            if j2 < n && self.less(j2, j1) {
                j = j2;
            }
            if !self.less(j, i) {
                break;
            }
            self.swap(i, j);
            i = j;
        }
        i > i0
    }
}
