//! Indexed binary min-heap keyed by dense integer index.
//!
//! # Data layout
//!
//! ```text
//! heap[1..=len]   external indices in heap order (slot 0 unused)
//! pos[index]      heap slot of `index`, or ABSENT
//! prio[index]     current priority of `index` (meaningful only when present)
//! ```
//!
//! `pos` and `prio` are addressed by external index and grow by doubling when
//! an index beyond the current capacity is inserted.  This is what makes
//! `decrease_key` O(log n): the slot of any index is found in O(1).

use crate::HeapError;

/// Sentinel in `pos` meaning "index not in the heap".
const ABSENT: usize = usize::MAX;

/// Min-priority queue over `usize` indices with `f64` priorities.
///
/// Ties are broken by heap order; extraction order among equal priorities is
/// not stable.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap {
    heap: Vec<usize>,
    pos:  Vec<usize>,
    prio: Vec<f64>,
}

impl IndexedMinHeap {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// Pre-size for indices `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut heap = Vec::with_capacity(capacity + 1);
        heap.push(ABSENT); // slot 0 is never used
        Self {
            heap,
            pos:  vec![ABSENT; capacity],
            prio: vec![f64::INFINITY; capacity],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.pos.get(index).is_some_and(|&slot| slot != ABSENT)
    }

    /// # Errors
    /// [`HeapError::Absent`] if `index` is not queued.
    pub fn priority_of(&self, index: usize) -> Result<f64, HeapError> {
        if !self.contains(index) {
            return Err(HeapError::Absent(index));
        }
        Ok(self.prio[index])
    }

    /// # Errors
    /// - [`HeapError::NanPriority`] if `priority` is NaN.
    /// - [`HeapError::AlreadyPresent`] if `index` is already queued.
    pub fn insert(&mut self, index: usize, priority: f64) -> Result<(), HeapError> {
        if priority.is_nan() {
            return Err(HeapError::NanPriority(index));
        }
        if self.contains(index) {
            return Err(HeapError::AlreadyPresent(index));
        }
        self.grow_to_fit(index);

        self.prio[index] = priority;
        self.heap.push(index);
        let slot = self.len();
        self.pos[index] = slot;
        self.sift_up(slot);
        Ok(())
    }

    /// Lower the priority of a queued index.  Equal priority is accepted.
    ///
    /// # Errors
    /// - [`HeapError::NanPriority`] if `priority` is NaN.
    /// - [`HeapError::Absent`] if `index` is not queued.
    /// - [`HeapError::PriorityIncrease`] if `priority` exceeds the current one.
    pub fn decrease_key(&mut self, index: usize, priority: f64) -> Result<(), HeapError> {
        if priority.is_nan() {
            return Err(HeapError::NanPriority(index));
        }
        let current = self.priority_of(index)?;
        if priority > current {
            return Err(HeapError::PriorityIncrease { index, current, requested: priority });
        }
        self.prio[index] = priority;
        self.sift_up(self.pos[index]);
        Ok(())
    }

    /// Remove and return the index with the smallest priority.
    ///
    /// # Errors
    /// [`HeapError::Empty`] if the heap is empty.
    pub fn extract_min(&mut self) -> Result<usize, HeapError> {
        let last = self.len();
        if last == 0 {
            return Err(HeapError::Empty);
        }
        self.swap(1, last);
        let min = self.heap.pop().ok_or(HeapError::Empty)?;
        self.pos[min] = ABSENT;
        if !self.is_empty() {
            self.sift_down(1);
        }
        Ok(min)
    }

    /// Smallest `(index, priority)` without removing it.
    pub fn peek(&self) -> Option<(usize, f64)> {
        self.heap.get(1).map(|&index| (index, self.prio[index]))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn grow_to_fit(&mut self, index: usize) {
        if index < self.pos.len() {
            return;
        }
        let mut capacity = self.pos.len().max(1);
        while capacity <= index {
            capacity *= 2;
        }
        self.pos.resize(capacity, ABSENT);
        self.prio.resize(capacity, f64::INFINITY);
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.prio[self.heap[a]] < self.prio[self.heap[b]]
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.pos[self.heap[a]] = a;
        self.pos[self.heap[b]] = b;
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 1 && self.less(slot, slot / 2) {
            self.swap(slot, slot / 2);
            slot /= 2;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.len();
        loop {
            let left = slot * 2;
            if left > len {
                break;
            }
            let mut child = left;
            if left < len && self.less(left + 1, left) {
                child = left + 1;
            }
            if !self.less(child, slot) {
                break;
            }
            self.swap(slot, child);
            slot = child;
        }
    }

    /// Verify parent ≤ child for every slot and that `pos` mirrors `heap`.
    #[cfg(test)]
    pub(crate) fn invariant_holds(&self) -> bool {
        let len = self.len();
        (2..=len).all(|slot| !self.less(slot, slot / 2))
            && (1..=len).all(|slot| self.pos[self.heap[slot]] == slot)
            && self.pos.iter().filter(|&&slot| slot != ABSENT).count() == len
    }
}

impl Default for IndexedMinHeap {
    fn default() -> Self {
        Self::new()
    }
}
