use std::cmp::{Ordering, Reverse};

use thiserror::Error;

use crate::trie::{NodeId, TokenTrie};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HeapError {
    #[error("the frequency heap is empty")]
    Empty,
    #[error("slot {slot} is out of bounds for a heap of length {len}")]
    SlotOutOfBounds { slot: usize, len: usize },
}

type Error = HeapError;
type Result<T> = std::result::Result<T, Error>;

/// Receives the new position of an entry every time the heap moves it.
pub trait SlotTracker {
    fn set_slot(&mut self, node: NodeId, slot: Option<usize>);
}

impl SlotTracker for TokenTrie {
    #[inline(always)]
    fn set_slot(&mut self, node: NodeId, slot: Option<usize>) {
        self.set_heap_slot(node, slot);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapEntry {
    pub token: String,
    pub node: NodeId,
    pub frequency: u64,
    pub first_seen: u64,
}

impl HeapEntry {
    /// Higher frequency first, then the token that was seen earliest.
    #[inline(always)]
    fn priority(&self) -> (u64, Reverse<u64>) {
        (self.frequency, Reverse(self.first_seen))
    }

    /// Whether `self` belongs above `other` in the heap.
    #[inline(always)]
    pub fn outranks(&self, other: &HeapEntry) -> bool {
        self.cmp_rank(other) == Ordering::Greater
    }

    pub fn cmp_rank(&self, other: &HeapEntry) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

/// Array backed binary max-heap of token frequencies.
///
/// Every entry remembers its trie node and every move is reported through a [`SlotTracker`],
/// so the owner of a token can find its entry in O(1) and bump it in O(log n)
/// instead of rescanning the whole array.
#[derive(Debug, Default)]
pub struct FrequencyHeap {
    entries: Vec<HeapEntry>,
    next_rank: u64,
}

impl FrequencyHeap {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_rank: 0,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
            next_rank: 0,
        }
    }

    /// Adds a token seen for the first time, returning the slot it settled in.
    pub fn register_new<T: SlotTracker>(&mut self, token: String, node: NodeId, tracker: &mut T) -> usize {
        let slot = self.entries.len();
        self.entries.push(HeapEntry {
            token,
            node,
            frequency: 1,
            first_seen: self.next_rank,
        });
        self.next_rank += 1;

        tracker.set_slot(node, Some(slot));
        self.sift_up(slot, tracker)
    }

    /// Bumps the frequency of the entry at `slot` and restores heap order,
    /// returning the slot it settled in.
    pub fn increment_and_resift<T: SlotTracker>(&mut self, slot: usize, tracker: &mut T) -> Result<usize> {
        let len = self.entries.len();
        let entry = self.entries.get_mut(slot).ok_or(Error::SlotOutOfBounds { slot, len })?;
        entry.frequency += 1;

        Ok(self.sift_up(slot, tracker))
    }

    /// Removes and returns the highest ranked entry.
    ///
    /// The extracted entry's node is reported as no longer having a slot.
    pub fn extract_max<T: SlotTracker>(&mut self, tracker: &mut T) -> Result<HeapEntry> {
        if self.entries.is_empty() {
            return Err(Error::Empty);
        }

        let max = self.entries.swap_remove(0);
        tracker.set_slot(max.node, None);

        if let Some(root) = self.entries.first() {
            tracker.set_slot(root.node, Some(0));
            self.sift_down(0, tracker);
        }

        Ok(max)
    }

    pub fn peek(&self) -> Option<&HeapEntry> {
        self.entries.first()
    }

    pub fn get(&self, slot: usize) -> Option<&HeapEntry> {
        self.entries.get(slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in backing array order.
    pub fn iter(&self) -> impl Iterator<Item = &HeapEntry> {
        self.entries.iter()
    }

    /// Checks that no entry outranks its parent.
    pub fn is_heap(&self) -> bool {
        (1..self.entries.len()).all(|i| !self.entries[i].outranks(&self.entries[parent(i)]))
    }

    fn sift_up<T: SlotTracker>(&mut self, mut i: usize, tracker: &mut T) -> usize {
        while i > 0 && self.entries[i].outranks(&self.entries[parent(i)]) {
            self.swap(i, parent(i), tracker);
            i = parent(i);
        }

        i
    }

    fn sift_down<T: SlotTracker>(&mut self, mut i: usize, tracker: &mut T) -> usize {
        let len = self.entries.len();
        loop {
            let mut max = i;
            for child in [left_child(i), right_child(i)] {
                if child < len && self.entries[child].outranks(&self.entries[max]) {
                    max = child;
                }
            }

            if max == i {
                return i;
            }

            self.swap(i, max, tracker);
            i = max;
        }
    }

    #[inline(always)]
    fn swap<T: SlotTracker>(&mut self, a: usize, b: usize, tracker: &mut T) {
        self.entries.swap(a, b);
        tracker.set_slot(self.entries[a].node, Some(a));
        tracker.set_slot(self.entries[b].node, Some(b));
    }
}

#[inline(always)]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

#[inline(always)]
fn left_child(i: usize) -> usize {
    2 * i + 1
}

#[inline(always)]
fn right_child(i: usize) -> usize {
    2 * i + 2
}
