//! Scheduling queue (SQ): renamed in-flight instructions, from DISPATCHED
//! to reclaimed.

use crate::common::error::EngineBug;
use crate::common::tag::InstTag;

/// Fixed-capacity pool of in-flight instruction tags. Capacity is always
/// `2 * (K0 + K1 + K2)` (spec §3).
#[derive(Clone, Debug)]
pub struct SchedulingQueue {
    entries: Vec<InstTag>,
    capacity: usize,
}

impl SchedulingQueue {
    /// Creates an empty scheduling queue of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Whether there is room for one more entry.
    pub fn has_room(&self) -> bool {
        self.entries.len() < self.capacity
    }

    /// Inserts a newly dispatched instruction. Panics with an
    /// [`EngineBug`] if the queue is already at capacity — callers must
    /// check [`SchedulingQueue::has_room`] first.
    pub fn insert(&mut self, inst_tag: InstTag) {
        if !self.has_room() {
            panic!(
                "{}",
                EngineBug::SchedulingQueueOverflow {
                    len: self.entries.len(),
                    capacity: self.capacity,
                }
            );
        }
        self.entries.push(inst_tag);
    }

    /// Removes a specific tag (reclaim in S5). No-op if absent.
    pub fn remove(&mut self, inst_tag: InstTag) {
        if let Some(idx) = self.entries.iter().position(|&t| t == inst_tag) {
            self.entries.remove(idx);
        }
    }

    /// Iterates tags in program order (insertion order), the order S2's
    /// scan uses as its tie-breaker (spec §4.2).
    pub fn iter(&self) -> impl Iterator<Item = InstTag> + '_ {
        self.entries.iter().copied()
    }

    /// Clears the queue entirely (recovery).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Current occupancy.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The youngest (highest-tag) entry still in the queue, i.e. the tail
    /// of the insertion order (`sq.back()` in `original_source`). Tags are
    /// always inserted in increasing order and `remove` never reorders the
    /// survivors, so the last entry is always the maximum.
    pub fn max_tag(&self) -> Option<InstTag> {
        self.entries.last().copied()
    }
}
