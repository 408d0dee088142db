//! Common data bus (CDB): `R` result-broadcast slots.
//!
//! The source used a sentinel instruction with `dest_tag = ∞` to mark an
//! unused slot (and, worse, allocated a fresh one per slot per cycle in
//! baseline mode). Per the redesign notes (spec §9: "Replace with an
//! explicit optional bus slot; wakeup logic checks occupancy, not a magic
//! tag"), slots here are a plain `Option`.

use crate::common::tag::{InstTag, Tag};

/// One broadcast this cycle: which instruction, and the tag it resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusGrant {
    /// The instruction occupying this bus slot.
    pub inst_tag: InstTag,
    /// Its destination rename tag, snooped by S3/S4 and by register-file
    /// update in S1.
    pub dest_tag: Tag,
}

/// The `R` common data bus slots for the current cycle.
#[derive(Clone, Debug)]
pub struct ResultBuses {
    slots: Vec<Option<BusGrant>>,
}

impl ResultBuses {
    /// Creates `count` empty slots.
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
        }
    }

    /// Number of slots currently granted this cycle.
    pub fn used(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether at least one slot is free.
    pub fn has_free_slot(&self) -> bool {
        self.used() < self.slots.len()
    }

    /// Grants the first free slot to `grant`, returning its index.
    /// Returns `None` if all slots are occupied.
    pub fn grant(&mut self, grant: BusGrant) -> Option<usize> {
        let idx = self.slots.iter().position(|s| s.is_none())?;
        self.slots[idx] = Some(grant);
        Some(idx)
    }

    /// All grants made this cycle, skipping empty slots.
    pub fn iter(&self) -> impl Iterator<Item = BusGrant> + '_ {
        self.slots.iter().filter_map(|s| *s)
    }

    /// Whether `dest_tag` was broadcast on any bus this cycle (the
    /// wakeup/match check S3 and S4's re-read pass perform).
    pub fn broadcasts(&self, tag: Tag) -> bool {
        self.slots
            .iter()
            .any(|s| s.is_some_and(|g| g.dest_tag == tag))
    }

    /// Clears all slots, ready for the next cycle (or for recovery).
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}
