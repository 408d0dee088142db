//! Reorder buffer (ROB mode): in-order commit and flush-to-head.
//!
//! The ROB tracks instructions in program order from dispatch through
//! retire. It does not carry result data (the engine holds that); it exists
//! purely to enforce the order invariant (spec §3 invariant 6: "In ROB
//! mode, retire occurs strictly in program order") and to answer the
//! `rob_hit` accounting query in S4 (spec §4.9).

use crate::common::tag::InstTag;
use crate::instruction::RegRef;

/// One ROB entry: just enough to drive in-order retire and the `rob_hit`
/// accounting scan. The authoritative instruction state lives in the
/// engine's `instructions` sequence, keyed by `inst_tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobEntry {
    /// Program-order tag of the occupying instruction.
    pub inst_tag: InstTag,
    /// Destination architectural register, for the `rob_hit` reverse scan.
    pub dest_reg: RegRef,
}

/// Program-order sequence of in-flight instructions, populated at dispatch
/// and drained at retire.
#[derive(Clone, Debug, Default)]
pub struct Rob {
    entries: Vec<RobEntry>,
}

impl Rob {
    /// Creates an empty ROB.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry`, maintaining program order by `inst_tag` (spec
    /// §4.9: "into the ROB with insertion sort by inst_tag"). Dispatch
    /// already proceeds in program order, so this degenerates to an
    /// append in practice, but the sorted insert keeps the invariant
    /// explicit rather than assumed.
    pub fn insert(&mut self, entry: RobEntry) {
        let pos = self
            .entries
            .partition_point(|e| e.inst_tag.0 < entry.inst_tag.0);
        self.entries.insert(pos, entry);
    }

    /// The head entry (oldest in-flight instruction), if any.
    pub fn head(&self) -> Option<RobEntry> {
        self.entries.first().copied()
    }

    /// Removes and returns the head entry (on retire in program order).
    pub fn pop_head(&mut self) -> Option<RobEntry> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    /// Scans from the tail backwards for the most recent (youngest) entry
    /// producing `reg`, stopping at `before` (exclusive). Used only for the
    /// `rob_hit` statistic (spec §4.9): the actual source tag is always
    /// read from the register file, this scan is accounting-only.
    pub fn find_younger_producer(&self, reg: usize, before: InstTag) -> Option<InstTag> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.inst_tag.0 < before.0)
            .find(|e| e.dest_reg == Some(reg))
            .map(|e| e.inst_tag)
    }

    /// Clears the ROB entirely (ROB-mode recovery, spec §4.6 step 2).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of in-flight entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ROB holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in program order, for flush accounting.
    pub fn iter(&self) -> impl Iterator<Item = &RobEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_maintains_program_order() {
        let mut rob = Rob::new();
        rob.insert(RobEntry {
            inst_tag: InstTag(1),
            dest_reg: Some(1),
        });
        rob.insert(RobEntry {
            inst_tag: InstTag(2),
            dest_reg: Some(2),
        });
        assert_eq!(rob.head().unwrap().inst_tag, InstTag(1));
        assert_eq!(rob.len(), 2);
    }

    #[test]
    fn pop_head_retires_in_order() {
        let mut rob = Rob::new();
        rob.insert(RobEntry {
            inst_tag: InstTag(1),
            dest_reg: None,
        });
        rob.insert(RobEntry {
            inst_tag: InstTag(2),
            dest_reg: None,
        });
        let head = rob.pop_head().unwrap();
        assert_eq!(head.inst_tag, InstTag(1));
        assert_eq!(rob.head().unwrap().inst_tag, InstTag(2));
    }

    #[test]
    fn find_younger_producer_scans_backward_and_respects_before() {
        let mut rob = Rob::new();
        rob.insert(RobEntry {
            inst_tag: InstTag(1),
            dest_reg: Some(3),
        });
        rob.insert(RobEntry {
            inst_tag: InstTag(2),
            dest_reg: Some(3),
        });
        rob.insert(RobEntry {
            inst_tag: InstTag(3),
            dest_reg: Some(3),
        });
        // Before tag 3: the youngest producer of reg 3 strictly older is tag 2.
        assert_eq!(
            rob.find_younger_producer(3, InstTag(3)),
            Some(InstTag(2))
        );
        // No producer of a register nothing ever writes.
        assert_eq!(rob.find_younger_producer(9, InstTag(3)), None);
    }

    #[test]
    fn clear_empties_the_rob() {
        let mut rob = Rob::new();
        rob.insert(RobEntry {
            inst_tag: InstTag(1),
            dest_reg: None,
        });
        rob.clear();
        assert!(rob.is_empty());
    }
}
