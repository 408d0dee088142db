//! CPR-mode register-file checkpoints: `backup1`/`backup2` and their
//! barrier pointers `ib1`/`ib2` (spec §3, §4.7).

use crate::common::tag::InstTag;
use crate::register_file::{RegEntry, RegisterFile, NUM_REGISTERS};

/// The two most recent register-file snapshots plus their barrier tags.
///
/// `backup2` holds the architectural state as of `ib2` (inclusive);
/// `backup1` holds it as of `ib1`. Invariant: `ib2 <= ib1` (spec invariant
/// 7).
#[derive(Clone, Debug)]
pub struct Checkpoint {
    backup1: [RegEntry; NUM_REGISTERS],
    backup2: [RegEntry; NUM_REGISTERS],
    ib1: InstTag,
    ib2: InstTag,
}

impl Checkpoint {
    /// Creates a checkpoint pair seeded from the initial register file,
    /// with `ib1` set to the configured first-checkpoint threshold and
    /// `ib2` at tag 0 (spec §9 open question: the literal `20` is the
    /// checkpoint interval, made configurable here).
    pub fn new(register_file: &RegisterFile, interval: u64) -> Self {
        let snapshot = register_file.snapshot();
        Self {
            backup1: snapshot,
            backup2: snapshot,
            ib1: InstTag(interval),
            ib2: InstTag(0),
        }
    }

    /// The most recent fully-retired checkpoint barrier.
    pub fn ib1(&self) -> InstTag {
        self.ib1
    }

    /// The older, rollback-target checkpoint barrier.
    pub fn ib2(&self) -> InstTag {
        self.ib2
    }

    /// The snapshot rollback restores to.
    pub fn backup2(&self) -> &[RegEntry; NUM_REGISTERS] {
        &self.backup2
    }

    /// Advances the checkpoint window once all instructions up to `ib1`
    /// have retired (spec §4.5 CPR-mode retire): `backup2 <- backup1`,
    /// `backup1 <- current register file`, `ib2 <- ib1`, `ib1 <- last_sq_tag`.
    pub fn advance(&mut self, register_file: &RegisterFile, last_sq_tag: InstTag) {
        self.backup2 = self.backup1;
        self.backup1 = register_file.snapshot();
        self.ib2 = self.ib1;
        self.ib1 = last_sq_tag;
    }

    /// Collapses the two snapshots into the older one after a rollback
    /// (spec §4.7 step 4: "copy backup2 into backup1"), so both snapshots
    /// reflect the now-restored architectural state.
    pub fn collapse_after_rollback(&mut self) {
        self.backup1 = self.backup2;
    }

    #[cfg(test)]
    fn backup1(&self) -> &[RegEntry; NUM_REGISTERS] {
        &self.backup1
    }
}
