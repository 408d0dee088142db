//! The human-readable cycle log: a TSV stream of per-event rows.
//!
//! Out of scope as a subsystem (spec §1), but specified down to its exact
//! header and operation vocabulary (spec §6), so it is implemented here as
//! a thin, mechanical writer fed by the substages.

use std::io::{self, Write};

use crate::common::tag::InstTag;

/// One operation the engine logs against a cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// S6 fetched a fresh instruction.
    Fetched,
    /// S6 re-fetched a previously-discarded instruction during recovery.
    RefFetched,
    /// S4 renamed and placed an instruction into the scheduling queue.
    Dispatched,
    /// S2 fired an instruction onto a function unit.
    Scheduled,
    /// S1 advanced an instruction FIRED → EXECUTED.
    Executed,
    /// S1 granted a result bus to an instruction.
    Broadcasted,
    /// S0 retired an instruction.
    StateUpdate,
    /// S0 detected a synthetic exception and triggered recovery.
    Exception,
    /// CPR checkpoint window advanced. Names the pre-advance barriers, not
    /// the post-advance ones: `old_tag` is the successor of the barrier
    /// `backup2` used to point at (`ib2 + 1`, or `1` when `ib2` was still at
    /// tag 0), `new_tag` is the barrier `backup1` (and `ib1`) used to point
    /// at before this advance — which is exactly what `backup2`/`ib2` take
    /// on now.
    Backup2ToNew {
        /// Successor of the outgoing `ib2` barrier.
        old_tag: InstTag,
        /// The outgoing `ib1` barrier, now the new `ib2`.
        new_tag: InstTag,
    },
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Fetched => write!(f, "FETCHED"),
            Operation::RefFetched => write!(f, "RE-FETCHED"),
            Operation::Dispatched => write!(f, "DISPATCHED"),
            Operation::Scheduled => write!(f, "SCHEDULED"),
            Operation::Executed => write!(f, "EXECUTED"),
            Operation::Broadcasted => write!(f, "BROADCASTED"),
            Operation::StateUpdate => write!(f, "STATE UPDATE"),
            Operation::Exception => write!(f, "EXCEPTION"),
            Operation::Backup2ToNew { old_tag, new_tag } => {
                write!(f, "BACKUP2 {old_tag} TO {new_tag}")
            }
        }
    }
}

/// One logged event: the cycle it occurred in, the operation, and the
/// instruction tag it concerns (`Tag(0)` for events with no single
/// instruction subject, e.g. a checkpoint advance keyed on the barrier).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Cycle the event occurred in.
    pub cycle: u64,
    /// What happened.
    pub operation: Operation,
    /// Which instruction it concerns.
    pub inst_tag: InstTag,
}

/// In-memory accumulator of log entries, drained to a writer at run's end
/// (or incrementally, if the caller prefers).
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one event.
    pub fn push(&mut self, cycle: u64, operation: Operation, inst_tag: InstTag) {
        self.entries.push(LogEntry {
            cycle,
            operation,
            inst_tag,
        });
    }

    /// Writes the TSV log: header followed by one row per event, in the
    /// order they were recorded.
    pub fn write_tsv<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "CYCLE\tOPERATION\tINSTRUCTION")?;
        for entry in &self.entries {
            writeln!(out, "{}\t{}\t{}", entry.cycle, entry.operation, entry.inst_tag)?;
        }
        Ok(())
    }

    /// Number of events recorded, for tests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates recorded entries, for tests.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_tsv_emits_header_then_rows_in_order() {
        let mut log = EventLog::new();
        log.push(1, Operation::Fetched, InstTag(1));
        log.push(2, Operation::Dispatched, InstTag(1));
        let mut buf = Vec::new();
        log.write_tsv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("CYCLE\tOPERATION\tINSTRUCTION"));
        assert_eq!(lines.next(), Some("1\tFETCHED\t1"));
        assert_eq!(lines.next(), Some("2\tDISPATCHED\t1"));
    }

    #[test]
    fn backup2_operation_formats_both_tags() {
        let op = Operation::Backup2ToNew {
            old_tag: InstTag(0),
            new_tag: InstTag(20),
        };
        assert_eq!(op.to_string(), "BACKUP2 0 TO 20");
    }
}
