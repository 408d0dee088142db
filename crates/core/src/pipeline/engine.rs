//! The engine: owns every piece of per-run pipeline state and drives one
//! cycle at a time via [`Engine::tick`].
//!
//! Per the redesign notes (spec §9: "Encapsulate in a single engine value;
//! per-run state carries all counters. No process-wide statics"), every
//! piece of mutable simulation state — queues, register file, tag
//! allocator, cycle counter, statistics — is an owned field here rather
//! than scattered globals.

use crate::common::tag::{InstTag, Tag, TagAllocator};
use crate::config::{Mode, SimConfig};
use crate::instruction::{InstState, Instruction};
use crate::pipeline::bus::ResultBuses;
use crate::pipeline::checkpoint::Checkpoint;
use crate::pipeline::dispatch_queue::DispatchQueue;
use crate::pipeline::function_units::{FunctionUnits, Scoreboard};
use crate::pipeline::rob::Rob;
use crate::pipeline::scheduling_queue::SchedulingQueue;
use crate::pipeline::substages;
use crate::register_file::RegisterFile;
use crate::sim::log::EventLog;
use crate::stats::{SimStats, StatsAccumulator};
use crate::trace::TraceSource;

/// Owns all pipeline state for one simulation run.
pub struct Engine {
    pub(crate) config: SimConfig,
    pub(crate) mode: Mode,
    pub(crate) trace: Box<dyn TraceSource>,

    /// Master program-order sequence; index `i` holds the instruction with
    /// `inst_tag = i + 1`. Never reordered (spec §3).
    pub(crate) instructions: Vec<Instruction>,

    pub(crate) register_file: RegisterFile,
    pub(crate) tag_alloc: TagAllocator,

    pub(crate) dq: DispatchQueue,
    pub(crate) sq: SchedulingQueue,
    pub(crate) sb: Scoreboard,
    pub(crate) fu: FunctionUnits,
    pub(crate) buses: ResultBuses,

    pub(crate) rob: Rob,
    pub(crate) checkpoint: Option<Checkpoint>,

    pub(crate) cycle: u64,
    /// Next tag S6 will assign to a freshly fetched instruction.
    pub(crate) next_fetch_tag: u64,
    /// Re-fetch cursor: while `trailing_tag < next_fetch_tag`, S6 re-reads
    /// `instructions[trailing_tag - 1]` instead of pulling from the trace
    /// (spec §9 redesign note: an index replaces the original list
    /// iterator).
    pub(crate) trailing_tag: u64,

    pub(crate) stats: StatsAccumulator,
    pub(crate) log: EventLog,
}

impl Engine {
    /// Builds a new engine for `config` and `mode`, reading instructions
    /// from `trace`.
    pub fn new(config: SimConfig, mode: Mode, trace: Box<dyn TraceSource>) -> Self {
        config.validate();
        let register_file = RegisterFile::new();
        let checkpoint = mode
            .has_checkpoint()
            .then(|| Checkpoint::new(&register_file, config.checkpoint_interval));
        let sq_capacity = config.scheduling_queue_capacity();
        let fu_capacity = config.fu_capacity;
        let result_buses = config.result_buses;
        let first_tag = SimConfig::first_rename_tag();

        Self {
            mode,
            trace,
            instructions: Vec::new(),
            register_file,
            tag_alloc: TagAllocator::new(first_tag),
            dq: DispatchQueue::new(),
            sq: SchedulingQueue::new(sq_capacity),
            sb: Scoreboard::new(),
            fu: FunctionUnits::new(fu_capacity),
            buses: ResultBuses::new(result_buses),
            rob: Rob::new(),
            checkpoint,
            cycle: 1,
            next_fetch_tag: 1,
            trailing_tag: 1,
            stats: StatsAccumulator::new(),
            log: EventLog::new(),
            config,
        }
    }

    /// Runs one full cycle. A recovery-triggering cycle skips S1–S6 (spec
    /// §9: "the recovery cycle is a bubble").
    pub fn tick(&mut self) {
        let recovered = substages::retire::run(self);
        if recovered {
            self.dq.sample_size();
            self.cycle += 1;
            return;
        }
        substages::broadcast::run(self);
        substages::fire::run(self);
        substages::wake::run(self);
        substages::dispatch::run(self);
        substages::reclaim::run(self);
        substages::fetch::run(self);
    }

    /// Runs the engine to completion.
    ///
    /// `is_done` is vacuously true before anything has been fetched (an
    /// empty dispatch/scheduling queue with `trailing_tag == next_fetch_tag
    /// == 1` looks identical to a fully-drained run), so this always ticks
    /// at least once before checking, mirroring [`Engine::tick`]'s own
    /// read-then-check order in [`crate::sim::simulator::Simulator::step`].
    pub fn run_to_completion(&mut self) {
        loop {
            self.tick();
            if self.is_done() {
                break;
            }
        }
    }

    /// The mode-specific termination predicate (spec §5).
    ///
    /// ROB/CPR mode must also check that no re-fetch is pending
    /// (`trailing_tag == next_fetch_tag`): a recovery clears `dq`/`sq` the
    /// same cycle it sets `trailing_tag` behind `next_fetch_tag`, and
    /// those flushed instructions haven't actually retired yet even
    /// though the queues are momentarily empty.
    pub fn is_done(&self) -> bool {
        match self.mode {
            Mode::Baseline => self.next_fetch_tag - 1 == self.stats.retired_total,
            Mode::Rob | Mode::Cpr => {
                self.dq.is_empty() && self.sq.is_empty() && self.trailing_tag == self.next_fetch_tag
            }
        }
    }

    /// Instruction accessor by program-order tag (1-based).
    pub(crate) fn inst(&self, tag: InstTag) -> &Instruction {
        &self.instructions[(tag.0 - 1) as usize]
    }

    /// Mutable instruction accessor by program-order tag (1-based).
    pub(crate) fn inst_mut(&mut self, tag: InstTag) -> &mut Instruction {
        &mut self.instructions[(tag.0 - 1) as usize]
    }

    /// Finalizes statistics at run's end. `self.cycle` always points one
    /// past the last cycle actually processed (S6 advances it
    /// unconditionally), so the reported count is `self.cycle - 1`.
    pub fn stats(&self) -> SimStats {
        self.stats.finalize(
            self.cycle.saturating_sub(1),
            self.dq.max_size(),
            self.dq.cumulative_size(),
            self.mode == Mode::Baseline,
        )
    }

    /// The instruction sequence in program order, for the timing report.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The accumulated event log.
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// The cycle counter, for diagnostics and tests.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The configured recovery mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// A sentinel "no tag" value used only for logging rows that have no
/// single instruction subject; never used for rename matching.
pub(crate) const NO_TAG: Tag = Tag(u64::MAX);
