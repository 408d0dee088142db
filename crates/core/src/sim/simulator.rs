//! Top-level simulation driver.

use crate::config::{Mode, SimConfig};
use crate::pipeline::Engine;
use crate::sim::log::EventLog;
use crate::sim::timing::{self, TimingRow};
use crate::stats::SimStats;
use crate::trace::TraceSource;

/// Owns the engine and drives it to completion, assembling the end-of-run
/// reports (spec §6: statistics record and per-instruction timing table).
pub struct Simulator {
    engine: Engine,
}

impl Simulator {
    /// Builds a simulator for `config` reading from `trace`.
    pub fn new(config: SimConfig, trace: Box<dyn TraceSource>) -> Self {
        let mode = config.mode;
        Self {
            engine: Engine::new(config, mode, trace),
        }
    }

    /// Runs to completion, per the mode-specific termination predicate
    /// (spec §5).
    pub fn run(&mut self) {
        self.engine.run_to_completion();
    }

    /// Runs exactly one cycle; returns whether the engine has since
    /// reached its termination predicate.
    pub fn step(&mut self) -> bool {
        self.engine.tick();
        self.engine.is_done()
    }

    /// The final statistics record.
    pub fn stats(&self) -> SimStats {
        self.engine.stats()
    }

    /// The per-instruction timing report, in program order.
    pub fn timing_report(&self) -> Vec<TimingRow> {
        timing::build_report(self.engine.instructions())
    }

    /// The accumulated cycle event log.
    pub fn log(&self) -> &EventLog {
        self.engine.log()
    }

    /// The configured recovery mode, for callers assembling output.
    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }
}
