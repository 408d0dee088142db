//! Shared test infrastructure: trace-building helpers and a small fluent
//! harness around [`Simulator`], mirroring the donor's `TestContext`
//! convention of building fixtures in code rather than loading files.

use tomasulo_core::config::{Mode, SimConfig};
use tomasulo_core::sim::timing::TimingRow;
use tomasulo_core::trace::{RawInstr, VecTraceSource};
use tomasulo_core::Simulator;

/// Builds a class-`class` instruction with the given destination/source
/// architectural registers. `-1`-style "no register" is spelled `None`
/// here since the trace boundary has already done that translation.
pub fn instr(class: i32, dest: Option<usize>, src: [Option<usize>; 2]) -> RawInstr {
    RawInstr {
        instruction_address: 0,
        op_code: class,
        dest_reg: dest,
        src_reg: src,
    }
}

/// Fluent builder around [`SimConfig`] plus a trace, running to completion
/// on [`TestRun::run`].
pub struct TestRun {
    config: SimConfig,
    trace: Vec<RawInstr>,
}

impl TestRun {
    /// Starts from the default configuration.
    pub fn new() -> Self {
        Self {
            config: SimConfig::default(),
            trace: Vec::new(),
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn result_buses(mut self, n: usize) -> Self {
        self.config.result_buses = n;
        self
    }

    pub fn fu_capacity(mut self, k: [usize; 3]) -> Self {
        self.config.fu_capacity = k;
        self
    }

    pub fn fetch_width(mut self, f: usize) -> Self {
        self.config.fetch_width = f;
        self
    }

    pub fn exception_period(mut self, e: u64) -> Self {
        self.config.exception_period = e;
        self
    }

    pub fn checkpoint_interval(mut self, n: u64) -> Self {
        self.config.checkpoint_interval = n;
        self
    }

    pub fn trace(mut self, instructions: impl IntoIterator<Item = RawInstr>) -> Self {
        self.trace.extend(instructions);
        self
    }

    /// Builds the simulator and runs it to completion.
    pub fn run(self) -> Simulator {
        let trace = VecTraceSource::new(self.trace);
        let mut sim = Simulator::new(self.config, Box::new(trace));
        sim.run();
        sim
    }
}

impl Default for TestRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Looks up the timing row for 1-based program-order tag `tag`.
pub fn row(rows: &[TimingRow], tag: u64) -> TimingRow {
    rows.iter()
        .copied()
        .find(|r| r.inst_tag == tag)
        .unwrap_or_else(|| panic!("no timing row for tag {tag}"))
}
