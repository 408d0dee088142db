//! Tomasulo-style out-of-order processor simulator.
//!
//! 1. **Common:** Rename-tag and instruction-tag newtypes, invariant-
//!    violation error type.
//! 2. **Config:** Run parameters (R, K0..K2, F, E, mode, checkpoint
//!    interval).
//! 3. **Instruction:** The per-instruction record and its lifecycle
//!    states.
//! 4. **Register file:** The 128-entry architectural register file.
//! 5. **Trace:** The external trace-source interface and its adapters.
//! 6. **Pipeline:** The seven-substage engine, scheduling infrastructure,
//!    and the two recovery schemes (ROB, CPR).
//! 7. **Sim:** The top-level driver, cycle log, and timing report.
//! 8. **Stats:** End-of-run statistics.

/// Rename-tag/instruction-tag newtypes and the invariant-violation error
/// type.
pub mod common;
/// Run parameters and their defaults.
pub mod config;
/// The per-instruction record and lifecycle state.
pub mod instruction;
/// The seven-substage pipeline engine and its recovery schemes.
pub mod pipeline;
/// The 128-entry architectural register file.
pub mod register_file;
/// Top-level simulation driver, cycle log, and timing report.
pub mod sim;
/// End-of-run statistics collection.
pub mod stats;
/// The external trace-source interface and its adapters.
pub mod trace;

/// Root configuration type.
pub use crate::config::SimConfig;
/// Top-level simulator.
pub use crate::sim::Simulator;
