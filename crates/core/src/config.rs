//! Configuration for the Tomasulo simulator.
//!
//! Defines the run parameters named in the processor-parameters table: result
//! bus count, per-class function-unit capacity, fetch width, exception
//! period, recovery mode, and the checkpoint interval. Configuration is
//! supplied via JSON (`SimConfig` derives [`serde::Deserialize`]) or via
//! `SimConfig::default()` for quick CLI use, mirroring the donor's
//! `Config`/`serde::Deserialize` + defaults-module convention.

use serde::Deserialize;

/// Default configuration constants, taken from the original implementation's
/// `DEFAULT_*` macros.
mod defaults {
    /// Default result bus count (R).
    pub const RESULT_BUSES: usize = 2;

    /// Default function-unit capacities (K0, K1, K2).
    pub const FU_CAPACITY: [usize; 3] = [3, 2, 1];

    /// Default fetch width (F).
    pub const FETCH_WIDTH: usize = 4;

    /// Default exception period (E). Every E-th fetched instruction raises
    /// an exception in ROB/CPR mode; 0 disables.
    pub const EXCEPTION_PERIOD: u64 = 250;

    /// Default first-checkpoint threshold for CPR mode (the `20` literal
    /// from the original source, made configurable per the spec's open
    /// question).
    pub const CHECKPOINT_INTERVAL: u64 = 20;

    /// First tag handed out by the rename-tag allocator — one past the last
    /// architectural register index.
    pub const FIRST_RENAME_TAG: u64 = 128;
}

/// Recovery-scheme selector (the parameter `S` in the spec).
///
/// Folding the three-way mode selector into a single enum (rather than a
/// raw integer with three duplicated code paths) is itself a design
/// decision carried over from the re-architecture notes: substages S1–S3
/// are mode-independent, while S0/S4/S5/S6 dispatch on this enum via a
/// tagged match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Mode {
    /// No recovery mechanism; completed instructions retire whenever ready.
    #[default]
    Baseline,
    /// Reorder buffer: retires strictly in program order, flushes to head
    /// on exception.
    Rob,
    /// Checkpoint repair: periodic register-map snapshots, rolls back to
    /// the most recent fully-retired checkpoint on exception.
    Cpr,
}

/// Root configuration for a simulation run.
///
/// # Examples
///
/// ```
/// use tomasulo_core::config::{Mode, SimConfig};
///
/// let config = SimConfig::default();
/// assert_eq!(config.result_buses, 2);
/// assert_eq!(config.fu_capacity, [3, 2, 1]);
/// assert_eq!(config.mode, Mode::Baseline);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use tomasulo_core::config::{Mode, SimConfig};
///
/// let json = r#"{
///     "result_buses": 1,
///     "fu_capacity": [1, 1, 1],
///     "fetch_width": 1,
///     "exception_period": 0,
///     "mode": "Rob",
///     "checkpoint_interval": 20
/// }"#;
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.mode, Mode::Rob);
/// assert_eq!(config.fetch_width, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimConfig {
    /// Number of result (CDB) buses, R. Must be >= 1.
    #[serde(default = "SimConfig::default_result_buses")]
    pub result_buses: usize,

    /// Per-class function-unit capacity, K0..K2. Each entry must be >= 1.
    #[serde(default = "SimConfig::default_fu_capacity")]
    pub fu_capacity: [usize; 3],

    /// Fetch width, F. Must be >= 1.
    #[serde(default = "SimConfig::default_fetch_width")]
    pub fetch_width: usize,

    /// Exception period, E. Every E-th fetched instruction raises an
    /// exception in ROB/CPR mode. 0 disables exceptions entirely.
    #[serde(default = "SimConfig::default_exception_period")]
    pub exception_period: u64,

    /// Recovery scheme selector, S.
    #[serde(default)]
    pub mode: Mode,

    /// First-checkpoint threshold for CPR mode (the `ib1` initial value).
    #[serde(default = "SimConfig::default_checkpoint_interval")]
    pub checkpoint_interval: u64,
}

impl SimConfig {
    fn default_result_buses() -> usize {
        defaults::RESULT_BUSES
    }

    fn default_fu_capacity() -> [usize; 3] {
        defaults::FU_CAPACITY
    }

    fn default_fetch_width() -> usize {
        defaults::FETCH_WIDTH
    }

    fn default_exception_period() -> u64 {
        defaults::EXCEPTION_PERIOD
    }

    fn default_checkpoint_interval() -> u64 {
        defaults::CHECKPOINT_INTERVAL
    }

    /// Returns the first tag handed out by the rename-tag allocator.
    pub const fn first_rename_tag() -> u64 {
        defaults::FIRST_RENAME_TAG
    }

    /// Scheduling-queue capacity, `2*(K0+K1+K2)`, as specified.
    pub fn scheduling_queue_capacity(&self) -> usize {
        2 * self.fu_capacity.iter().sum::<usize>()
    }

    /// Validates the configuration, panicking with a descriptive message if
    /// any parameter is out of range. Intended to be called once at
    /// startup, not in the hot cycle loop.
    pub fn validate(&self) {
        assert!(self.result_buses >= 1, "result_buses (R) must be >= 1");
        assert!(
            self.fu_capacity.iter().all(|&k| k >= 1),
            "fu_capacity (K0..K2) entries must each be >= 1"
        );
        assert!(self.fetch_width >= 1, "fetch_width (F) must be >= 1");
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            result_buses: defaults::RESULT_BUSES,
            fu_capacity: defaults::FU_CAPACITY,
            fetch_width: defaults::FETCH_WIDTH,
            exception_period: defaults::EXCEPTION_PERIOD,
            mode: Mode::default(),
            checkpoint_interval: defaults::CHECKPOINT_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_source_constants() {
        let config = SimConfig::default();
        assert_eq!(config.result_buses, 2);
        assert_eq!(config.fu_capacity, [3, 2, 1]);
        assert_eq!(config.fetch_width, 4);
        assert_eq!(config.exception_period, 250);
        assert_eq!(config.mode, Mode::Baseline);
        assert_eq!(config.checkpoint_interval, 20);
    }

    #[test]
    fn scheduling_queue_capacity_is_double_total_fu_capacity() {
        let mut config = SimConfig::default();
        config.fu_capacity = [1, 1, 1];
        assert_eq!(config.scheduling_queue_capacity(), 6);
    }

    #[test]
    #[should_panic(expected = "result_buses")]
    fn validate_rejects_zero_result_buses() {
        let mut config = SimConfig::default();
        config.result_buses = 0;
        config.validate();
    }
}
