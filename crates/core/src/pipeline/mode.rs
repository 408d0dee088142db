//! The recovery-mode selector.
//!
//! Substages S1–S3 are mode-independent; S0, S4, S5, S6 dispatch on this
//! enum via a tagged match rather than the three duplicated code paths the
//! original implementation carried (spec §9 redesign notes: "Factor the
//! mode into a single enum parameter").

pub use crate::config::Mode;

impl Mode {
    /// Whether this mode models exceptions/recovery at all. Baseline never
    /// flags exceptions regardless of the configured period (spec §4.8:
    /// "CPR/ROB only").
    pub fn has_recovery(self) -> bool {
        !matches!(self, Mode::Baseline)
    }

    /// Whether this mode keeps a reorder buffer.
    pub fn has_rob(self) -> bool {
        matches!(self, Mode::Rob)
    }

    /// Whether this mode keeps register-file checkpoints.
    pub fn has_checkpoint(self) -> bool {
        matches!(self, Mode::Cpr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_baseline_lacks_recovery() {
        assert!(!Mode::Baseline.has_recovery());
        assert!(Mode::Rob.has_recovery());
        assert!(Mode::Cpr.has_recovery());
    }

    #[test]
    fn rob_and_cpr_are_mutually_exclusive_storage() {
        assert!(Mode::Rob.has_rob() && !Mode::Rob.has_checkpoint());
        assert!(Mode::Cpr.has_checkpoint() && !Mode::Cpr.has_rob());
        assert!(!Mode::Baseline.has_rob() && !Mode::Baseline.has_checkpoint());
    }
}
