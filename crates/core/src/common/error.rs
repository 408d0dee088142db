//! Invariant-violation errors.
//!
//! Synthetic exceptions and end-of-trace are ordinary control flow, never
//! an [`EngineBug`]. This type exists only for violated hardware
//! invariants, which have no defined runtime recovery and are always a bug
//! in the engine itself.

/// A violated engine invariant. Always fatal — callers are expected to
/// `panic!` with this, never to attempt recovery.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineBug {
    /// The scheduling queue exceeded its capacity of `2*(K0+K1+K2)`.
    #[error("scheduling queue overflow: {len} entries, capacity {capacity}")]
    SchedulingQueueOverflow {
        /// Observed length at the time of the violation.
        len: usize,
        /// Configured capacity.
        capacity: usize,
    },
}
