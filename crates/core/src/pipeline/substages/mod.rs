//! The seven per-cycle substages, run in the fixed order S0..S6 (spec §2).
//!
//! S1–S3 are identical across all three modes; S0, S4, S5, S6 dispatch on
//! [`crate::config::Mode`] via a tagged match inside each module, rather
//! than three separate code paths (spec §9 redesign note).

/// S0: retire/commit, and recovery trigger detection.
pub mod retire;
/// S1: broadcast arbitration over the scoreboard and result buses.
pub mod broadcast;
/// S2: fire eligible scheduling-queue entries to function units.
pub mod fire;
/// S3: result-bus wakeup snoop.
pub mod wake;
/// S4: dispatch queue to scheduling queue, with rename.
pub mod dispatch;
/// S5: reclaim retired entries.
pub mod reclaim;
/// S6: fetch (or recovery re-fetch).
pub mod fetch;
