//! S3: result-bus wakeup snoop (spec §4.4). Mode-independent.
//!
//! Runs after S2 this same cycle, so a broadcast in cycle *t* cannot cause
//! a fire in cycle *t* — wakeups only take effect starting cycle *t*+1,
//! modeling the latch between write-back and wakeup.

use crate::instruction::InstState;
use crate::pipeline::engine::Engine;

/// For every bus grant and every `DISPATCHED` SQ entry, marks a source
/// ready if its producer tag matches the bus's `dest_tag`.
pub fn run(engine: &mut Engine) {
    let grants: Vec<_> = engine.buses.iter().collect();
    if grants.is_empty() {
        return;
    }
    let tags: Vec<_> = engine.sq.iter().collect();
    for tag in tags {
        let inst = engine.inst_mut(tag);
        if inst.state != InstState::Dispatched {
            continue;
        }
        for k in 0..2 {
            if let Some(src_tag) = inst.src_tag[k] {
                if grants.iter().any(|g| g.dest_tag == src_tag) {
                    inst.src_ready[k] = true;
                }
            }
        }
    }
}
