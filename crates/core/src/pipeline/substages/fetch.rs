//! S6: fetch up to `F` instructions, or re-fetch during recovery
//! (spec §4.8). Increments the cycle counter at the end, per spec.

use crate::common::tag::InstTag;
use crate::instruction::Instruction;
use crate::pipeline::engine::Engine;
use crate::sim::log::Operation;

/// Attempts to fetch `config.fetch_width` instructions this cycle, then
/// advances the cycle counter.
pub fn run(engine: &mut Engine) {
    let cycle = engine.cycle;
    for _ in 0..engine.config.fetch_width {
        if engine.trailing_tag < engine.next_fetch_tag {
            refetch_one(engine, cycle);
        } else if !fetch_fresh_one(engine, cycle) {
            break;
        }
    }
    engine.dq.sample_size();
    engine.cycle += 1;
}

fn refetch_one(engine: &mut Engine, cycle: u64) {
    let tag = InstTag(engine.trailing_tag);
    let inst = engine.inst_mut(tag);
    inst.refetch();
    inst.fetch = Some(cycle);
    engine.dq.push(tag);
    engine.log.push(cycle, Operation::RefFetched, tag);
    engine.trailing_tag += 1;
}

/// Returns `false` if the trace is exhausted (S6 yields without enqueuing).
fn fetch_fresh_one(engine: &mut Engine, cycle: u64) -> bool {
    let Some(raw) = engine.trace.next() else {
        return false;
    };
    let tag = InstTag(engine.next_fetch_tag);
    engine.next_fetch_tag += 1;
    // Keep the re-fetch cursor in lockstep with normal fetching: it only
    // diverges from `next_fetch_tag` when a recovery sets it backward.
    engine.trailing_tag = engine.next_fetch_tag;

    let mut inst = Instruction::new_fetched(tag, raw.op_code, raw.dest_reg, raw.src_reg);
    inst.fetch = Some(cycle);
    inst.exception = engine.mode.has_recovery()
        && engine.config.exception_period != 0
        && tag.0 % engine.config.exception_period == 0;

    engine.instructions.push(inst);
    engine.dq.push(tag);
    engine.log.push(cycle, Operation::Fetched, tag);
    true
}
