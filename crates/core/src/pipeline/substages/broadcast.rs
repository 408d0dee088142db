//! S1: broadcast arbitration over the scoreboard and result buses
//! (spec §4.3). Mode-independent.

use crate::instruction::InstState;
use crate::pipeline::bus::BusGrant;
use crate::pipeline::engine::Engine;
use crate::pipeline::function_units::ScoreboardEntry;
use crate::sim::log::Operation;

/// Sorts the scoreboard by `(fired_cycle, inst_tag)` ascending, then grants
/// a free bus to each entry in order until buses or entries run out.
/// Only bus-granted entries transition `FIRED -> EXECUTED` this cycle (at
/// most `R` of them, per invariant 3); entries that miss a bus stay
/// `FIRED` and untouched on the scoreboard, awaiting a later cycle's
/// arbitration.
pub fn run(engine: &mut Engine) {
    let cycle = engine.cycle;
    engine.buses.clear();
    engine.sb.sort_for_arbitration();

    let mut deferred: Vec<ScoreboardEntry> = Vec::new();
    while let Some(entry) = pop_front(engine) {
        if engine.buses.has_free_slot() {
            // An instruction with no destination register carries
            // `dest_tag = None` (the spec's "∞"): it still occupies and
            // frees a bus slot, but can never match a real register's tag.
            let dest_tag = engine
                .inst(entry.inst_tag)
                .dest_tag
                .unwrap_or(crate::pipeline::engine::NO_TAG);
            engine.buses.grant(BusGrant {
                inst_tag: entry.inst_tag,
                dest_tag,
            });
            engine.fu.release(entry.fu);
            engine.log.push(cycle, Operation::Broadcasted, entry.inst_tag);
            let inst = engine.inst_mut(entry.inst_tag);
            if inst.state == InstState::Fired {
                inst.state = InstState::Executed;
                inst.exec = Some(cycle);
                engine.log.push(cycle, Operation::Executed, entry.inst_tag);
            }
        } else {
            deferred.push(entry);
        }
    }
    for entry in deferred {
        engine.sb.push(entry);
    }

    // EXECUTED entries whose inst_tag was just granted a bus advance to
    // COMPLETED.
    let tags: Vec<_> = engine.sq.iter().collect();
    for tag in tags {
        let inst = engine.inst(tag);
        if inst.state == InstState::Executed
            && engine.buses.iter().any(|g| g.inst_tag == tag)
        {
            engine.inst_mut(tag).state = InstState::Completed;
        }
    }

    // Register-file update: each bus wakes the register whose current tag
    // matches its dest_tag (stops after the first match, per
    // `RegisterFile::mark_ready_by_tag`).
    let grants: Vec<_> = engine.buses.iter().collect();
    for grant in grants {
        engine.register_file.mark_ready_by_tag(grant.dest_tag);
    }
}

fn pop_front(engine: &mut Engine) -> Option<ScoreboardEntry> {
    let tag = engine.sb.iter().next()?.inst_tag;
    engine.sb.remove(tag)
}
