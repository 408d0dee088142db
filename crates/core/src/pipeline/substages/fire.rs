//! S2: select eligible scheduling-queue entries and issue them to function
//! units (spec §4.2). Mode-independent.

use crate::instruction::InstState;
use crate::pipeline::engine::Engine;
use crate::pipeline::function_units::ScoreboardEntry;
use crate::sim::log::Operation;

/// Scans the SQ in program order; an entry fires if both sources are
/// ready, it is still `DISPATCHED`, and its function-unit class has a
/// free slot. Firing is greedy and single-pass: program order breaks ties
/// for FU contention.
pub fn run(engine: &mut Engine) {
    let cycle = engine.cycle;
    let tags: Vec<_> = engine.sq.iter().collect();
    for tag in tags {
        let inst = engine.inst(tag);
        if inst.state != InstState::Dispatched || !inst.sources_ready() {
            continue;
        }
        let fu = inst.fu;
        if !engine.fu.has_free_slot(fu) {
            continue;
        }
        engine.fu.occupy(fu);
        engine.sb.push(ScoreboardEntry {
            inst_tag: tag,
            fu,
            fired_cycle: cycle,
        });
        let inst = engine.inst_mut(tag);
        inst.state = InstState::Fired;
        inst.fired_cycle = Some(cycle);
        inst.sched = Some(cycle);
        engine.stats.fired_total += 1;
        engine.log.push(cycle, Operation::Scheduled, tag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tag::InstTag;
    use crate::config::{Mode, SimConfig};
    use crate::trace::VecTraceSource;

    fn engine_with(fu_capacity: [usize; 3]) -> Engine {
        let config = SimConfig {
            fu_capacity,
            ..SimConfig::default()
        };
        Engine::new(config, Mode::Baseline, Box::new(VecTraceSource::new([])))
    }

    #[test]
    fn fires_ready_entry_with_free_fu() {
        let mut engine = engine_with([1, 1, 1]);
        let mut inst = crate::instruction::Instruction::new_fetched(InstTag(1), 0, None, [None, None]);
        inst.state = InstState::Dispatched;
        inst.src_ready = [true, true];
        engine.instructions.push(inst);
        engine.sq.insert(InstTag(1));

        run(&mut engine);

        assert_eq!(engine.inst(InstTag(1)).state, InstState::Fired);
        assert_eq!(engine.fu.busy_count(0), 1);
        assert_eq!(engine.sb.len(), 1);
    }

    #[test]
    fn does_not_fire_when_fu_is_full() {
        let mut engine = engine_with([1, 1, 1]);
        engine.fu.occupy(0);
        let mut inst = crate::instruction::Instruction::new_fetched(InstTag(1), 0, None, [None, None]);
        inst.state = InstState::Dispatched;
        inst.src_ready = [true, true];
        engine.instructions.push(inst);
        engine.sq.insert(InstTag(1));

        run(&mut engine);

        assert_eq!(engine.inst(InstTag(1)).state, InstState::Dispatched);
        assert_eq!(engine.sb.len(), 0);
    }
}
