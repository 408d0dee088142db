//! S4: dispatch queue to scheduling queue, with register rename
//! (spec §4.1, §4.9).

use crate::common::tag::InstTag;
use crate::instruction::InstState;
use crate::pipeline::engine::Engine;
use crate::pipeline::rob::RobEntry;
use crate::sim::log::Operation;

/// While the DQ is non-empty and the SQ has room: pops the DQ head, renames
/// its sources and destination against the register file, and pushes it
/// into the SQ (and, in ROB mode, the ROB). Afterwards, sweeps all
/// `DISPATCHED` entries once more to catch sources that became ready
/// during this same cycle's S1 (the "re-read pass").
pub fn run(engine: &mut Engine) {
    let cycle = engine.cycle;
    while !engine.dq.is_empty() && engine.sq.has_room() {
        let tag = engine.dq.pop().expect("checked non-empty above");
        rename(engine, tag, cycle);
        engine.sq.insert(tag);
        engine.log.push(cycle, Operation::Dispatched, tag);
        if engine.mode.has_rob() {
            let dest_reg = engine.inst(tag).dest_reg;
            engine.rob.insert(RobEntry {
                inst_tag: tag,
                dest_reg,
            });
        }
    }
    re_read_pass(engine);
}

fn rename(engine: &mut Engine, tag: InstTag, cycle: u64) {
    let (src_reg, dest_reg) = {
        let inst = engine.inst(tag);
        (inst.src_reg, inst.dest_reg)
    };

    for k in 0..2 {
        match src_reg[k] {
            None => {
                engine.inst_mut(tag).src_ready[k] = true;
            }
            Some(reg) => {
                // Spec §4.9: both counters are incremented "for accounting
                // only" on every rename lookup, independent of whether the
                // source turns out ready — the actual source tag always
                // comes from the register file regardless of which bucket
                // this lookup falls in.
                if engine.mode.has_rob() && engine.rob.find_younger_producer(reg, tag).is_some() {
                    engine.stats.rob_hit_count += 1;
                } else {
                    engine.stats.reg_file_hit_count += 1;
                }

                let entry = engine.register_file.entry(reg);
                if entry.ready {
                    engine.inst_mut(tag).src_ready[k] = true;
                } else {
                    engine.inst_mut(tag).src_tag[k] = Some(entry.tag);
                    engine.inst_mut(tag).src_ready[k] = false;
                }
            }
        }
    }

    if let Some(reg) = dest_reg {
        let fresh = engine.tag_alloc.alloc();
        engine.register_file.set(reg, fresh, false);
        engine.inst_mut(tag).dest_tag = Some(fresh);
    }

    let inst = engine.inst_mut(tag);
    inst.state = InstState::Dispatched;
    inst.disp = Some(cycle);
}

/// Spec §4.1: "After all dispatches in S4, the scheduling queue is swept
/// once: for every DISPATCHED entry with a non-ready source, if the
/// register-file entry's current tag still equals the recorded producer
/// tag and the entry is now ready, the source becomes ready."
fn re_read_pass(engine: &mut Engine) {
    let tags: Vec<_> = engine.sq.iter().collect();
    for tag in tags {
        let inst = engine.inst(tag);
        if inst.state != InstState::Dispatched {
            continue;
        }
        let src_reg = inst.src_reg;
        let src_tag = inst.src_tag;
        let src_ready = inst.src_ready;
        for k in 0..2 {
            if src_ready[k] {
                continue;
            }
            let (Some(reg), Some(producer)) = (src_reg[k], src_tag[k]) else {
                continue;
            };
            let entry = engine.register_file.entry(reg);
            if entry.tag == producer && entry.ready {
                engine.inst_mut(tag).src_ready[k] = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tag::Tag;
    use crate::config::{Mode, SimConfig};
    use crate::instruction::Instruction;
    use crate::trace::VecTraceSource;

    fn engine() -> Engine {
        Engine::new(
            SimConfig::default(),
            Mode::Baseline,
            Box::new(VecTraceSource::new([])),
        )
    }

    #[test]
    fn ready_source_marks_ready_and_counts_reg_hit() {
        let mut engine = engine();
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(1), 0, Some(1), [Some(2), None]));
        engine.dq.push(InstTag(1));

        run(&mut engine);

        assert!(engine.inst(InstTag(1)).src_ready[0]);
        assert_eq!(engine.stats.reg_file_hit_count, 1);
        assert_eq!(engine.sq.len(), 1);
    }

    #[test]
    fn unready_source_records_producer_tag() {
        let mut engine = engine();
        engine.register_file.set(2, Tag(900), false);
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(1), 0, Some(1), [Some(2), None]));
        engine.dq.push(InstTag(1));

        run(&mut engine);

        let inst = engine.inst(InstTag(1));
        assert!(!inst.src_ready[0]);
        assert_eq!(inst.src_tag[0], Some(Tag(900)));
    }

    #[test]
    fn rob_mode_counts_rob_hit_even_when_source_already_ready() {
        // The producer already broadcast (register-file entry is ready)
        // but its ROB entry hasn't been reclaimed yet — reclaim is S5,
        // strictly after this dispatch. Spec §4.9 buckets the lookup by
        // whether a ROB producer exists, not by readiness, so this must
        // still count as a ROB hit.
        let mut engine = Engine::new(
            SimConfig::default(),
            Mode::Rob,
            Box::new(VecTraceSource::new([])),
        );
        engine.rob.insert(crate::pipeline::rob::RobEntry {
            inst_tag: InstTag(1),
            dest_reg: Some(2),
        });
        engine.register_file.set(2, Tag(900), true);
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(1), 0, None, [None, None]));
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(2), 0, Some(5), [Some(2), None]));
        engine.dq.push(InstTag(2));

        run(&mut engine);

        assert_eq!(engine.stats.rob_hit_count, 1);
        assert_eq!(engine.stats.reg_file_hit_count, 0);
        assert!(engine.inst(InstTag(2)).src_ready[0]);
    }

    #[test]
    fn unready_source_with_no_rob_producer_still_counts_reg_hit() {
        // Baseline mode never populates a ROB, so every sourced register
        // must fall into the reg-hit bucket regardless of readiness.
        let mut engine = engine();
        engine.register_file.set(2, Tag(900), false);
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(1), 0, Some(1), [Some(2), None]));
        engine.dq.push(InstTag(1));

        run(&mut engine);

        assert_eq!(engine.stats.reg_file_hit_count, 1);
        assert_eq!(engine.stats.rob_hit_count, 0);
    }

    #[test]
    fn dest_register_gets_fresh_tag() {
        let mut engine = engine();
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(1), 0, Some(5), [None, None]));
        engine.dq.push(InstTag(1));

        run(&mut engine);

        let tag = engine.inst(InstTag(1)).dest_tag.unwrap();
        assert_eq!(engine.register_file.entry(5).tag, tag);
        assert!(!engine.register_file.entry(5).ready);
    }

    #[test]
    fn stops_when_sq_has_no_room() {
        let mut engine = Engine::new(
            SimConfig {
                fu_capacity: [1, 1, 1],
                ..SimConfig::default()
            },
            Mode::Baseline,
            Box::new(VecTraceSource::new([])),
        );
        // capacity = 2*(1+1+1) = 6; fill it externally.
        for i in 1..=6u64 {
            engine
                .instructions
                .push(Instruction::new_fetched(InstTag(i), 0, None, [None, None]));
            engine.sq.insert(InstTag(i));
        }
        engine
            .instructions
            .push(Instruction::new_fetched(InstTag(7), 0, None, [None, None]));
        engine.dq.push(InstTag(7));

        run(&mut engine);

        assert_eq!(engine.dq.len(), 1);
        assert_eq!(engine.inst(InstTag(7)).state, InstState::Fetched);
    }
}
