//! S0: retire/commit, and recovery-trigger detection (spec §4.5, §4.6,
//! §4.7). The one substage whose mode dispatch can short-circuit the rest
//! of the cycle.

use crate::common::tag::InstTag;
use crate::config::Mode;
use crate::instruction::InstState;
use crate::pipeline::engine::Engine;
use crate::sim::log::Operation;

/// Runs S0 for the engine's configured mode. Returns `true` if a recovery
/// was triggered this cycle — callers must skip S1–S6 for the cycle in
/// that case (spec §9: "the recovery cycle is a bubble").
pub fn run(engine: &mut Engine) -> bool {
    match engine.mode {
        Mode::Baseline => {
            retire_baseline(engine);
            false
        }
        Mode::Rob => retire_rob(engine),
        Mode::Cpr => retire_cpr(engine),
    }
}

fn retire_baseline(engine: &mut Engine) {
    let cycle = engine.cycle;
    let tags: Vec<_> = engine.sq.iter().collect();
    for tag in tags {
        if engine.inst(tag).state == InstState::Completed {
            let inst = engine.inst_mut(tag);
            inst.state = InstState::Retired;
            inst.update = Some(cycle);
            engine.stats.retired_total += 1;
            engine.log.push(cycle, Operation::StateUpdate, tag);
        }
    }
}

fn retire_rob(engine: &mut Engine) -> bool {
    let cycle = engine.cycle;
    let entries: Vec<_> = engine.rob.iter().copied().collect();
    // Counts entries this same S0 pass has already retired before reaching
    // the excepting head, if any: original_source/checkpoint2/procsim.cpp's
    // `flushed_counter += (sq_size - retired)` excludes them, since they're
    // marked RETIRED even though S5 hasn't reclaimed them out of the SQ yet.
    let mut retired_this_cycle = 0u64;
    for entry in entries {
        let inst = engine.inst(entry.inst_tag);
        if inst.state != InstState::Completed {
            // First non-completed entry in program order: nothing past
            // this point may retire this cycle either.
            break;
        }
        if inst.exception {
            trigger_rob_recovery(engine, entry.inst_tag, retired_this_cycle);
            return true;
        }
        let inst = engine.inst_mut(entry.inst_tag);
        inst.state = InstState::Retired;
        inst.update = Some(cycle);
        engine.stats.retired_total += 1;
        retired_this_cycle += 1;
        engine.log.push(cycle, Operation::StateUpdate, entry.inst_tag);
        // Removal from the ROB happens in S5 (spec §4.10); S0 only marks
        // state here.
    }
    false
}

fn trigger_rob_recovery(engine: &mut Engine, exception_tag: InstTag, retired_this_cycle: u64) {
    let cycle = engine.cycle;
    // Clear the flag before flushing: re-fetch preserves everything but the
    // transient rename/state fields, and `exception` is not one of them, so
    // an unconsumed flag would retrigger recovery forever on retry.
    engine.inst_mut(exception_tag).exception = false;
    engine.stats.flushed_count += (engine.sq.len() as u64).saturating_sub(retired_this_cycle);
    engine.rob.clear();
    engine.dq.clear();
    engine.sq.clear();
    engine.sb.clear();
    engine.fu.reset();
    engine.buses.clear();
    engine.register_file.reinitialize(&mut engine.tag_alloc);
    engine.trailing_tag = exception_tag.0;
    engine.stats.exception_count += 1;
    engine.log.push(cycle, Operation::Exception, exception_tag);
}

fn retire_cpr(engine: &mut Engine) -> bool {
    let cycle = engine.cycle;
    let tags: Vec<_> = engine.sq.iter().collect();
    for tag in tags {
        if engine.inst(tag).state != InstState::Completed {
            continue;
        }
        if engine.inst(tag).exception {
            trigger_cpr_rollback(engine, tag);
            return true;
        }
        let inst = engine.inst_mut(tag);
        inst.state = InstState::Retired;
        inst.update = Some(cycle);
        engine.stats.retired_total += 1;
        engine.log.push(cycle, Operation::StateUpdate, tag);

        let ib1 = engine
            .checkpoint
            .as_ref()
            .expect("CPR mode always carries a checkpoint")
            .ib1();
        if all_retired_up_to(engine, ib1) {
            advance_checkpoint(engine);
        }
    }
    false
}

fn all_retired_up_to(engine: &Engine, tag: InstTag) -> bool {
    if tag.0 == 0 {
        return true;
    }
    let last = (tag.0 as usize).min(engine.instructions().len());
    engine.instructions()[..last]
        .iter()
        .all(|inst| inst.state == InstState::Retired)
}

fn advance_checkpoint(engine: &mut Engine) {
    let cycle = engine.cycle;
    // original_source/checkpoint2/procsim.cpp:928 sets `ib1 = sq.back()`,
    // the youngest entry still in the SQ — not the highest tag ever
    // fetched. They diverge whenever the dispatch queue is backlogged (SQ
    // was full when S4 last ran), so the retiring entry's own queue is the
    // source of truth here.
    let last_sq_tag = engine
        .sq
        .max_tag()
        .expect("the retiring entry is still in the SQ");
    let checkpoint_ref = engine
        .checkpoint
        .as_ref()
        .expect("CPR mode always carries a checkpoint");
    // Captured before `advance` overwrites them: the log line names the
    // pre-advance barriers (original_source/checkpoint2/procsim.cpp:916 —
    // `ib2 == nullptr ? 1 : ib2->inst_tag + 1` TO `ib1->inst_tag`, both read
    // before the `ib2 = ib1; ib1 = sq.back()` reassignment a few lines
    // later), not the post-advance ones.
    let old_ib1 = checkpoint_ref.ib1();
    let old_ib2 = checkpoint_ref.ib2();
    let register_file = engine.register_file.clone();
    let checkpoint = engine
        .checkpoint
        .as_mut()
        .expect("CPR mode always carries a checkpoint");
    checkpoint.advance(&register_file, last_sq_tag);
    engine.stats.backup_count += 1;
    engine.log.push(
        cycle,
        Operation::Backup2ToNew {
            old_tag: InstTag(old_ib2.0 + 1),
            new_tag: old_ib1,
        },
        last_sq_tag,
    );
}

fn trigger_cpr_rollback(engine: &mut Engine, exception_tag: InstTag) {
    let cycle = engine.cycle;
    // See `trigger_rob_recovery`: must consume the flag before rollback
    // discards the in-flight copy, or the re-fetched retry loops forever.
    engine.inst_mut(exception_tag).exception = false;
    // original_source/checkpoint2/procsim.cpp:852 uses `sq.back()->inst_tag`
    // for this subtraction too; see `advance_checkpoint` for why that's not
    // always `next_fetch_tag - 1`.
    let last_sq_tag = engine
        .sq
        .max_tag()
        .expect("the retiring entry is still in the SQ");
    let ib2 = engine
        .checkpoint
        .as_ref()
        .expect("CPR mode always carries a checkpoint")
        .ib2();
    engine.stats.flushed_count += last_sq_tag.0.saturating_sub(ib2.0);
    engine.dq.clear();
    engine.sq.clear();
    engine.sb.clear();
    engine.fu.reset();
    engine.buses.clear();

    let backup2 = *engine
        .checkpoint
        .as_ref()
        .expect("CPR mode always carries a checkpoint")
        .backup2();
    engine.register_file.restore(&backup2);
    engine
        .checkpoint
        .as_mut()
        .expect("CPR mode always carries a checkpoint")
        .collapse_after_rollback();

    engine.trailing_tag = ib2.0 + 1;
    engine.stats.exception_count += 1;
    engine.log.push(cycle, Operation::Exception, exception_tag);
}
