//! S5: reclaim retired entries from the SQ, and from the ROB in ROB mode
//! (spec §4.10).

use crate::instruction::InstState;
use crate::pipeline::engine::Engine;

/// Removes every `RETIRED` tag from the SQ. In ROB mode, also pops ROB
/// entries whose instruction has retired, from the head, stopping at the
/// first non-retired head (the ROB only ever grows/shrinks from its head
/// and tail respectively, so this is safe to do unconditionally in tag
/// order).
pub fn run(engine: &mut Engine) {
    let retired: Vec<_> = engine
        .sq
        .iter()
        .filter(|&tag| engine.inst(tag).state == InstState::Retired)
        .collect();
    for tag in retired {
        engine.sq.remove(tag);
    }

    if engine.mode.has_rob() {
        while let Some(head) = engine.rob.head() {
            if engine.inst(head.inst_tag).state == InstState::Retired {
                engine.rob.pop_head();
            } else {
                break;
            }
        }
    }
}
