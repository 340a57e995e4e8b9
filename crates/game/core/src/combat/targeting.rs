//! Target selection.

use arrayvec::ArrayVec;

use crate::env::RandomSource;
use crate::state::MonsterSlots;

/// Slot positions struck this round, at most one per slot.
pub type Targets = ArrayVec<usize, { MonsterSlots::LEN }>;

/// All living monsters for an all-target strike, otherwise one living
/// monster chosen uniformly. Monsters flagged new are eligible picks; they
/// simply absorb no damage.
///
/// Draws once for a single-target pick with at least one candidate.
pub fn select_targets(slots: &MonsterSlots, aoe: bool, rng: &mut impl RandomSource) -> Targets {
    let living: Targets = slots.living().map(|m| m.position as usize).collect();
    if aoe || living.is_empty() {
        return living;
    }

    let pick = rng.below(living.len() as u32) as usize;
    let mut targets = Targets::new();
    targets.push(living[pick]);
    targets
}
