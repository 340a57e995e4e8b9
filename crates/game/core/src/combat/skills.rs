//! Skill selection for a round.

use crate::env::SkillDefinition;
use crate::state::{LearnedSkill, SkillCooldowns, SkillId};

/// Whether `skill` can be cast on `round` with `mana` available.
///
/// A skill with no cooldown entry has never been cast and is ready.
pub fn is_usable(skill: &SkillDefinition, mana: u32, cooldowns: &SkillCooldowns, round: u64) -> bool {
    let ready = cooldowns.get(&skill.id).is_none_or(|&ready_at| ready_at <= round);
    mana >= skill.mana_cost && ready
}

/// First usable active skill in priority order.
///
/// At most one skill is cast per round. Ids that do not match an active
/// learned skill are skipped.
pub fn resolve_skill<'a>(
    requested: &[SkillId],
    learned: &'a [LearnedSkill],
    mana: u32,
    cooldowns: &SkillCooldowns,
    round: u64,
) -> Option<&'a SkillDefinition> {
    requested.iter().find_map(|id| {
        learned
            .iter()
            .find(|learned| learned.active && learned.id() == *id)
            .map(|learned| &learned.skill)
            .filter(|skill| is_usable(skill, mana, cooldowns, round))
    })
}
