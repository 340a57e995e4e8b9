//! Output of one resolved round.

use arrayvec::ArrayVec;

use crate::combat::rewards::{Kill, Rewards};
use crate::env::TargetType;
use crate::state::{MonsterSlots, SkillCooldowns, SkillId, SkillUsage};

/// The skill cast this round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCast {
    pub id: SkillId,
    pub name: String,
    pub mana_cost: u32,
    pub target: TargetType,
    /// First round at which the skill can be cast again.
    pub ready_at: u64,
}

/// Damage landed on one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub position: u8,
    pub damage: u32,
    pub killed: bool,
}

/// Everything the round processor computed.
///
/// Not persisted as is; the engine folds it into the next session snapshot
/// and the round log.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    pub round_number: u64,
    pub skill: Option<SkillCast>,
    pub crit: bool,
    pub hits: ArrayVec<Hit, { MonsterSlots::LEN }>,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub slots: MonsterSlots,
    pub hp: u32,
    pub mana: u32,
    pub cooldowns: SkillCooldowns,
    /// Skills cast this round (zero or one).
    pub skills_used: Vec<SkillId>,
    /// Encounter-wide usage counts including this round.
    pub skill_usage: SkillUsage,
    pub kills: ArrayVec<Kill, { MonsterSlots::LEN }>,
    pub rewards: Rewards,
    pub has_alive_monster: bool,
    /// Every monster alive at round start is dead.
    pub victory: bool,
    pub defeat: bool,
}

impl RoundResult {
    pub fn experience_gained(&self) -> u64 {
        self.rewards.experience_gained
    }
}
