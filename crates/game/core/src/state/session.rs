//! Persisted per-character combat session.

use std::collections::BTreeMap;

use crate::state::{CharacterId, MonsterSlots, SkillId, Timestamp};

/// Skill id → first round number at which the skill may be cast again.
pub type SkillCooldowns = BTreeMap<SkillId, u64>;

/// Skill id → number of casts during the current encounter.
pub type SkillUsage = BTreeMap<SkillId, u32>;

/// Combat state for one character, upserted in place round over round.
///
/// A default session is the "cleared" state: no resources initialised, empty
/// roster, not fighting.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub character_id: CharacterId,
    /// `None` until the first round initialises it from the character's maximum.
    pub current_hp: Option<u32>,
    pub current_mana: Option<u32>,
    pub monster_slots: MonsterSlots,
    pub round_number: u64,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub skill_cooldowns: SkillCooldowns,
    pub skill_usage: SkillUsage,
    pub started_at: Option<Timestamp>,
    pub monsters_refreshed_at: Option<Timestamp>,
    pub is_fighting: bool,
}

impl CombatSession {
    pub fn new(character_id: CharacterId) -> Self {
        Self {
            character_id,
            ..Self::default()
        }
    }

    /// Returns the cleared session for the same character.
    pub fn cleared(&self) -> Self {
        Self::new(self.character_id)
    }

    pub fn hp(&self) -> u32 {
        self.current_hp.unwrap_or(0)
    }

    pub fn mana(&self) -> u32 {
        self.current_mana.unwrap_or(0)
    }

    pub fn phase(&self) -> CombatPhase {
        if self.is_fighting {
            CombatPhase::InCombat
        } else {
            CombatPhase::Idle
        }
    }

    /// Fills unset HP/mana with the given maximums and clamps set values to them.
    pub fn initialize_resources(&mut self, max_hp: u32, max_mana: u32) {
        self.current_hp = Some(self.current_hp.unwrap_or(max_hp).min(max_hp));
        self.current_mana = Some(self.current_mana.unwrap_or(max_mana).min(max_mana));
    }

    /// Resets encounter-scoped counters when a fresh roster is generated.
    pub fn begin_encounter(&mut self) {
        self.round_number = 0;
        self.total_damage_dealt = 0;
        self.total_damage_taken = 0;
        self.skill_cooldowns.clear();
        self.skill_usage.clear();
    }
}

/// Persisted lifecycle phase of a character's combat.
///
/// `Defeated` is never persisted: only the round that caused it reports it
/// (see `ResolvedRound::phase`), and the session is cleared back to `Idle`
/// in the same commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    Idle,
    InCombat,
    Defeated,
}
