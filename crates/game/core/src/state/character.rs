//! Read-only views of collaborator data consumed by a round.

use crate::env::{DifficultyTier, SkillDefinition};
use crate::state::{CharacterId, ItemId, SkillId};

/// Combat-relevant character stats, read once per round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterStats {
    pub id: CharacterId,
    pub attack: u32,
    pub defense: u32,
    /// Crit probability in `[0, 1]`.
    pub crit_rate: f64,
    /// Multiplier applied to a critical basic attack (e.g. `1.5`).
    pub crit_damage: f64,
    pub max_hp: u32,
    pub max_mana: u32,
    pub currency: u64,
    pub experience: u64,
    pub difficulty: DifficultyTier,
}

/// A skill the character has learned; only active skills can be cast.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnedSkill {
    pub skill: SkillDefinition,
    pub active: bool,
}

impl LearnedSkill {
    pub fn id(&self) -> SkillId {
        self.skill.id
    }
}

/// Potion sub-type, matched against the resource being restored.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PotionKind {
    Hp,
    Mp,
}

/// An inventory stack of identical potions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotionStack {
    pub item_id: ItemId,
    pub name: String,
    pub kind: PotionKind,
    pub restore: u32,
    pub quantity: u32,
}

/// Character preferences for automatic potion use.
///
/// Thresholds are percentages of the maximum; they are clamped to `[1, 100]`
/// when read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutoPotionSettings {
    pub hp_enabled: bool,
    pub hp_threshold: u8,
    pub mana_enabled: bool,
    pub mana_threshold: u8,
}

impl AutoPotionSettings {
    pub const DEFAULT_THRESHOLD: u8 = 30;

    pub fn disabled() -> Self {
        Self {
            hp_enabled: false,
            hp_threshold: Self::DEFAULT_THRESHOLD,
            mana_enabled: false,
            mana_threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn threshold(&self, kind: PotionKind) -> u8 {
        let raw = match kind {
            PotionKind::Hp => self.hp_threshold,
            PotionKind::Mp => self.mana_threshold,
        };
        raw.clamp(1, 100)
    }

    pub fn enabled(&self, kind: PotionKind) -> bool {
        match kind {
            PotionKind::Hp => self.hp_enabled,
            PotionKind::Mp => self.mana_enabled,
        }
    }
}

impl Default for AutoPotionSettings {
    fn default() -> Self {
        Self::disabled()
    }
}
