use crate::env::DropTable;

/// Difficulty chosen by a character.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DifficultyTier {
    #[default]
    Normal,
    Hard,
    Nightmare,
    Hell,
}

/// Scalars applied to spawned monster stats and to kill rewards.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifficultyMultipliers {
    pub monster_hp: f64,
    pub monster_damage: f64,
    pub reward: f64,
}

impl DifficultyMultipliers {
    pub const NEUTRAL: Self = Self {
        monster_hp: 1.0,
        monster_damage: 1.0,
        reward: 1.0,
    };
}

impl Default for DifficultyMultipliers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Oracle providing balance tables.
///
/// Entity data lives in [`MonsterOracle`](crate::env::MonsterOracle) and
/// friends; this only holds tier multipliers and global defaults.
pub trait TablesOracle: Send + Sync {
    fn difficulty(&self, tier: DifficultyTier) -> DifficultyMultipliers;

    /// Drop table for monsters whose definition carries none.
    fn fallback_drops(&self) -> DropTable;
}
