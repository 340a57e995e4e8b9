use crate::state::SkillId;

/// Which monsters a skill strikes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetType {
    /// One uniformly chosen living monster.
    #[default]
    Single,
    /// Every living monster, at reduced per-target damage.
    All,
}

/// Static definition of a castable skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub mana_cost: u32,
    /// Cooldown in rounds.
    pub cooldown: u32,
    /// Flat damage added to the base attack.
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: TargetType,
}

/// Oracle providing skill definitions by id.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<SkillDefinition>;
}
