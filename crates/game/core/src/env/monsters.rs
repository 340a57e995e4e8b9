use crate::state::{ItemId, MonsterId};

/// An item that can drop from a kill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item_id: ItemId,
    pub name: String,
}

/// Per-kill drop rolls. Chances are percentages in `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTable {
    pub item_chance: u32,
    pub copper_chance: u32,
    pub copper_base: u32,
    /// Extra copper rolled uniformly in `[0, copper_range]` on top of the base.
    pub copper_range: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<LootEntry>,
}

/// Static monster template. Stats are given at `level` and scaled on spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterDefinition {
    pub id: MonsterId,
    pub name: String,
    pub kind: String,
    pub level: u32,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub experience: u32,
    /// Falls back to the global table from [`crate::env::TablesOracle`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub drops: Option<DropTable>,
}

/// Oracle providing monster definitions by id.
pub trait MonsterOracle: Send + Sync {
    fn monster(&self, id: MonsterId) -> Option<MonsterDefinition>;
}
