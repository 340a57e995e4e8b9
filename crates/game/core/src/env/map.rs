use crate::env::{MonsterDefinition, MonsterOracle};
use crate::state::{MapId, MonsterId};

/// A hunting ground and the monsters that may spawn on it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDefinition {
    pub id: MapId,
    pub name: String,
    pub min_level: u32,
    pub max_level: u32,
    pub monsters: Vec<MonsterId>,
}

impl MapDefinition {
    /// Resolves the map's monster list, skipping ids the oracle does not know.
    pub fn eligible_monsters(&self, oracle: &(impl MonsterOracle + ?Sized)) -> Vec<MonsterDefinition> {
        self.monsters
            .iter()
            .filter_map(|id| oracle.monster(*id))
            .collect()
    }

    /// Level bounds with `min <= max` and `min >= 1`.
    pub fn level_bounds(&self) -> (u32, u32) {
        let min = self.min_level.max(1);
        (min, self.max_level.max(min))
    }
}

/// Oracle providing map definitions by id.
pub trait MapOracle: Send + Sync {
    fn map(&self, id: MapId) -> Option<MapDefinition>;
}
