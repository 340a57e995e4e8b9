//! Traits describing read-only content.
//!
//! Oracles expose map, monster, skill definitions and balance tables. The
//! [`CombatEnv`] aggregate bundles the ones a round needs so the engine can
//! reach everything without hard coupling to concrete implementations.
mod map;
mod monsters;
mod rng;
mod skills;
mod tables;

pub use map::{MapDefinition, MapOracle};
pub use monsters::{DropTable, LootEntry, MonsterDefinition, MonsterOracle};
pub use rng::{PcgRng, RandomSource, RngOracle, RollStream, compute_seed};
pub use skills::{SkillDefinition, SkillOracle, TargetType};
pub use tables::{DifficultyMultipliers, DifficultyTier, TablesOracle};

#[cfg(test)]
pub(crate) use rng::scripted::ScriptedRolls;

use crate::state::MonsterId;

/// Read-only oracles consulted while resolving a round.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    monsters: &'a dyn MonsterOracle,
    tables: &'a dyn TablesOracle,
}

impl<'a> CombatEnv<'a> {
    pub fn new(monsters: &'a dyn MonsterOracle, tables: &'a dyn TablesOracle) -> Self {
        Self { monsters, tables }
    }

    pub fn monsters(&self) -> &'a dyn MonsterOracle {
        self.monsters
    }

    pub fn tables(&self) -> &'a dyn TablesOracle {
        self.tables
    }

    /// Drop table for a definition, or the global fallback.
    pub fn drops_for(&self, id: MonsterId) -> DropTable {
        self.monsters
            .monster(id)
            .and_then(|definition| definition.drops)
            .unwrap_or_else(|| self.tables.fallback_drops())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::HashMap;

    use super::*;
    use crate::state::{ItemId, MapId};

    /// In-memory oracle set used across core tests.
    #[derive(Default)]
    pub struct TestContent {
        pub monsters: HashMap<MonsterId, MonsterDefinition>,
        pub fallback: DropTable,
    }

    impl TestContent {
        pub fn with_monster(mut self, definition: MonsterDefinition) -> Self {
            self.monsters.insert(definition.id, definition);
            self
        }

        pub fn env(&self) -> CombatEnv<'_> {
            CombatEnv::new(self, self)
        }
    }

    impl MonsterOracle for TestContent {
        fn monster(&self, id: MonsterId) -> Option<MonsterDefinition> {
            self.monsters.get(&id).cloned()
        }
    }

    impl TablesOracle for TestContent {
        fn difficulty(&self, _tier: DifficultyTier) -> DifficultyMultipliers {
            DifficultyMultipliers::NEUTRAL
        }

        fn fallback_drops(&self) -> DropTable {
            self.fallback.clone()
        }
    }

    pub fn rat() -> MonsterDefinition {
        MonsterDefinition {
            id: MonsterId(1),
            name: "Cave Rat".to_string(),
            kind: "beast".to_string(),
            level: 5,
            hp: 100,
            attack: 20,
            defense: 10,
            experience: 30,
            drops: Some(DropTable {
                item_chance: 0,
                copper_chance: 100,
                copper_base: 10,
                copper_range: 0,
                items: vec![LootEntry {
                    item_id: ItemId(900),
                    name: "Rat Tail".to_string(),
                }],
            }),
        }
    }

    pub fn meadow() -> MapDefinition {
        MapDefinition {
            id: MapId(1),
            name: "Meadow".to_string(),
            min_level: 1,
            max_level: 10,
            monsters: vec![MonsterId(1)],
        }
    }
}
