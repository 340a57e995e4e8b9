use std::collections::HashMap;

use combat_core::{MonsterDefinition, MonsterId, MonsterOracle};

/// Monster catalog keyed by definition id.
#[derive(Debug, Clone, Default)]
pub struct MonsterOracleImpl {
    monsters: HashMap<MonsterId, MonsterDefinition>,
}

impl MonsterOracleImpl {
    pub fn new(monsters: impl IntoIterator<Item = MonsterDefinition>) -> Self {
        Self {
            monsters: monsters.into_iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

impl MonsterOracle for MonsterOracleImpl {
    fn monster(&self, id: MonsterId) -> Option<MonsterDefinition> {
        self.monsters.get(&id).cloned()
    }
}
