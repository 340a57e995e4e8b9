//! Difficulty multipliers and the fallback drop table.

use combat_content::ContentTables;
use combat_core::{DifficultyMultipliers, DifficultyTier, DropTable, TablesOracle};

#[derive(Debug, Clone, Default)]
pub struct TablesOracleImpl {
    tables: ContentTables,
}

impl TablesOracleImpl {
    pub fn new(tables: ContentTables) -> Self {
        Self { tables }
    }
}

impl TablesOracle for TablesOracleImpl {
    fn difficulty(&self, tier: DifficultyTier) -> DifficultyMultipliers {
        self.tables.multipliers(tier)
    }

    fn fallback_drops(&self) -> DropTable {
        self.tables.fallback_drops.clone()
    }
}
