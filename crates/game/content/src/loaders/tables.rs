//! Balance tables loader.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

use combat_core::{DifficultyMultipliers, DifficultyTier, DropTable};
use serde::Deserialize;
use strum::IntoEnumIterator;

use crate::loaders::{LoadResult, read_file};

/// Parsed `tables.toml`: one multiplier set per tier plus the fallback drops.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentTables {
    pub difficulty: BTreeMap<DifficultyTier, DifficultyMultipliers>,
    pub fallback_drops: DropTable,
}

impl ContentTables {
    /// Multipliers for `tier`; tiers are validated on load.
    pub fn multipliers(&self, tier: DifficultyTier) -> DifficultyMultipliers {
        self.difficulty.get(&tier).copied().unwrap_or_default()
    }
}

impl Default for ContentTables {
    fn default() -> Self {
        Self {
            difficulty: DifficultyTier::iter()
                .map(|tier| (tier, DifficultyMultipliers::NEUTRAL))
                .collect(),
            fallback_drops: DropTable::default(),
        }
    }
}

#[derive(Deserialize)]
struct TablesToml {
    difficulty: HashMap<String, DifficultyMultipliers>,
    #[serde(default)]
    fallback_drops: DropTable,
}

/// Loader for balance tables from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<ContentTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Every tier must be present exactly once; unknown tier names are rejected.
    pub fn parse(content: &str) -> LoadResult<ContentTables> {
        let raw: TablesToml = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))?;

        let mut difficulty = BTreeMap::new();
        for (name, multipliers) in raw.difficulty {
            let tier = DifficultyTier::from_str(&name)
                .map_err(|_| anyhow::anyhow!("Unknown difficulty tier '{}'", name))?;
            if multipliers.monster_hp <= 0.0 || multipliers.monster_damage <= 0.0 {
                anyhow::bail!("Difficulty '{}' must have positive monster multipliers", name);
            }
            if multipliers.reward < 0.0 {
                anyhow::bail!("Difficulty '{}' has a negative reward multiplier", name);
            }
            difficulty.insert(tier, multipliers);
        }

        if let Some(missing) = DifficultyTier::iter().find(|tier| !difficulty.contains_key(tier)) {
            anyhow::bail!("Difficulty tier '{}' is missing", missing);
        }

        Ok(ContentTables {
            difficulty,
            fallback_drops: raw.fallback_drops,
        })
    }
}
