//! Content factory for building the content catalog from data files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, MapDefinition, MonsterDefinition, SkillDefinition};

use crate::loaders::{
    ConfigLoader, ContentTables, LoadResult, MapLoader, MonsterLoader, SkillLoader, TablesLoader,
};

/// Everything loaded from one data directory.
#[derive(Clone, Debug)]
pub struct ContentCatalog {
    pub config: CombatConfig,
    pub tables: ContentTables,
    pub monsters: Vec<MonsterDefinition>,
    pub maps: Vec<MapDefinition>,
    pub skills: Vec<SkillDefinition>,
}

impl ContentCatalog {
    /// Every map must reference known monsters only.
    pub fn validate(&self) -> LoadResult<()> {
        let known: HashSet<_> = self.monsters.iter().map(|m| m.id).collect();
        for map in &self.maps {
            if let Some(missing) = map.monsters.iter().find(|id| !known.contains(id)) {
                anyhow::bail!("Map '{}' references unknown {}", map.name, missing);
            }
        }
        Ok(())
    }
}

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── tables.toml
/// ├── monsters.ron
/// ├── maps.ron
/// └── skills.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data set shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::bundled_data_dir())
    }

    /// Load combat tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load balance tables from `tables.toml`.
    pub fn load_tables(&self) -> LoadResult<ContentTables> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    /// Load the monster catalog from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<Vec<MonsterDefinition>> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    /// Load hunting grounds from `maps.ron`.
    pub fn load_maps(&self) -> LoadResult<Vec<MapDefinition>> {
        MapLoader::load(&self.data_dir.join("maps.ron"))
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillDefinition>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load every file and cross-check references.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let catalog = ContentCatalog {
            config: self.load_config()?,
            tables: self.load_tables()?,
            monsters: self.load_monsters()?,
            maps: self.load_maps()?,
            skills: self.load_skills()?,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
