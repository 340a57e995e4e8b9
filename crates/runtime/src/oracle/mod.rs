//! Runtime wrappers around static combat content.
//!
//! These implementations expose `combat-core` oracle traits and bundle them
//! into an [`OracleManager`] so the orchestrator can build a [`CombatEnv`]
//! per round. Content is immutable at runtime; dynamic state lives in the
//! store.
mod maps;
mod monsters;
mod skills;
mod tables;

use std::sync::Arc;

use combat_content::ContentCatalog;
use combat_core::{CombatConfig, CombatEnv, LearnedSkill, MapDefinition, MapId, MapOracle, SkillOracle};

pub use maps::MapOracleImpl;
pub use monsters::MonsterOracleImpl;
pub use skills::SkillOracleImpl;
pub use tables::TablesOracleImpl;

use crate::repository::KnownSkill;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) monsters: Arc<MonsterOracleImpl>,
    pub(crate) maps: Arc<MapOracleImpl>,
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) tables: Arc<TablesOracleImpl>,
    pub(crate) config: Arc<CombatConfig>,
}

impl OracleManager {
    pub fn new(
        monsters: Arc<MonsterOracleImpl>,
        maps: Arc<MapOracleImpl>,
        skills: Arc<SkillOracleImpl>,
        tables: Arc<TablesOracleImpl>,
        config: Arc<CombatConfig>,
    ) -> Self {
        Self {
            monsters,
            maps,
            skills,
            tables,
            config,
        }
    }

    pub fn from_catalog(catalog: ContentCatalog) -> Self {
        Self::new(
            Arc::new(MonsterOracleImpl::new(catalog.monsters)),
            Arc::new(MapOracleImpl::new(catalog.maps)),
            Arc::new(SkillOracleImpl::new(catalog.skills)),
            Arc::new(TablesOracleImpl::new(catalog.tables)),
            Arc::new(catalog.config),
        )
    }

    pub fn combat_env(&self) -> CombatEnv<'_> {
        CombatEnv::new(self.monsters.as_ref(), self.tables.as_ref())
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn map(&self, id: MapId) -> Option<MapDefinition> {
        self.maps.map(id)
    }

    /// Resolves a character's known skills; unknown ids are dropped.
    pub fn learned_skills(&self, known: &[KnownSkill]) -> Vec<LearnedSkill> {
        known
            .iter()
            .filter_map(|entry| match self.skills.skill(entry.id) {
                Some(skill) => Some(LearnedSkill {
                    skill,
                    active: entry.active,
                }),
                None => {
                    tracing::warn!("Ignoring unknown {}", entry.id);
                    None
                }
            })
            .collect()
    }
}
