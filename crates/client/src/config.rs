//! Simulation settings read from the environment.

use std::env;
use std::path::PathBuf;

use combat_core::{CharacterId, DifficultyTier, MapId, SkillId};

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub character: CharacterId,
    pub map: MapId,
    pub difficulty: DifficultyTier,
    /// Skill priority list for the ticker.
    pub skills: Vec<SkillId>,
    /// Rounds to watch before stopping.
    pub rounds: u64,
    /// Content directory; the bundled data set when unset.
    pub content_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub auto_potions: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            character: CharacterId(1),
            map: MapId(1),
            difficulty: DifficultyTier::Normal,
            skills: vec![SkillId(1), SkillId(2)],
            rounds: 20,
            content_dir: None,
            log_dir: None,
            auto_potions: true,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(id) = read_env::<u64>("SIM_CHARACTER_ID") {
            config.character = CharacterId(id);
        }
        if let Some(id) = read_env::<u32>("SIM_MAP_ID") {
            config.map = MapId(id);
        }
        if let Some(tier) = read_env::<DifficultyTier>("SIM_DIFFICULTY") {
            config.difficulty = tier;
        }
        if let Ok(raw) = env::var("SIM_SKILLS") {
            config.skills = raw
                .split(',')
                .filter_map(|id| id.trim().parse().ok())
                .map(SkillId)
                .collect();
        }
        if let Some(rounds) = read_env::<u64>("SIM_ROUNDS") {
            config.rounds = rounds.max(1);
        }
        if let Some(auto) = read_env_bool("SIM_AUTO_POTIONS") {
            config.auto_potions = auto;
        }
        config.content_dir = read_env::<PathBuf>("COMBAT_CONTENT_DIR");
        config.log_dir = read_env::<PathBuf>("SIM_LOG_DIR");

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
