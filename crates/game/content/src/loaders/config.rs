//! Combat tuning loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load tuning parameters from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file yields
    /// [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &CombatConfig) -> LoadResult<()> {
        if !(0.0..1.0).contains(&config.aoe_multiplier) {
            anyhow::bail!(
                "aoe_multiplier must be in [0, 1), got {}",
                config.aoe_multiplier
            );
        }
        if config.spawn_chance_percent > 100 || config.defeat_penalty_percent > 100 {
            anyhow::bail!("percentages must not exceed 100");
        }
        if config.max_spawn_per_round == 0 {
            anyhow::bail!("max_spawn_per_round must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse("spawn_chance_percent = 50\n").unwrap();
        assert_eq!(config.spawn_chance_percent, 50);
        assert_eq!(config.defense_reduction, CombatConfig::DEFAULT_DEFENSE_REDUCTION);
        assert_eq!(config.refresh_interval_ms, CombatConfig::DEFAULT_REFRESH_INTERVAL_MS);
    }

    #[test]
    fn rejects_amplifying_aoe() {
        assert!(ConfigLoader::parse("aoe_multiplier = 1.2\n").is_err());
    }
}
