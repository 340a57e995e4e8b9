/// Tunable combat parameters.
///
/// Every field has a serde default so partial `config.toml` files load.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Fraction of monster defense subtracted from character attack.
    pub defense_reduction: f64,
    /// Fraction of character defense subtracted from monster attack.
    pub monster_defense_reduction: f64,
    /// Per-target damage multiplier for all-target attacks.
    pub aoe_multiplier: f64,
    /// Chance to replenish vacant slots when some monsters survive.
    pub spawn_chance_percent: u32,
    /// Upper bound of monsters added by one replenish roll.
    pub max_spawn_per_round: u32,
    /// Interval after which monster stats are regenerated mid-encounter.
    pub refresh_interval_ms: u64,
    /// Share of currency lost on defeat.
    pub defeat_penalty_percent: u32,
    /// Base level is drawn within `definition.level ± level_spread`.
    pub level_spread: u32,
    /// Each spawned instance deviates from the base level by up to this much.
    pub level_jitter: u32,
    /// Stat growth per level above (or shrink below) the definition level.
    pub level_scaling_percent: u32,
    /// Roll replenishment after every round instead of only after a wipe.
    pub replenish_every_round: bool,
}

impl CombatConfig {
    pub const ROSTER_SIZE: usize = crate::state::MonsterSlots::LEN;
    pub const MAX_INITIAL_SPAWN: u32 = Self::ROSTER_SIZE as u32;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEFENSE_REDUCTION: f64 = 0.5;
    pub const DEFAULT_MONSTER_DEFENSE_REDUCTION: f64 = 0.3;
    pub const DEFAULT_AOE_MULTIPLIER: f64 = 0.7;
    pub const DEFAULT_SPAWN_CHANCE_PERCENT: u32 = 30;
    pub const DEFAULT_MAX_SPAWN_PER_ROUND: u32 = 2;
    pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;
    pub const DEFAULT_DEFEAT_PENALTY_PERCENT: u32 = 10;
    pub const DEFAULT_LEVEL_SPREAD: u32 = 3;
    pub const DEFAULT_LEVEL_JITTER: u32 = 1;
    pub const DEFAULT_LEVEL_SCALING_PERCENT: u32 = 10;

    pub fn new() -> Self {
        Self {
            defense_reduction: Self::DEFAULT_DEFENSE_REDUCTION,
            monster_defense_reduction: Self::DEFAULT_MONSTER_DEFENSE_REDUCTION,
            aoe_multiplier: Self::DEFAULT_AOE_MULTIPLIER,
            spawn_chance_percent: Self::DEFAULT_SPAWN_CHANCE_PERCENT,
            max_spawn_per_round: Self::DEFAULT_MAX_SPAWN_PER_ROUND,
            refresh_interval_ms: Self::DEFAULT_REFRESH_INTERVAL_MS,
            defeat_penalty_percent: Self::DEFAULT_DEFEAT_PENALTY_PERCENT,
            level_spread: Self::DEFAULT_LEVEL_SPREAD,
            level_jitter: Self::DEFAULT_LEVEL_JITTER,
            level_scaling_percent: Self::DEFAULT_LEVEL_SCALING_PERCENT,
            replenish_every_round: false,
        }
    }

    /// Currency lost on defeat, floored.
    pub fn defeat_penalty(&self, currency: u64) -> u64 {
        currency.saturating_mul(self.defeat_penalty_percent.min(100) as u64) / 100
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defeat_penalty_floors() {
        let config = CombatConfig::new();
        assert_eq!(config.defeat_penalty(1_000), 100);
        assert_eq!(config.defeat_penalty(99), 9);
        assert_eq!(config.defeat_penalty(5), 0);
    }
}
