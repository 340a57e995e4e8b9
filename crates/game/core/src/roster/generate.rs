//! Level derivation and stat scaling for spawned monsters.
//!
//! # Formula
//!
//! ```text
//! lo, hi      = max(map.min, def.level - spread), min(map.max, def.level + spread)
//! base_level  = uniform[lo, hi]            (def.level clamped to the map if lo > hi)
//! level       = clamp(base_level ± jitter, map.min, map.max)
//! growth      = 1 + (level - def.level) * level_scaling_percent / 100   (>= 0.1)
//! max_hp      = max(1, def.hp      * growth * monster_hp)
//! attack      = max(1, def.attack  * growth * monster_damage)
//! defense     =        def.defense * growth * monster_hp
//! experience  = max(1, def.experience * growth)
//! ```
//!
//! Experience is not scaled by the difficulty `reward` multiplier here; that
//! happens once, when kills are settled.

use crate::config::CombatConfig;
use crate::env::{DifficultyMultipliers, MapDefinition, MonsterDefinition, RandomSource};
use crate::state::MonsterInstance;

const MIN_GROWTH: f64 = 0.1;

pub(crate) fn base_level(
    definition: &MonsterDefinition,
    map: &MapDefinition,
    config: &CombatConfig,
    rng: &mut impl RandomSource,
) -> u32 {
    let (map_min, map_max) = map.level_bounds();
    let lo = definition.level.saturating_sub(config.level_spread).max(map_min);
    let hi = definition.level.saturating_add(config.level_spread).min(map_max);

    if lo > hi {
        return definition.level.clamp(map_min, map_max);
    }
    rng.range(lo as i64, hi as i64) as u32
}

pub(crate) fn jitter_level(
    base: u32,
    map: &MapDefinition,
    config: &CombatConfig,
    rng: &mut impl RandomSource,
) -> u32 {
    let (map_min, map_max) = map.level_bounds();
    let jitter = config.level_jitter as i64;
    let level = base as i64 + rng.range(-jitter, jitter);
    (level.max(0) as u32).clamp(map_min, map_max)
}

fn growth(definition: &MonsterDefinition, level: u32, config: &CombatConfig) -> f64 {
    let delta = level as f64 - definition.level as f64;
    (1.0 + delta * config.level_scaling_percent as f64 / 100.0).max(MIN_GROWTH)
}

fn scale(base: u32, factor: f64) -> u32 {
    (base as f64 * factor).floor().max(0.0) as u32
}

/// Builds a full-HP instance of `definition` at `level`.
pub(crate) fn spawn_instance(
    definition: &MonsterDefinition,
    level: u32,
    position: usize,
    multipliers: DifficultyMultipliers,
    config: &CombatConfig,
    is_new: bool,
) -> MonsterInstance {
    let growth = growth(definition, level, config);
    let max_hp = scale(definition.hp, growth * multipliers.monster_hp).max(1);

    MonsterInstance {
        definition_id: definition.id,
        name: definition.name.clone(),
        kind: definition.kind.clone(),
        level,
        hp: max_hp,
        max_hp,
        attack: scale(definition.attack, growth * multipliers.monster_damage).max(1),
        defense: scale(definition.defense, growth * multipliers.monster_hp),
        experience_reward: scale(definition.experience, growth).max(1),
        position: position as u8,
        is_new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRolls;
    use crate::env::fixtures::{meadow, rat};

    #[test]
    fn base_level_stays_within_spread_and_map() {
        let mut map = meadow();
        map.min_level = 4;
        map.max_level = 6;
        let config = CombatConfig::new();

        // rat level 5, spread 3 → [2, 8] ∩ [4, 6] = [4, 6]
        let mut rolls = ScriptedRolls::new([0, 1, 2, 3]);
        let levels: Vec<u32> = (0..4)
            .map(|_| base_level(&rat(), &map, &config, &mut rolls))
            .collect();
        assert_eq!(levels, vec![4, 5, 6, 4]);
    }

    #[test]
    fn base_level_clamps_definition_outside_map() {
        let mut map = meadow();
        map.min_level = 20;
        map.max_level = 30;
        let config = CombatConfig::new();

        let mut rolls = ScriptedRolls::new([]);
        assert_eq!(base_level(&rat(), &map, &config, &mut rolls), 20);
    }

    #[test]
    fn jitter_is_bounded_by_map() {
        let map = meadow();
        let config = CombatConfig::new();

        // range(-1, 1): roll 0 → -1, roll 2 → +1
        let mut rolls = ScriptedRolls::new([0, 2]);
        assert_eq!(jitter_level(1, &map, &config, &mut rolls), 1);
        assert_eq!(jitter_level(10, &map, &config, &mut rolls), 10);
    }

    #[test]
    fn low_levels_never_drop_below_one_hp() {
        let mut config = CombatConfig::new();
        config.level_scaling_percent = 100;

        let monster = spawn_instance(&rat(), 1, 0, DifficultyMultipliers::NEUTRAL, &config, true);
        assert_eq!(monster.max_hp, 10);
        assert!(monster.attack >= 1);
        assert!(monster.is_new);
    }

    #[test]
    fn stats_scale_with_level_and_difficulty() {
        let config = CombatConfig::new();
        let multipliers = DifficultyMultipliers {
            monster_hp: 2.0,
            monster_damage: 1.5,
            reward: 3.0,
        };

        // level 10 vs definition 5 → growth 1.5
        let monster = spawn_instance(&rat(), 10, 2, multipliers, &config, false);
        assert_eq!(monster.max_hp, 300);
        assert_eq!(monster.hp, monster.max_hp);
        assert_eq!(monster.attack, 45);
        assert_eq!(monster.defense, 30);
        assert_eq!(monster.experience_reward, 45);
        assert_eq!(monster.position, 2);
    }
}
