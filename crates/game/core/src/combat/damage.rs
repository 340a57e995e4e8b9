//! Damage formulas in both directions.
//!
//! # Formula
//!
//! ```text
//! base    = attack - monster_defense * defense_reduction   (may be negative)
//! skill   = base + skill.damage                 (never crits)
//! basic   = base * (crit ? crit_damage : 1)
//! aoe     = hit * aoe_multiplier
//! dealt   = min(max(0, floor(hit)), monster.hp)
//!
//! counter = max(0, monster_attack - character_defense * monster_defense_reduction)
//! ```

use crate::config::CombatConfig;
use crate::env::SkillDefinition;

/// What the character attacks with this round.
#[derive(Clone, Copy, Debug)]
pub enum Strike<'a> {
    Basic { crit: bool, crit_damage: f64 },
    Skill(&'a SkillDefinition),
}

impl Strike<'_> {
    pub fn is_aoe(&self) -> bool {
        match self {
            Strike::Basic { .. } => false,
            Strike::Skill(skill) => skill.target == crate::env::TargetType::All,
        }
    }
}

/// Unclamped; a negative base eats into a skill's flat bonus.
pub fn base_damage(attack: u32, monster_defense: u32, config: &CombatConfig) -> f64 {
    attack as f64 - monster_defense as f64 * config.defense_reduction
}

/// Damage of one strike against one monster before capping at its HP.
pub fn strike_damage(
    attack: u32,
    monster_defense: u32,
    strike: Strike<'_>,
    config: &CombatConfig,
) -> u32 {
    let base = base_damage(attack, monster_defense, config);

    let mut damage = match strike {
        Strike::Skill(skill) => base + skill.damage as f64,
        Strike::Basic { crit: true, crit_damage } => base * crit_damage.max(0.0),
        Strike::Basic { crit: false, .. } => base,
    };
    if strike.is_aoe() {
        damage *= config.aoe_multiplier;
    }

    damage.floor().max(0.0) as u32
}

/// Damage one living monster deals back to the character.
pub fn counter_damage(monster_attack: u32, character_defense: u32, config: &CombatConfig) -> u32 {
    (monster_attack as f64 - character_defense as f64 * config.monster_defense_reduction)
        .max(0.0)
        .floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TargetType;
    use crate::state::SkillId;

    fn skill(damage: u32, target: TargetType) -> SkillDefinition {
        SkillDefinition {
            id: SkillId(1),
            name: "Cleave".to_string(),
            mana_cost: 10,
            cooldown: 2,
            damage,
            target,
        }
    }

    const BASIC: Strike<'static> = Strike::Basic {
        crit: false,
        crit_damage: 2.0,
    };

    #[test]
    fn basic_attack_subtracts_half_defense() {
        let config = CombatConfig::new();
        assert_eq!(strike_damage(50, 20, BASIC, &config), 40);
    }

    #[test]
    fn crit_multiplies_basic_attack_only() {
        let config = CombatConfig::new();
        let crit = Strike::Basic {
            crit: true,
            crit_damage: 2.0,
        };
        assert_eq!(strike_damage(50, 20, crit, &config), 80);

        let single = skill(15, TargetType::Single);
        assert_eq!(strike_damage(50, 20, Strike::Skill(&single), &config), 55);
    }

    #[test]
    fn aoe_never_exceeds_single_target() {
        let config = CombatConfig::new();
        for (attack, defense, bonus) in [(50, 20, 15), (10, 40, 0), (7, 3, 1), (200, 0, 99)] {
            let single = skill(bonus, TargetType::Single);
            let all = skill(bonus, TargetType::All);
            let single = strike_damage(attack, defense, Strike::Skill(&single), &config);
            let aoe = strike_damage(attack, defense, Strike::Skill(&all), &config);
            assert!(aoe <= single, "{aoe} > {single}");
        }
    }

    #[test]
    fn high_defense_floors_at_zero() {
        let config = CombatConfig::new();
        assert_eq!(strike_damage(5, 100, BASIC, &config), 0);
        assert_eq!(counter_damage(5, 100, &config), 0);
    }

    #[test]
    fn skill_bonus_absorbs_negative_base() {
        let config = CombatConfig::new();
        // 10 - 40 * 0.5 = -10, plus 15
        let single = skill(15, TargetType::Single);
        assert_eq!(strike_damage(10, 40, Strike::Skill(&single), &config), 5);

        let weak = skill(5, TargetType::Single);
        assert_eq!(strike_damage(10, 40, Strike::Skill(&weak), &config), 0);
    }

    #[test]
    fn counter_damage_uses_monster_reduction() {
        let config = CombatConfig::new();
        // 20 - 10 * 0.3 = 17
        assert_eq!(counter_damage(20, 10, &config), 17);
    }
}
