//! The round processor.
//!
//! Pure combat math for exactly one round. Every random draw goes through
//! the supplied [`RandomSource`] in a fixed order:
//!
//! 1. crit roll (always drawn)
//! 2. single-target pick (when not all-target and a target exists)
//! 3. per kill, in slot order: copper chance, copper amount, item chance, item pick

use arrayvec::ArrayVec;

use crate::combat::damage::{self, Strike};
use crate::combat::result::{Hit, RoundResult, SkillCast};
use crate::combat::rewards::{self, Kill};
use crate::combat::skills::resolve_skill;
use crate::combat::targeting::select_targets;
use crate::config::CombatConfig;
use crate::env::{CombatEnv, DifficultyMultipliers, RandomSource};
use crate::state::{CharacterStats, LearnedSkill, MonsterSlots, SkillCooldowns, SkillId, SkillUsage};

/// Everything a round reads.
#[derive(Clone, Copy, Debug)]
pub struct RoundInput<'a> {
    pub character: &'a CharacterStats,
    pub slots: &'a MonsterSlots,
    /// Number of the round being resolved (previous round + 1).
    pub round: u64,
    pub hp: u32,
    pub mana: u32,
    pub cooldowns: &'a SkillCooldowns,
    pub usage: &'a SkillUsage,
    /// Skill ids in priority order.
    pub requested: &'a [SkillId],
    pub learned: &'a [LearnedSkill],
}

pub struct RoundProcessor<'a> {
    config: &'a CombatConfig,
    env: CombatEnv<'a>,
    multipliers: DifficultyMultipliers,
}

impl<'a> RoundProcessor<'a> {
    pub fn new(config: &'a CombatConfig, env: CombatEnv<'a>, multipliers: DifficultyMultipliers) -> Self {
        Self {
            config,
            env,
            multipliers,
        }
    }

    pub fn process(&self, input: RoundInput<'_>, rng: &mut impl RandomSource) -> RoundResult {
        let character = input.character;
        let mut mana = input.mana;
        let mut cooldowns = input.cooldowns.clone();
        let mut usage = input.usage.clone();

        let cast = resolve_skill(input.requested, input.learned, mana, &cooldowns, input.round);
        let skill = cast.map(|skill| {
            mana -= skill.mana_cost;
            let ready_at = input.round + skill.cooldown as u64;
            cooldowns.insert(skill.id, ready_at);
            *usage.entry(skill.id).or_insert(0) += 1;
            SkillCast {
                id: skill.id,
                name: skill.name.clone(),
                mana_cost: skill.mana_cost,
                target: skill.target,
                ready_at,
            }
        });

        let crit = self.roll_crit(character.crit_rate, rng);
        let strike = match cast {
            Some(skill) => Strike::Skill(skill),
            None => Strike::Basic {
                crit,
                crit_damage: character.crit_damage,
            },
        };

        let mut slots = input.slots.clone();
        let targets = select_targets(&slots, strike.is_aoe(), rng);

        let mut hits = ArrayVec::<Hit, { MonsterSlots::LEN }>::new();
        for &position in &targets {
            let Some(monster) = slots.monster_mut(position) else {
                continue;
            };
            if monster.is_new || !monster.is_alive() {
                continue;
            }
            let damage = damage::strike_damage(character.attack, monster.defense, strike, self.config);
            let dealt = monster.take_damage(damage);
            hits.push(Hit {
                position: position as u8,
                damage: dealt,
                killed: !monster.is_alive(),
            });
        }
        for monster in slots.monsters_mut() {
            monster.is_new = false;
        }

        let damage_taken: u64 = slots
            .living()
            .map(|m| damage::counter_damage(m.attack, character.defense, self.config) as u64)
            .sum();
        let hp = input.hp.saturating_sub(damage_taken.min(u32::MAX as u64) as u32);

        let mut kills = ArrayVec::<Kill, { MonsterSlots::LEN }>::new();
        for hit in hits.iter().filter(|hit| hit.killed) {
            if let Some(monster) = slots.monster(hit.position as usize) {
                let drops = self.env.drops_for(monster.definition_id);
                kills.push(rewards::roll_kill(monster, &drops, rng));
            }
        }
        let rewards = rewards::settle(&kills, self.multipliers.reward);

        let has_alive_monster = slots.has_living();
        RoundResult {
            round_number: input.round,
            skills_used: skill.iter().map(|s| s.id).collect(),
            skill,
            crit,
            damage_dealt: hits.iter().map(|h| h.damage as u64).sum(),
            hits,
            damage_taken,
            slots,
            hp,
            mana,
            cooldowns,
            skill_usage: usage,
            kills,
            rewards,
            has_alive_monster,
            victory: !has_alive_monster && input.slots.has_living(),
            defeat: hp == 0,
        }
    }

    /// `percent / 100 <= crit_rate`; a zero rate never crits.
    fn roll_crit(&self, crit_rate: f64, rng: &mut impl RandomSource) -> bool {
        let roll = rng.percent() as f64 / 100.0;
        crit_rate > 0.0 && roll <= crit_rate
    }
}
