//! Round transaction.
//!
//! [`CombatEngine::run_round`] takes an immutable session snapshot and the
//! collaborator data for one character and returns the next snapshot
//! together with everything the caller must persist: potion decrements,
//! rewards and the defeat penalty. The caller commits all of it atomically
//! or nothing at all.
//!
//! # Sequence
//!
//! 1. start fighting if idle, initialise HP/mana from the maximums
//! 2. pre-round potions
//! 3. HP must be positive, otherwise auto-stop and clear the session
//! 4. prepare the roster (keep, refresh or generate); auto-stop on an empty map
//! 5. resolve the round
//! 6. post-round potions (skipped on defeat)
//! 7. replenish vacant slots when the round wiped the roster
//! 8. settle rewards; on defeat apply the penalty and clear the session
mod errors;
mod flags;
mod outcome;

pub use errors::EngineError;
pub use flags::RoundFlags;
pub use outcome::{
    ConsumedPotion, CurrencyChange, PotionPhase, ResolvedRound, RoundTransition, StopReason,
};

use crate::combat::{RoundInput, RoundProcessor};
use crate::config::CombatConfig;
use crate::env::{CombatEnv, MapDefinition, RandomSource};
use crate::potion::{Gauge, PotionBelt, apply_auto_potions};
use crate::roster::{MonsterRoster, RosterChange, RosterError};
use crate::state::{
    AutoPotionSettings, CharacterStats, CombatSession, LearnedSkill, PotionStack, SkillId,
    Timestamp,
};

/// Inputs for one round; all read before the round starts.
#[derive(Clone, Copy, Debug)]
pub struct RoundRequest<'a> {
    pub session: &'a CombatSession,
    pub character: &'a CharacterStats,
    pub map: &'a MapDefinition,
    pub learned: &'a [LearnedSkill],
    /// Skill ids in priority order.
    pub requested: &'a [SkillId],
    pub potions: &'a [PotionStack],
    pub potion_settings: AutoPotionSettings,
    pub now: Timestamp,
}

pub struct CombatEngine<'a> {
    config: &'a CombatConfig,
    env: CombatEnv<'a>,
}

impl<'a> CombatEngine<'a> {
    pub fn new(config: &'a CombatConfig, env: CombatEnv<'a>) -> Self {
        Self { config, env }
    }

    pub fn run_round(
        &self,
        request: RoundRequest<'_>,
        rng: &mut impl RandomSource,
    ) -> Result<RoundTransition, EngineError> {
        let character = request.character;
        if request.session.character_id != character.id {
            return Err(EngineError::CharacterMismatch {
                session: request.session.character_id,
                character: character.id,
            });
        }

        let mut next = request.session.clone();
        if !next.is_fighting {
            next.is_fighting = true;
            next.started_at = Some(request.now);
        }
        next.started_at.get_or_insert(request.now);
        next.initialize_resources(character.max_hp, character.max_mana);

        let mut belt = PotionBelt::new(request.potions.to_vec());
        let mut potions = Vec::new();
        self.drink(&request, &mut next, &mut belt, PotionPhase::PreRound, &mut potions);

        if next.hp() == 0 {
            return Ok(RoundTransition::AutoStopped {
                reason: StopReason::OutOfHealth,
                session: next.cleared(),
                last_hp: next.hp(),
            });
        }

        let multipliers = self.env.tables().difficulty(character.difficulty);
        let eligible = request.map.eligible_monsters(self.env.monsters());
        let roster = MonsterRoster::new(request.map, &eligible, multipliers, self.config);

        let prepared = match roster.prepare(&next, request.now, rng) {
            Ok(prepared) => prepared,
            Err(RosterError::NoMonstersAvailable { .. }) => {
                let mut stopped = request.session.clone();
                stopped.is_fighting = false;
                return Ok(RoundTransition::AutoStopped {
                    reason: StopReason::NoMonsters,
                    last_hp: next.hp(),
                    session: stopped,
                });
            }
        };

        let mut flags = RoundFlags::empty();
        match prepared.change {
            RosterChange::Generated => {
                next.begin_encounter();
                flags |= RoundFlags::NEW_ENCOUNTER;
            }
            RosterChange::Refreshed => flags |= RoundFlags::REFRESHED,
            RosterChange::Unchanged => {}
        }
        next.monsters_refreshed_at = prepared.refreshed_at;

        let processor = RoundProcessor::new(self.config, self.env, multipliers);
        let result = processor.process(
            RoundInput {
                character,
                slots: &prepared.slots,
                round: next.round_number + 1,
                hp: next.hp(),
                mana: next.mana(),
                cooldowns: &next.skill_cooldowns,
                usage: &next.skill_usage,
                requested: request.requested,
                learned: request.learned,
            },
            rng,
        );

        next.round_number = result.round_number;
        next.current_hp = Some(result.hp);
        next.current_mana = Some(result.mana);
        next.total_damage_dealt += result.damage_dealt;
        next.total_damage_taken += result.damage_taken;
        next.skill_cooldowns = result.cooldowns.clone();
        next.skill_usage = result.skill_usage.clone();
        next.monster_slots = result.slots.clone();

        let mut spawned = Vec::new();
        if !result.defeat {
            self.drink(&request, &mut next, &mut belt, PotionPhase::PostRound, &mut potions);

            let wiped = !result.has_alive_monster;
            if wiped || self.config.replenish_every_round {
                let replenished = roster.replenish(&next.monster_slots, wiped, rng)?;
                next.monster_slots = replenished.slots;
                spawned = replenished.spawned;
            }
        }

        // A defeat forfeits the round's copper; the penalty is taken from the
        // balance the character brought into the round.
        let (gained, penalty) = if result.defeat {
            (0, self.config.defeat_penalty(character.currency))
        } else {
            (result.rewards.currency, 0)
        };
        let currency = CurrencyChange {
            before: character.currency,
            gained,
            penalty,
        };

        flags |= round_flags(&result, &potions, &spawned);
        let duration_ms = next
            .started_at
            .map_or(0, |started| request.now.millis_since(started));
        let total_damage_dealt = next.total_damage_dealt;
        let total_damage_taken = next.total_damage_taken;
        if result.defeat {
            next = next.cleared();
        }

        Ok(RoundTransition::Resolved(Box::new(ResolvedRound {
            session: next,
            experience: result.rewards.experience,
            result,
            roster: prepared.change,
            summary: prepared.summary,
            spawned,
            potions,
            currency,
            total_damage_dealt,
            total_damage_taken,
            duration_ms,
            flags,
        })))
    }

    fn drink(
        &self,
        request: &RoundRequest<'_>,
        session: &mut CombatSession,
        belt: &mut PotionBelt,
        phase: PotionPhase,
        log: &mut Vec<ConsumedPotion>,
    ) {
        let mut hp = Gauge::new(session.hp(), request.character.max_hp);
        let mut mana = Gauge::new(session.mana(), request.character.max_mana);
        let used = apply_auto_potions(&request.potion_settings, &mut hp, &mut mana, belt);

        session.current_hp = Some(hp.current);
        session.current_mana = Some(mana.current);
        log.extend(used.into_iter().map(|potion| ConsumedPotion { phase, potion }));
    }
}

fn round_flags(
    result: &crate::combat::RoundResult,
    potions: &[ConsumedPotion],
    spawned: &[usize],
) -> RoundFlags {
    let mut flags = RoundFlags::empty();
    flags.set(RoundFlags::SKILL_CAST, result.skill.is_some());
    flags.set(RoundFlags::CRIT, result.crit);
    flags.set(RoundFlags::KILL, !result.kills.is_empty());
    flags.set(RoundFlags::VICTORY, result.victory);
    flags.set(RoundFlags::DEFEAT, result.defeat);
    flags.set(RoundFlags::LOOT, !result.rewards.loot.is_empty());
    flags.set(RoundFlags::POTION_USED, !potions.is_empty());
    flags.set(RoundFlags::REPLENISHED, !spawned.is_empty());
    flags
}
