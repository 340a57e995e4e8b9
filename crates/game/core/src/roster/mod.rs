//! Monster slot manager.
//!
//! Decides, at the start of each round, whether the current roster is kept,
//! refreshed in place or regenerated, and rolls incremental spawns into
//! vacant slots after the round resolves. All slot operations keep the
//! five-slot shape; a dead monster stays in its slot as a corpse until it is
//! replaced.
mod error;
mod generate;

pub use error::RosterError;

use crate::config::CombatConfig;
use crate::env::{DifficultyMultipliers, MapDefinition, MonsterDefinition, RandomSource};
use crate::state::{CombatSession, MonsterSlots, Timestamp};

/// How [`MonsterRoster::prepare`] treated the incoming roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RosterChange {
    /// Living monsters present and no refresh due.
    Unchanged,
    /// Living monsters rebuilt from current definitions, HP carried over.
    Refreshed,
    /// Fresh encounter generated into an empty or fully dead roster.
    Generated,
}

/// Aggregate view of a roster for logs and events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterSummary {
    /// Slot of the first living monster.
    pub primary: Option<u8>,
    pub total_hp: u64,
    pub total_max_hp: u64,
}

impl RosterSummary {
    pub fn of(slots: &MonsterSlots) -> Self {
        Self {
            primary: slots.living().next().map(|m| m.position),
            total_hp: slots.total_hp(),
            total_max_hp: slots.total_max_hp(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRoster {
    pub slots: MonsterSlots,
    pub change: RosterChange,
    /// Set when the roster was regenerated or refreshed this round.
    pub refreshed_at: Option<Timestamp>,
    pub summary: RosterSummary,
}

impl PreparedRoster {
    /// A fresh encounter resets per-encounter session counters.
    pub fn is_new_encounter(&self) -> bool {
        self.change == RosterChange::Generated
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Replenishment {
    pub slots: MonsterSlots,
    /// Positions that received a new monster.
    pub spawned: Vec<usize>,
}

/// Roster rules for one map at one difficulty.
pub struct MonsterRoster<'a> {
    map: &'a MapDefinition,
    eligible: &'a [MonsterDefinition],
    multipliers: DifficultyMultipliers,
    config: &'a CombatConfig,
}

impl<'a> MonsterRoster<'a> {
    /// `eligible` is the map's monster list resolved against the content
    /// oracle (see [`MapDefinition::eligible_monsters`]).
    pub fn new(
        map: &'a MapDefinition,
        eligible: &'a [MonsterDefinition],
        multipliers: DifficultyMultipliers,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            map,
            eligible,
            multipliers,
            config,
        }
    }

    /// True when the roster has never been refreshed or the interval elapsed.
    pub fn refresh_due(&self, session: &CombatSession, now: Timestamp) -> bool {
        match session.monsters_refreshed_at {
            None => true,
            Some(at) => now.millis_since(at) >= self.config.refresh_interval_ms,
        }
    }

    pub fn prepare(
        &self,
        session: &CombatSession,
        now: Timestamp,
        rng: &mut impl RandomSource,
    ) -> Result<PreparedRoster, RosterError> {
        let current = &session.monster_slots;

        let (slots, change) = if !current.has_living() {
            (self.generate(rng)?, RosterChange::Generated)
        } else if self.refresh_due(session, now) {
            (self.refresh(current)?, RosterChange::Refreshed)
        } else {
            (current.clone(), RosterChange::Unchanged)
        };

        let refreshed_at = match change {
            RosterChange::Unchanged => session.monsters_refreshed_at,
            RosterChange::Refreshed | RosterChange::Generated => Some(now),
        };

        Ok(PreparedRoster {
            summary: RosterSummary::of(&slots),
            slots,
            change,
            refreshed_at,
        })
    }

    /// Generates a new encounter: one definition, 1 to 5 instances placed in
    /// random distinct slots.
    pub fn generate(&self, rng: &mut impl RandomSource) -> Result<MonsterSlots, RosterError> {
        let definition = self.pick_definition(rng)?;
        let base = generate::base_level(definition, self.map, self.config, rng);
        let count = 1 + rng.below(CombatConfig::MAX_INITIAL_SPAWN) as usize;

        let mut positions: Vec<usize> = (0..MonsterSlots::LEN).collect();
        rng.shuffle(&mut positions);

        let mut slots = MonsterSlots::new();
        for &position in positions.iter().take(count) {
            let level = generate::jitter_level(base, self.map, self.config, rng);
            let monster = generate::spawn_instance(
                definition,
                level,
                position,
                self.multipliers,
                self.config,
                false,
            );
            slots.place(position, monster);
        }
        Ok(slots)
    }

    /// Rebuilds living monsters from their current definitions at their
    /// existing level and slot. HP is capped at the new maximum; corpses and
    /// monsters whose definition left the map are kept as they are.
    pub fn refresh(&self, slots: &MonsterSlots) -> Result<MonsterSlots, RosterError> {
        if self.eligible.is_empty() {
            return Err(self.no_monsters());
        }

        let (map_min, map_max) = self.map.level_bounds();
        let mut refreshed = slots.clone();

        for position in slots.living_positions() {
            let Some(current) = slots.monster(position) else {
                continue;
            };
            let Some(definition) = self.definition(current) else {
                continue;
            };

            let level = current.level.clamp(map_min, map_max);
            let mut monster = generate::spawn_instance(
                definition,
                level,
                position,
                self.multipliers,
                self.config,
                current.is_new,
            );
            monster.hp = current.hp.min(monster.max_hp);
            refreshed.place(position, monster);
        }
        Ok(refreshed)
    }

    /// Rolls incremental spawns into vacant slots.
    ///
    /// With `force` the roll always succeeds; otherwise it succeeds with
    /// `spawn_chance_percent`. On success 1 to `max_spawn_per_round`
    /// instances of one random definition fill random vacant slots, marked
    /// new so they cannot be hit on their first round.
    pub fn replenish(
        &self,
        slots: &MonsterSlots,
        force: bool,
        rng: &mut impl RandomSource,
    ) -> Result<Replenishment, RosterError> {
        let mut vacant = slots.vacant_positions();
        if vacant.is_empty() {
            return Ok(Replenishment {
                slots: slots.clone(),
                spawned: Vec::new(),
            });
        }

        let chance = if force {
            100
        } else {
            self.config.spawn_chance_percent
        };
        if !rng.chance(chance) {
            return Ok(Replenishment {
                slots: slots.clone(),
                spawned: Vec::new(),
            });
        }

        let definition = self.pick_definition(rng)?;
        let base = generate::base_level(definition, self.map, self.config, rng);
        let max_spawn = self.config.max_spawn_per_round.max(1);
        let count = (1 + rng.below(max_spawn) as usize).min(vacant.len());
        rng.shuffle(&mut vacant);

        let mut replenished = slots.clone();
        let mut spawned: Vec<usize> = vacant.into_iter().take(count).collect();
        spawned.sort_unstable();

        for &position in &spawned {
            let level = generate::jitter_level(base, self.map, self.config, rng);
            let monster = generate::spawn_instance(
                definition,
                level,
                position,
                self.multipliers,
                self.config,
                true,
            );
            replenished.place(position, monster);
        }

        Ok(Replenishment {
            slots: replenished,
            spawned,
        })
    }

    fn pick_definition(
        &self,
        rng: &mut impl RandomSource,
    ) -> Result<&'a MonsterDefinition, RosterError> {
        if self.eligible.is_empty() {
            return Err(self.no_monsters());
        }
        let index = rng.below(self.eligible.len() as u32) as usize;
        Ok(&self.eligible[index])
    }

    fn definition(&self, monster: &crate::state::MonsterInstance) -> Option<&'a MonsterDefinition> {
        self.eligible
            .iter()
            .find(|definition| definition.id == monster.definition_id)
    }

    fn no_monsters(&self) -> RosterError {
        RosterError::NoMonstersAvailable { map: self.map.id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRolls;
    use crate::env::fixtures::{meadow, rat};
    use crate::state::{CharacterId, fixtures::monster};

    fn roster<'a>(
        map: &'a MapDefinition,
        eligible: &'a [MonsterDefinition],
        config: &'a CombatConfig,
    ) -> MonsterRoster<'a> {
        MonsterRoster::new(map, eligible, DifficultyMultipliers::NEUTRAL, config)
    }

    #[test]
    fn living_roster_is_kept_until_refresh_is_due() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut session = CombatSession::new(CharacterId(1));
        session.monster_slots.place(2, monster(2, 40));
        session.monsters_refreshed_at = Some(Timestamp::from_millis(1_000));

        let prepared = roster
            .prepare(&session, Timestamp::from_millis(2_000), &mut ScriptedRolls::new([]))
            .unwrap();

        assert_eq!(prepared.change, RosterChange::Unchanged);
        assert_eq!(prepared.slots, session.monster_slots);
        assert_eq!(prepared.refreshed_at, Some(Timestamp::from_millis(1_000)));
        assert_eq!(prepared.summary.primary, Some(2));
        assert_eq!(prepared.summary.total_hp, 40);
    }

    #[test]
    fn refresh_fires_exactly_at_the_interval() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let at = Timestamp::from_millis(5_000);
        let mut wounded = monster(2, 40);
        wounded.level = 5;
        let mut session = CombatSession::new(CharacterId(1));
        session.monster_slots.place(2, wounded);
        session.monsters_refreshed_at = Some(at);

        let early = Timestamp::from_millis(5_000 + config.refresh_interval_ms as i64 - 1);
        assert!(!roster.refresh_due(&session, early));
        let kept = roster
            .prepare(&session, early, &mut ScriptedRolls::new([]))
            .unwrap();
        assert_eq!(kept.change, RosterChange::Unchanged);
        assert_eq!(kept.refreshed_at, Some(at));

        let due = Timestamp::from_millis(5_000 + config.refresh_interval_ms as i64);
        assert!(roster.refresh_due(&session, due));
        let mut rolls = ScriptedRolls::new([]);
        let refreshed = roster.prepare(&session, due, &mut rolls).unwrap();
        assert_eq!(refreshed.change, RosterChange::Refreshed);
        assert_eq!(refreshed.refreshed_at, Some(due));
        assert!(!refreshed.is_new_encounter());
        let monster = refreshed.slots.monster(2).unwrap();
        assert_eq!(monster.hp, 40);
        assert_eq!(monster.level, 5);
        assert_eq!(monster.max_hp, 100);
    }

    #[test]
    fn empty_roster_generates_encounter() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);
        let session = CombatSession::new(CharacterId(1));

        // definition 0, base level range [2, 8] → 5, count 1 + 2 = 3,
        // shuffle draws, then level jitter rolls of +0.
        let mut rolls = ScriptedRolls::new([0, 3, 2, 0, 0, 0, 0, 1, 1, 1]);
        let now = Timestamp::from_millis(500);
        let prepared = roster.prepare(&session, now, &mut rolls).unwrap();

        assert_eq!(prepared.change, RosterChange::Generated);
        assert!(prepared.is_new_encounter());
        assert_eq!(prepared.refreshed_at, Some(now));
        assert_eq!(prepared.slots.living_count(), 3);
        for monster in prepared.slots.living() {
            assert_eq!(monster.level, 5);
            assert_eq!(monster.max_hp, 100);
            assert!(!monster.is_new);
            assert!(prepared.slots.monster(monster.position as usize).is_some());
        }
    }

    #[test]
    fn generated_roster_never_exceeds_five() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut rolls = ScriptedRolls::new([0, 0, 4]);
        let slots = roster.generate(&mut rolls).unwrap();
        assert_eq!(slots.living_count(), MonsterSlots::LEN);
        for (index, slot) in slots.iter().enumerate() {
            assert_eq!(slot.monster().unwrap().position as usize, index);
        }
    }

    #[test]
    fn all_dead_roster_regenerates() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut session = CombatSession::new(CharacterId(1));
        session.monster_slots.place(0, monster(0, 0));
        session.monsters_refreshed_at = Some(Timestamp::from_millis(1_000));

        let prepared = roster
            .prepare(&session, Timestamp::from_millis(1_001), &mut ScriptedRolls::new([]))
            .unwrap();
        assert_eq!(prepared.change, RosterChange::Generated);
        assert!(prepared.slots.has_living());
    }

    #[test]
    fn refresh_keeps_hp_capped_at_new_maximum() {
        let map = meadow();
        let mut weaker = rat();
        weaker.hp = 30;
        let eligible = vec![weaker];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut wounded = monster(1, 60);
        wounded.level = 5;
        wounded.max_hp = 100;
        let mut session = CombatSession::new(CharacterId(1));
        session.monster_slots.place(1, wounded);
        session.monster_slots.place(3, monster(3, 0));

        let prepared = roster
            .prepare(&session, Timestamp::from_millis(0), &mut ScriptedRolls::new([]))
            .unwrap();

        assert_eq!(prepared.change, RosterChange::Refreshed);
        let refreshed = prepared.slots.monster(1).unwrap();
        assert_eq!(refreshed.max_hp, 30);
        assert_eq!(refreshed.hp, 30);
        assert_eq!(refreshed.attack, 20);
        // corpse untouched
        assert_eq!(prepared.slots.monster(3).unwrap().hp, 0);
    }

    #[test]
    fn empty_map_is_reported() {
        let map = meadow();
        let config = CombatConfig::new();
        let roster = roster(&map, &[], &config);
        let session = CombatSession::new(CharacterId(1));

        let err = roster
            .prepare(&session, Timestamp::EPOCH, &mut ScriptedRolls::new([]))
            .unwrap_err();
        assert_eq!(err, RosterError::NoMonstersAvailable { map: map.id });
    }

    #[test]
    fn forced_replenish_fills_vacant_slots_with_new_monsters() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut slots = MonsterSlots::new();
        slots.place(0, monster(0, 0));

        // chance roll 99 still passes when forced; count 1 + 1 = 2
        let mut rolls = ScriptedRolls::new([99, 0, 3, 1]);
        let outcome = roster.replenish(&slots, true, &mut rolls).unwrap();

        assert_eq!(outcome.spawned.len(), 2);
        for &position in &outcome.spawned {
            let spawned = outcome.slots.monster(position).unwrap();
            assert!(spawned.is_new);
            assert_eq!(spawned.position as usize, position);
        }
        assert_eq!(outcome.slots.living_count(), 2);
    }

    #[test]
    fn replenish_roll_can_fail() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut slots = MonsterSlots::new();
        slots.place(0, monster(0, 5));

        let mut rolls = ScriptedRolls::new([30]);
        let outcome = roster.replenish(&slots, false, &mut rolls).unwrap();
        assert!(outcome.spawned.is_empty());
        assert_eq!(outcome.slots, slots);
    }

    #[test]
    fn full_roster_is_not_replenished() {
        let map = meadow();
        let eligible = vec![rat()];
        let config = CombatConfig::new();
        let roster = roster(&map, &eligible, &config);

        let mut slots = MonsterSlots::new();
        for position in 0..MonsterSlots::LEN {
            slots.place(position, monster(position as u8, 5));
        }

        let mut rolls = ScriptedRolls::new([]);
        let outcome = roster.replenish(&slots, true, &mut rolls).unwrap();
        assert!(outcome.spawned.is_empty());
        assert_eq!(rolls.remaining(), 0);
    }
}
