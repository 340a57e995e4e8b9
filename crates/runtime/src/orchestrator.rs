//! Per-character round execution.
//!
//! [`CombatOrchestrator`] reads everything a round needs, runs the
//! [`CombatEngine`], commits the outcome in one store transaction and then
//! publishes events. Rounds for the same character are serialised by a
//! per-character lock; different characters proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use combat_core::{
    CharacterId, CombatEngine, CombatPhase, CombatSession, MapId, PotionStack, ResolvedRound,
    RollStream, RoundRequest, RoundTransition, SkillId, StopReason, Timestamp,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::api::{Result, RuntimeError};
use crate::clock::Clock;
use crate::events::{
    CharacterSnapshot, DefeatEvent, Event, EventBus, LifecycleEvent, MonsterView, RoundEvent,
};
use crate::oracle::OracleManager;
use crate::repository::{
    CharacterRecord, CombatLog, CombatLogEntry, CombatStore, InventoryDecrement, InventoryItem,
    LogId, LogKind, RoundCommit,
};

/// A committed round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub log_id: LogId,
    pub defeat_log_id: Option<LogId>,
    pub round: ResolvedRound,
    /// The event published for this round.
    pub event: RoundEvent,
}

#[derive(Debug, Clone)]
pub enum RoundOutcome {
    Resolved(Box<RoundReport>),
    AutoStopped { reason: StopReason, last_hp: u32 },
}

impl RoundOutcome {
    pub fn is_defeat(&self) -> bool {
        matches!(self, RoundOutcome::Resolved(report) if report.round.is_defeat())
    }

    /// True when the character is no longer fighting after this round.
    pub fn ends_combat(&self) -> bool {
        match self {
            RoundOutcome::Resolved(report) => report.round.is_defeat(),
            RoundOutcome::AutoStopped { .. } => true,
        }
    }
}

/// Read-only view of a character's combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatStatus {
    pub character: CharacterId,
    pub phase: CombatPhase,
    pub map: Option<MapId>,
    pub round_number: u64,
    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub monsters: Vec<Option<MonsterView>>,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
}

/// Draws one base seed per round.
struct SeedSource(Mutex<StdRng>);

impl SeedSource {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self(Mutex::new(rng))
    }

    fn next(&self) -> u64 {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).r#gen()
    }
}

/// One async mutex per character with a round in flight. An entry is
/// dropped once its last holder or waiter lets go.
#[derive(Default)]
struct CharacterLocks(Mutex<HashMap<CharacterId, Arc<tokio::sync::Mutex<()>>>>);

impl CharacterLocks {
    async fn acquire(&self, id: CharacterId) -> CharacterGuard<'_> {
        let lock = {
            let mut locks = self.map();
            Arc::clone(locks.entry(id).or_default())
        };
        CharacterGuard {
            locks: self,
            id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<CharacterId, Arc<tokio::sync::Mutex<()>>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.map().len()
    }
}

struct CharacterGuard<'a> {
    locks: &'a CharacterLocks,
    id: CharacterId,
    guard: Option<tokio::sync::OwnedMutexGuard<()>>,
}

impl Drop for CharacterGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // New holders clone under the map lock, so a count of one is final.
        let mut locks = self.locks.map();
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

pub struct CombatOrchestrator {
    store: Arc<dyn CombatStore>,
    oracles: OracleManager,
    events: EventBus,
    clock: Arc<dyn Clock>,
    seeds: SeedSource,
    locks: CharacterLocks,
}

impl CombatOrchestrator {
    pub fn new(
        store: Arc<dyn CombatStore>,
        oracles: OracleManager,
        events: EventBus,
        clock: Arc<dyn Clock>,
        seed: Option<u64>,
    ) -> Self {
        Self {
            store,
            oracles,
            events,
            clock,
            seeds: SeedSource::new(seed),
            locks: CharacterLocks::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn CombatStore> {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    /// Marks the character as fighting. Idempotent.
    pub async fn start(&self, id: CharacterId) -> Result<CombatSession> {
        let _guard = self.locks.acquire(id).await;

        let record = self.character(id)?;
        let map = self.hunting_ground(&record)?;

        let mut session = self.session(id)?;
        if session.is_fighting {
            return Ok(session);
        }
        session.is_fighting = true;
        session.started_at = Some(self.clock.now());
        self.store.save_session(&session)?;

        tracing::info!(character = %id, %map, "Combat started");
        self.events
            .publish(Event::Lifecycle(LifecycleEvent::Started { character: id, map }));
        Ok(session)
    }

    /// Clears the fighting flag. Returns false when the character was not
    /// fighting. Counters and the roster are kept.
    pub async fn stop(&self, id: CharacterId) -> Result<bool> {
        let _guard = self.locks.acquire(id).await;

        let Some(mut session) = self.store.session(id)? else {
            return Ok(false);
        };
        if !session.is_fighting {
            return Ok(false);
        }
        session.is_fighting = false;
        self.store.save_session(&session)?;

        tracing::info!(character = %id, round = session.round_number, "Combat stopped");
        self.events
            .publish(Event::Lifecycle(LifecycleEvent::Stopped { character: id }));
        Ok(true)
    }

    /// Runs one round on demand, starting combat if the character is idle.
    pub async fn run_round(&self, id: CharacterId, requested: &[SkillId]) -> Result<RoundOutcome> {
        let _guard = self.locks.acquire(id).await;

        let session = self.session(id)?;
        self.execute(id, session, requested)
    }

    /// Runs one round for a ticker. Returns `None` without side effects when
    /// the character is no longer fighting.
    pub async fn run_scheduled_round(
        &self,
        id: CharacterId,
        requested: &[SkillId],
    ) -> Result<Option<RoundOutcome>> {
        let _guard = self.locks.acquire(id).await;

        let session = self.session(id)?;
        if !session.is_fighting {
            tracing::debug!(character = %id, "Skipping scheduled round; not fighting");
            return Ok(None);
        }
        self.execute(id, session, requested).map(Some)
    }

    pub fn status(&self, id: CharacterId) -> Result<CombatStatus> {
        let record = self.character(id)?;
        let session = self.session(id)?;
        Ok(CombatStatus {
            character: id,
            phase: session.phase(),
            map: record.current_map,
            round_number: session.round_number,
            hp: session.current_hp.unwrap_or(record.stats.max_hp),
            max_hp: record.stats.max_hp,
            mana: session.current_mana.unwrap_or(record.stats.max_mana),
            max_mana: record.stats.max_mana,
            monsters: MonsterView::roster(&session.monster_slots),
            total_damage_dealt: session.total_damage_dealt,
            total_damage_taken: session.total_damage_taken,
        })
    }

    pub fn logs(&self, id: CharacterId, limit: usize) -> Result<Vec<CombatLogEntry>> {
        Ok(self.store.logs(id, limit)?)
    }

    // ========================================================================
    // Round transaction
    // ========================================================================

    fn execute(
        &self,
        id: CharacterId,
        session: CombatSession,
        requested: &[SkillId],
    ) -> Result<RoundOutcome> {
        let record = self.character(id)?;
        let map_id = self.hunting_ground(&record)?;
        let map = self
            .oracles
            .map(map_id)
            .ok_or(RuntimeError::MapNotFound(map_id))?;
        let learned = self.oracles.learned_skills(&record.skills);
        let potions: Vec<PotionStack> = self
            .store
            .inventory(id)?
            .iter()
            .filter_map(InventoryItem::as_potion)
            .collect();

        let now = self.clock.now();
        let seed = self.seeds.next();
        let mut rng = RollStream::new(seed, session.round_number + 1, id.0);

        let engine = CombatEngine::new(self.oracles.config(), self.oracles.combat_env());
        let transition = engine.run_round(
            RoundRequest {
                session: &session,
                character: &record.stats,
                map: &map,
                learned: &learned,
                requested,
                potions: &potions,
                potion_settings: record.auto_potions,
                now,
            },
            &mut rng,
        )?;

        match transition {
            RoundTransition::AutoStopped {
                reason,
                session: stopped,
                last_hp,
            } => {
                self.store.save_session(&stopped)?;
                tracing::warn!(character = %id, %reason, last_hp, "Combat auto-stopped");
                self.events
                    .publish(Event::Lifecycle(LifecycleEvent::AutoStopped {
                        character: id,
                        reason,
                        last_hp,
                    }));
                Ok(RoundOutcome::AutoStopped { reason, last_hp })
            }
            RoundTransition::Resolved(round) => {
                let round = *round;
                let commit = round_commit(id, &round, now);
                let logs = self.store.commit(commit)?;

                if !session.is_fighting {
                    tracing::info!(character = %id, map = %map_id, "Combat started");
                    self.events.publish(Event::Lifecycle(LifecycleEvent::Started {
                        character: id,
                        map: map_id,
                    }));
                }

                let event = round_event(&record, &round, logs.round);
                tracing::debug!(
                    character = %id,
                    round = round.result.round_number,
                    dealt = round.result.damage_dealt,
                    taken = round.result.damage_taken,
                    seed,
                    "Round committed as {}",
                    logs.round
                );
                self.events.publish(Event::Round(Box::new(event.clone())));

                if let Some(defeat_log) = logs.defeat {
                    tracing::info!(
                        character = %id,
                        round = round.result.round_number,
                        penalty = round.currency.penalty,
                        "Character defeated"
                    );
                    self.events.publish(Event::Defeat(DefeatEvent {
                        character: id,
                        log_id: defeat_log,
                        round_number: round.result.round_number,
                        total_damage_dealt: round.total_damage_dealt,
                        total_damage_taken: round.total_damage_taken,
                        duration_ms: round.duration_ms,
                        currency_lost: round.currency.penalty,
                    }));
                }

                Ok(RoundOutcome::Resolved(Box::new(RoundReport {
                    log_id: logs.round,
                    defeat_log_id: logs.defeat,
                    round,
                    event,
                })))
            }
        }
    }

    fn character(&self, id: CharacterId) -> Result<CharacterRecord> {
        self.store
            .character(id)?
            .ok_or(RuntimeError::CharacterNotFound(id))
    }

    fn session(&self, id: CharacterId) -> Result<CombatSession> {
        Ok(self
            .store
            .session(id)?
            .unwrap_or_else(|| CombatSession::new(id)))
    }

    fn hunting_ground(&self, record: &CharacterRecord) -> Result<MapId> {
        let map = record
            .current_map
            .ok_or(RuntimeError::NoMapSelected(record.id()))?;
        if self.oracles.map(map).is_none() {
            return Err(RuntimeError::MapNotFound(map));
        }
        Ok(map)
    }
}

fn round_commit(id: CharacterId, round: &ResolvedRound, now: Timestamp) -> RoundCommit {
    let result = &round.result;
    let log = CombatLog {
        character: id,
        kind: LogKind::Round,
        recorded_at: now,
        round_number: result.round_number,
        damage_dealt: result.damage_dealt,
        damage_taken: result.damage_taken,
        victory: result.victory,
        experience: round.experience,
        currency_gained: round.currency.gained,
        currency_lost: round.currency.penalty,
        loot: result.rewards.loot.clone(),
        skills_used: result.skills_used.clone(),
        potions: round.potions.clone(),
        duration_ms: round.duration_ms,
        flags: round.flags,
    };
    let defeat_log = round.is_defeat().then(|| CombatLog {
        kind: LogKind::Defeat,
        damage_dealt: round.total_damage_dealt,
        damage_taken: round.total_damage_taken,
        ..log.clone()
    });

    RoundCommit {
        character: id,
        session: round.session.clone(),
        decrements: round
            .potions
            .iter()
            .map(|consumed| InventoryDecrement {
                item_id: consumed.potion.item_id,
                expected_quantity: consumed.potion.expected_quantity,
            })
            .collect(),
        loot: result.rewards.loot.clone(),
        experience: round.experience,
        currency_gained: round.currency.gained,
        currency_lost: round.currency.penalty,
        log,
        defeat_log,
    }
}

fn round_event(record: &CharacterRecord, round: &ResolvedRound, log_id: LogId) -> RoundEvent {
    let result = &round.result;
    // A defeat clears the session; report the roster as the round left it.
    let slots = if round.is_defeat() {
        &result.slots
    } else {
        &round.session.monster_slots
    };

    RoundEvent {
        character: record.id(),
        log_id,
        round_number: result.round_number,
        monsters: MonsterView::roster(slots),
        damage_dealt: result.damage_dealt,
        damage_taken: result.damage_taken,
        experience: round.experience,
        currency: round.currency.gained,
        loot: result.rewards.loot.clone(),
        skills_used: result.skills_used.clone(),
        potions: round.potions.clone(),
        snapshot: CharacterSnapshot {
            hp: round.session.current_hp.unwrap_or(result.hp),
            max_hp: record.stats.max_hp,
            mana: round.session.current_mana.unwrap_or(result.mana),
            max_mana: record.stats.max_mana,
            currency: round.currency.after(),
            experience: record.stats.experience.saturating_add(round.experience),
        },
        flags: round.flags,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn character_lock_is_released_after_the_last_holder() {
        let locks = Arc::new(CharacterLocks::default());
        {
            let _guard = locks.acquire(CharacterId(1)).await;
            let _other = locks.acquire(CharacterId(2)).await;
            assert_eq!(locks.len(), 2);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn waiting_holder_keeps_the_entry() {
        let locks = Arc::new(CharacterLocks::default());
        let first = locks.acquire(CharacterId(1)).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(CharacterId(1)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(first);
        assert_eq!(locks.len(), 1);
        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
