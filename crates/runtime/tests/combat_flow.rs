//! Round transactions driven through the handle.
mod common;

use std::sync::Arc;

use combat_core::{
    CharacterId, CombatConfig, CombatPhase, CombatSession, ItemId, PotionKind, RoundFlags,
    StopReason,
};
use combat_runtime::{
    CombatStore, Event, InMemoryCombatStore, InventoryItem, LifecycleEvent, LogKind,
    RoundOutcome, RuntimeError, Topic,
};

use common::*;

fn resolved(outcome: RoundOutcome) -> Box<combat_runtime::RoundReport> {
    match outcome {
        RoundOutcome::Resolved(report) => report,
        other => panic!("expected a resolved round, got {other:?}"),
    }
}

#[tokio::test]
async fn manual_round_starts_combat_and_commits() {
    let test = runtime_for(hero());
    let handle = test.runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let mut combat = handle.subscribe(Topic::Combat);

    let report = resolved(handle.run_round(HERO, &[]).await.unwrap());
    let round = &report.round;
    let living = round.session.monster_slots.living_count() as u64;

    assert!(round.flags.contains(RoundFlags::NEW_ENCOUNTER));
    assert_eq!(round.result.round_number, 1);
    assert_eq!(round.result.damage_dealt, 45);
    assert_eq!(round.result.damage_taken, 14 * living);
    assert_eq!(round.session.current_hp, Some(200 - 14 * living as u32));
    assert!(round.session.is_fighting);

    match next_event(&mut lifecycle).await {
        Event::Lifecycle(LifecycleEvent::Started { character, map }) => {
            assert_eq!(character, HERO);
            assert_eq!(map, MEADOW);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match next_event(&mut combat).await {
        Event::Round(event) => {
            assert_eq!(event.log_id, report.log_id);
            assert_eq!(event.monsters.len(), 5);
            assert_eq!(event.snapshot.hp, 200 - 14 * living as u32);
            assert_eq!(event.snapshot.currency, 1_000);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let stored = test.store.session(HERO).unwrap().unwrap();
    assert_eq!(stored, round.session);
    let logs = handle.logs(HERO, 10).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].log.kind, LogKind::Round);
}

#[tokio::test]
async fn consecutive_rounds_accumulate_damage() {
    let test = runtime_for(hero());
    let handle = test.runtime.handle();

    resolved(handle.run_round(HERO, &[]).await.unwrap());
    let second = resolved(handle.run_round(HERO, &[]).await.unwrap());

    let session = &second.round.session;
    assert_eq!(session.round_number, 2);
    assert_eq!(session.total_damage_dealt, 90);

    let status = handle.status(HERO).unwrap();
    assert_eq!(status.phase, CombatPhase::InCombat);
    assert_eq!(status.round_number, 2);
    assert_eq!(status.total_damage_taken, session.total_damage_taken);
}

#[tokio::test]
async fn roster_refreshes_after_one_interval_and_keeps_hp() {
    let test = runtime_for(hero());
    let handle = test.runtime.handle();

    let first = resolved(handle.run_round(HERO, &[]).await.unwrap());
    let before = first.round.session.monster_slots.clone();
    assert!(!first.round.flags.contains(RoundFlags::REFRESHED));

    test.clock.advance(CombatConfig::DEFAULT_REFRESH_INTERVAL_MS);
    let second = resolved(handle.run_round(HERO, &[]).await.unwrap());
    let round = &second.round;

    assert!(round.flags.contains(RoundFlags::REFRESHED));
    assert!(!round.flags.contains(RoundFlags::NEW_ENCOUNTER));
    assert_eq!(round.session.round_number, 2);
    assert!(round.result.kills.is_empty());
    assert_eq!(
        round.session.monster_slots.total_hp(),
        before.total_hp() - round.result.damage_dealt
    );
    for position in before.living_positions() {
        let kept = before.monster(position).unwrap();
        let refreshed = round.session.monster_slots.monster(position).unwrap();
        assert_eq!(refreshed.level, kept.level);
        assert_eq!(refreshed.max_hp, kept.max_hp);
    }
}

#[tokio::test]
async fn kill_rewards_reach_the_character() {
    let mut record = hero();
    record.stats.attack = 1_000;
    let test = runtime_for(record);
    let handle = test.runtime.handle();

    let report = resolved(handle.run_round(HERO, &[]).await.unwrap());
    assert_eq!(report.round.result.kills.len(), 1);
    assert_eq!(report.round.experience, 30);
    assert_eq!(report.round.currency.gained, 10);

    let stats = test.store.character(HERO).unwrap().unwrap().stats;
    assert_eq!(stats.experience, 30);
    assert_eq!(stats.currency, 1_010);
    assert_eq!(report.event.snapshot.experience, 30);
}

#[tokio::test]
async fn skill_cast_spends_mana_and_sets_cooldown() {
    let test = runtime_for(hero());
    let handle = test.runtime.handle();

    let report = resolved(handle.run_round(HERO, &[POWER_STRIKE]).await.unwrap());
    let round = &report.round;

    assert_eq!(round.result.damage_dealt, 60);
    assert_eq!(round.session.current_mana, Some(40));
    assert_eq!(round.session.skill_cooldowns.get(&POWER_STRIKE), Some(&3));
    assert_eq!(report.event.skills_used, vec![POWER_STRIKE]);

    // On cooldown: falls back to a basic attack.
    let next = resolved(handle.run_round(HERO, &[POWER_STRIKE]).await.unwrap());
    assert!(next.round.result.skill.is_none());
    assert_eq!(next.round.session.current_mana, Some(40));
}

#[tokio::test]
async fn defeat_applies_penalty_and_clears_session() {
    let mut record = hero();
    record.stats.max_hp = 10;
    record.stats.defense = 0;
    let test = runtime_for(record);
    let handle = test.runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    let outcome = handle.run_round(HERO, &[]).await.unwrap();
    assert!(outcome.is_defeat());
    assert!(outcome.ends_combat());
    let report = resolved(outcome);
    assert_eq!(report.round.currency.penalty, 100);
    assert_eq!(report.round.session, CombatSession::new(HERO));

    let stats = test.store.character(HERO).unwrap().unwrap().stats;
    assert_eq!(stats.currency, 900);
    assert_eq!(test.store.session(HERO).unwrap(), Some(CombatSession::new(HERO)));

    let logs = handle.logs(HERO, 10).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].log.kind, LogKind::Defeat);
    assert_eq!(logs[0].log.currency_lost, 100);
    assert_eq!(Some(logs[0].id), report.defeat_log_id);

    assert!(matches!(next_event(&mut combat).await, Event::Round(_)));
    match next_event(&mut combat).await {
        Event::Defeat(event) => {
            assert_eq!(event.currency_lost, 100);
            assert_eq!(event.round_number, 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn zero_hp_session_auto_stops() {
    let test = runtime_for(hero());
    let mut session = CombatSession::new(HERO);
    session.is_fighting = true;
    session.current_hp = Some(0);
    session.round_number = 4;
    test.store.save_session(&session).unwrap();

    let handle = test.runtime.handle();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let outcome = handle.run_round(HERO, &[]).await.unwrap();

    assert!(matches!(
        outcome,
        RoundOutcome::AutoStopped {
            reason: StopReason::OutOfHealth,
            last_hp: 0
        }
    ));
    assert_eq!(test.store.session(HERO).unwrap(), Some(CombatSession::new(HERO)));
    assert!(handle.logs(HERO, 10).unwrap().is_empty());
    assert!(matches!(
        next_event(&mut lifecycle).await,
        Event::Lifecycle(LifecycleEvent::AutoStopped {
            reason: StopReason::OutOfHealth,
            ..
        })
    ));
}

#[tokio::test]
async fn empty_map_auto_stops_without_clearing() {
    let mut record = hero();
    record.current_map = Some(EMPTY_FIELD);
    let test = runtime_for(record);

    let outcome = test.runtime.handle().run_round(HERO, &[]).await.unwrap();
    assert!(matches!(
        outcome,
        RoundOutcome::AutoStopped {
            reason: StopReason::NoMonsters,
            ..
        }
    ));
    let session = test.store.session(HERO).unwrap().unwrap();
    assert!(!session.is_fighting);
}

#[tokio::test]
async fn pre_round_potion_is_decremented() {
    let mut record = hero();
    record.auto_potions.hp_enabled = true;
    // 60/200 sits under 31%; after the round HP stays above it.
    record.auto_potions.hp_threshold = 31;
    let test = runtime_for(record);
    test.store
        .grant_item(
            HERO,
            InventoryItem::potion(ItemId(3001), "Red Potion", PotionKind::Hp, 80, 2),
        )
        .unwrap();
    let mut session = CombatSession::new(HERO);
    session.is_fighting = true;
    session.current_hp = Some(60);
    test.store.save_session(&session).unwrap();

    let report = resolved(test.runtime.handle().run_round(HERO, &[]).await.unwrap());
    assert_eq!(report.round.potions.len(), 1);
    assert_eq!(report.round.potions[0].potion.restored, 80);
    assert!(report.round.flags.contains(RoundFlags::POTION_USED));

    let inventory = test.store.inventory(HERO).unwrap();
    assert_eq!(inventory[0].quantity, 1);
}

#[tokio::test]
async fn stale_inventory_read_discards_the_round() {
    let mut record = hero();
    record.auto_potions.hp_enabled = true;
    record.auto_potions.hp_threshold = 100;
    let inner = Arc::new(InMemoryCombatStore::new());
    inner.upsert_character(record).unwrap();
    inner
        .grant_item(
            HERO,
            InventoryItem::potion(ItemId(3001), "Red Potion", PotionKind::Hp, 80, 2),
        )
        .unwrap();
    let store: Arc<dyn CombatStore> = Arc::new(StaleInventory(inner));
    let test = runtime_with(store, std::time::Duration::from_millis(20));

    let err = test.runtime.handle().run_round(HERO, &[]).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::InventoryConflict {
            expected: 3,
            actual: 2,
            ..
        }
    ));
    assert!(err.is_retryable());
    assert!(test.store.session(HERO).unwrap().is_none());
    assert_eq!(test.store.character(HERO).unwrap().unwrap().stats.currency, 1_000);
}

#[tokio::test]
async fn missing_character_and_map_are_rejected() {
    let mut record = hero();
    record.current_map = None;
    let test = runtime_for(record);
    let handle = test.runtime.handle();

    let err = handle.run_round(HERO, &[]).await.unwrap_err();
    assert!(matches!(err, RuntimeError::NoMapSelected(HERO)));

    let err = handle.run_round(CharacterId(404), &[]).await.unwrap_err();
    assert!(matches!(err, RuntimeError::CharacterNotFound(CharacterId(404))));
    assert!(!err.is_retryable());
}

/// Reports one more potion than is actually held, as if another writer
/// consumed one between the read and the commit.
struct StaleInventory(Arc<InMemoryCombatStore>);

impl CombatStore for StaleInventory {
    fn character(
        &self,
        id: CharacterId,
    ) -> combat_runtime::repository::Result<Option<combat_runtime::CharacterRecord>> {
        self.0.character(id)
    }

    fn upsert_character(
        &self,
        record: combat_runtime::CharacterRecord,
    ) -> combat_runtime::repository::Result<()> {
        self.0.upsert_character(record)
    }

    fn set_current_map(
        &self,
        id: CharacterId,
        map: Option<combat_core::MapId>,
    ) -> combat_runtime::repository::Result<()> {
        self.0.set_current_map(id, map)
    }

    fn inventory(&self, id: CharacterId) -> combat_runtime::repository::Result<Vec<InventoryItem>> {
        let mut items = self.0.inventory(id)?;
        for item in &mut items {
            item.quantity += 1;
        }
        Ok(items)
    }

    fn grant_item(&self, id: CharacterId, item: InventoryItem) -> combat_runtime::repository::Result<()> {
        self.0.grant_item(id, item)
    }

    fn session(&self, id: CharacterId) -> combat_runtime::repository::Result<Option<CombatSession>> {
        self.0.session(id)
    }

    fn save_session(&self, session: &CombatSession) -> combat_runtime::repository::Result<()> {
        self.0.save_session(session)
    }

    fn commit(
        &self,
        commit: combat_runtime::repository::RoundCommit,
    ) -> combat_runtime::repository::Result<combat_runtime::repository::CommittedLogs> {
        self.0.commit(commit)
    }

    fn logs(
        &self,
        id: CharacterId,
        limit: usize,
    ) -> combat_runtime::repository::Result<Vec<combat_runtime::CombatLogEntry>> {
        self.0.logs(id, limit)
    }
}
