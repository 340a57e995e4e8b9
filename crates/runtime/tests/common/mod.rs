//! Shared fixtures for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use combat_content::{ContentCatalog, ContentTables};
use combat_core::{
    AutoPotionSettings, CharacterId, CharacterStats, CombatConfig, DifficultyTier, DropTable,
    ItemId, LootEntry, MapDefinition, MapId, MonsterDefinition, MonsterId, SkillDefinition,
    SkillId, TargetType, Timestamp,
};
use combat_runtime::{
    CharacterRecord, CombatStore, Event, InMemoryCombatStore, KnownSkill, ManualClock,
    OracleManager, Runtime, RuntimeConfig,
};
use tokio::sync::broadcast;

pub const HERO: CharacterId = CharacterId(7);
pub const MEADOW: MapId = MapId(1);
pub const EMPTY_FIELD: MapId = MapId(2);
pub const POWER_STRIKE: SkillId = SkillId(1);

/// One level-5 rat per slot, no level variance, no chance spawns.
pub fn catalog() -> ContentCatalog {
    ContentCatalog {
        config: CombatConfig {
            level_spread: 0,
            level_jitter: 0,
            spawn_chance_percent: 0,
            ..CombatConfig::default()
        },
        tables: ContentTables::default(),
        monsters: vec![MonsterDefinition {
            id: MonsterId(1),
            name: "Cave Rat".to_string(),
            kind: "beast".to_string(),
            level: 5,
            hp: 100,
            attack: 20,
            defense: 10,
            experience: 30,
            drops: Some(DropTable {
                item_chance: 0,
                copper_chance: 100,
                copper_base: 10,
                copper_range: 0,
                items: vec![LootEntry {
                    item_id: ItemId(2001),
                    name: "Rat Tail".to_string(),
                }],
            }),
        }],
        maps: vec![
            MapDefinition {
                id: MEADOW,
                name: "Meadow".to_string(),
                min_level: 1,
                max_level: 10,
                monsters: vec![MonsterId(1)],
            },
            MapDefinition {
                id: EMPTY_FIELD,
                name: "Empty Field".to_string(),
                min_level: 1,
                max_level: 10,
                monsters: Vec::new(),
            },
        ],
        skills: vec![SkillDefinition {
            id: POWER_STRIKE,
            name: "Power Strike".to_string(),
            mana_cost: 10,
            cooldown: 2,
            damage: 15,
            target: TargetType::Single,
        }],
    }
}

/// Attack 50 hits a rat for 45; each living rat hits back for 14.
pub fn hero() -> CharacterRecord {
    CharacterRecord {
        name: "Hero".to_string(),
        stats: CharacterStats {
            id: HERO,
            attack: 50,
            defense: 20,
            crit_rate: 0.0,
            crit_damage: 1.5,
            max_hp: 200,
            max_mana: 50,
            currency: 1_000,
            experience: 0,
            difficulty: DifficultyTier::Normal,
        },
        current_map: Some(MEADOW),
        auto_potions: AutoPotionSettings::disabled(),
        skills: vec![KnownSkill {
            id: POWER_STRIKE,
            active: true,
        }],
    }
}

pub struct TestRuntime {
    pub runtime: Runtime,
    pub store: Arc<dyn CombatStore>,
    pub clock: Arc<ManualClock>,
}

pub fn runtime_with(store: Arc<dyn CombatStore>, interval: Duration) -> TestRuntime {
    let clock = Arc::new(ManualClock::new(Timestamp(1_000_000)));
    let config = RuntimeConfig {
        round_interval: interval,
        seed: Some(42),
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .oracles(OracleManager::from_catalog(catalog()))
        .store(Arc::clone(&store))
        .clock(clock.clone())
        .build()
        .expect("runtime builds");
    TestRuntime {
        runtime,
        store,
        clock,
    }
}

/// Memory-backed runtime with `record` already stored.
pub fn runtime_for(record: CharacterRecord) -> TestRuntime {
    let store: Arc<dyn CombatStore> = Arc::new(InMemoryCombatStore::new());
    store.upsert_character(record).expect("seed character");
    runtime_with(store, Duration::from_millis(20))
}

pub async fn next_event(rx: &mut broadcast::Receiver<Event>) -> Event {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within timeout")
        .expect("bus open")
}
