//! Event payloads published by the orchestrator.

use combat_core::{
    CharacterId, ConsumedPotion, LootEntry, MapId, MonsterSlots, RoundFlags, SkillId, StopReason,
};
use serde::{Deserialize, Serialize};

use crate::repository::LogId;

/// Client-facing view of one occupied roster slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterView {
    pub position: u8,
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
}

impl MonsterView {
    /// Five entries, one per slot; empty slots are `None`.
    pub fn roster(slots: &MonsterSlots) -> Vec<Option<MonsterView>> {
        slots
            .iter()
            .map(|slot| {
                slot.monster().map(|m| MonsterView {
                    position: m.position,
                    name: m.name.clone(),
                    level: m.level,
                    hp: m.hp,
                    max_hp: m.max_hp,
                })
            })
            .collect()
    }
}

/// Character resources after the round committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub currency: u64,
    pub experience: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEvent {
    pub character: CharacterId,
    pub log_id: LogId,
    pub round_number: u64,
    pub monsters: Vec<Option<MonsterView>>,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub experience: u64,
    pub currency: u64,
    pub loot: Vec<LootEntry>,
    pub skills_used: Vec<SkillId>,
    pub potions: Vec<ConsumedPotion>,
    pub snapshot: CharacterSnapshot,
    pub flags: RoundFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatEvent {
    pub character: CharacterId,
    pub log_id: LogId,
    pub round_number: u64,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub duration_ms: u64,
    pub currency_lost: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Started {
        character: CharacterId,
        map: MapId,
    },
    Stopped {
        character: CharacterId,
    },
    AutoStopped {
        character: CharacterId,
        reason: StopReason,
        last_hp: u32,
    },
    /// A scheduled round failed with a non-retryable error and the ticker
    /// for this character shut down.
    TickerFailed {
        character: CharacterId,
        error: String,
    },
}

impl LifecycleEvent {
    pub fn character(&self) -> CharacterId {
        match self {
            LifecycleEvent::Started { character, .. }
            | LifecycleEvent::Stopped { character }
            | LifecycleEvent::AutoStopped { character, .. }
            | LifecycleEvent::TickerFailed { character, .. } => *character,
        }
    }
}
