//! Records owned by the store: characters, inventory, and combat logs.

use std::fmt;

use combat_core::{
    AutoPotionSettings, CharacterId, CharacterStats, CombatSession, ConsumedPotion, ItemId,
    LootEntry, MapId, PotionKind, PotionStack, RoundFlags, SkillId, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a combat log entry when it is committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(pub u64);

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log#{}", self.0)
    }
}

/// A skill the character has learned, referenced by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSkill {
    pub id: SkillId,
    pub active: bool,
}

/// Everything the store keeps about a character outside combat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub stats: CharacterStats,
    pub current_map: Option<MapId>,
    pub auto_potions: AutoPotionSettings,
    pub skills: Vec<KnownSkill>,
}

impl CharacterRecord {
    pub fn id(&self) -> CharacterId {
        self.stats.id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Potion { kind: PotionKind, restore: u32 },
    /// Loot and anything else combat never consumes.
    Material,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub quantity: u32,
}

impl InventoryItem {
    pub fn potion(item_id: ItemId, name: &str, kind: PotionKind, restore: u32, quantity: u32) -> Self {
        Self {
            item_id,
            name: name.to_string(),
            kind: ItemKind::Potion { kind, restore },
            quantity,
        }
    }

    pub fn loot(entry: &LootEntry) -> Self {
        Self {
            item_id: entry.item_id,
            name: entry.name.clone(),
            kind: ItemKind::Material,
            quantity: 1,
        }
    }

    /// The stack as seen by the potion policy, if it is a potion.
    pub fn as_potion(&self) -> Option<PotionStack> {
        match self.kind {
            ItemKind::Potion { kind, restore } if self.quantity > 0 => Some(PotionStack {
                item_id: self.item_id,
                name: self.name.clone(),
                kind,
                restore,
                quantity: self.quantity,
            }),
            _ => None,
        }
    }
}

/// Conditional decrement: applied only while the stack still holds
/// `expected_quantity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDecrement {
    pub item_id: ItemId,
    pub expected_quantity: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LogKind {
    Round,
    /// Written alongside the round log of a lost round; damage figures are
    /// cumulative for the encounter.
    Defeat,
}

/// A log entry before the store assigns its id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatLog {
    pub character: CharacterId,
    pub kind: LogKind,
    pub recorded_at: Timestamp,
    pub round_number: u64,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub victory: bool,
    pub experience: u64,
    pub currency_gained: u64,
    pub currency_lost: u64,
    pub loot: Vec<LootEntry>,
    pub skills_used: Vec<SkillId>,
    pub potions: Vec<ConsumedPotion>,
    pub duration_ms: u64,
    pub flags: RoundFlags,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub id: LogId,
    pub log: CombatLog,
}

/// All writes produced by one round, applied together or not at all.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundCommit {
    pub character: CharacterId,
    pub session: CombatSession,
    pub decrements: Vec<InventoryDecrement>,
    pub loot: Vec<LootEntry>,
    pub experience: u64,
    pub currency_gained: u64,
    pub currency_lost: u64,
    pub log: CombatLog,
    /// Present when the round ended in defeat.
    pub defeat_log: Option<CombatLog>,
}

/// Ids assigned to the logs of a [`RoundCommit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommittedLogs {
    pub round: LogId,
    pub defeat: Option<LogId>,
}
