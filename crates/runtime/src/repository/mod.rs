//! Persistence for characters, inventory, sessions and combat logs.
//!
//! The round engine computes every write up front; a store only has to apply
//! a [`RoundCommit`] atomically and honour its conditional decrements.
mod error;
mod file;
mod memory;
mod state;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileCombatStore;
pub use memory::InMemoryCombatStore;
pub use state::DEFAULT_LOG_RETENTION;
pub use types::{
    CharacterRecord, CombatLog, CombatLogEntry, CommittedLogs, InventoryDecrement, InventoryItem, ItemKind,
    KnownSkill, LogId, LogKind, RoundCommit,
};

use combat_core::{CharacterId, CombatSession, MapId};

/// Storage consumed by the combat orchestrator.
///
/// Calls are synchronous and short; the orchestrator serialises access per
/// character, so implementations only need to be internally consistent.
pub trait CombatStore: Send + Sync {
    fn character(&self, id: CharacterId) -> Result<Option<CharacterRecord>>;

    fn upsert_character(&self, record: CharacterRecord) -> Result<()>;

    fn set_current_map(&self, id: CharacterId, map: Option<MapId>) -> Result<()>;

    fn inventory(&self, id: CharacterId) -> Result<Vec<InventoryItem>>;

    fn grant_item(&self, id: CharacterId, item: InventoryItem) -> Result<()>;

    fn session(&self, id: CharacterId) -> Result<Option<CombatSession>>;

    fn save_session(&self, session: &CombatSession) -> Result<()>;

    /// Applies all of `commit` or none of it.
    fn commit(&self, commit: RoundCommit) -> Result<CommittedLogs>;

    /// Most recent log entries for a character, newest first.
    fn logs(&self, id: CharacterId, limit: usize) -> Result<Vec<CombatLogEntry>>;
}
