//! In-memory [`CombatStore`].

use std::sync::RwLock;

use combat_core::{CharacterId, CombatSession, MapId};

use super::state::StoreState;
use super::{
    CharacterRecord, CombatLogEntry, CombatStore, CommittedLogs, InventoryItem, RepositoryError,
    Result, RoundCommit,
};

/// Store backed by a single lock; contents are lost on drop.
#[derive(Debug, Default)]
pub struct InMemoryCombatStore {
    state: RwLock<StoreState>,
}

impl InMemoryCombatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `retention` log entries per character.
    pub fn with_log_retention(retention: usize) -> Self {
        let mut state = StoreState::default();
        state.set_log_retention(retention);
        Self {
            state: RwLock::new(state),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T> {
        let state = self.state.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(f(&state))
    }

    fn write<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self
            .state
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        f(&mut state)
    }
}

impl CombatStore for InMemoryCombatStore {
    fn character(&self, id: CharacterId) -> Result<Option<CharacterRecord>> {
        self.read(|state| state.character(id))
    }

    fn upsert_character(&self, record: CharacterRecord) -> Result<()> {
        self.write(|state| {
            state.upsert_character(record);
            Ok(())
        })
    }

    fn set_current_map(&self, id: CharacterId, map: Option<MapId>) -> Result<()> {
        self.write(|state| state.set_current_map(id, map))
    }

    fn inventory(&self, id: CharacterId) -> Result<Vec<InventoryItem>> {
        self.read(|state| state.inventory(id))
    }

    fn grant_item(&self, id: CharacterId, item: InventoryItem) -> Result<()> {
        self.write(|state| {
            state.grant_item(id, item);
            Ok(())
        })
    }

    fn session(&self, id: CharacterId) -> Result<Option<CombatSession>> {
        self.read(|state| state.session(id))
    }

    fn save_session(&self, session: &CombatSession) -> Result<()> {
        self.write(|state| {
            state.save_session(session);
            Ok(())
        })
    }

    fn commit(&self, commit: RoundCommit) -> Result<CommittedLogs> {
        self.write(|state| state.apply(commit))
    }

    fn logs(&self, id: CharacterId, limit: usize) -> Result<Vec<CombatLogEntry>> {
        self.read(|state| state.logs(id, limit))
    }
}
