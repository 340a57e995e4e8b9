//! File-backed [`CombatStore`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use combat_core::{CharacterId, CombatSession, MapId};

use super::state::{DEFAULT_LOG_RETENTION, StoreState};
use super::{
    CharacterRecord, CombatLogEntry, CombatStore, CommittedLogs, InventoryItem, RepositoryError,
    Result, RoundCommit,
};

/// Store that keeps the whole state in memory and rewrites a single bincode
/// snapshot on every mutation.
///
/// # File Format
///
/// `combat_store.bin` holds the bincode-encoded store. Writes go to a
/// temporary file that is renamed over the snapshot, so a crash leaves either
/// the previous or the new state on disk. A mutation becomes visible in
/// memory only after its snapshot was written. Log history is capped per
/// character, which bounds the snapshot size.
pub struct FileCombatStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileCombatStore {
    const FILE_NAME: &'static str = "combat_store.bin";

    /// Opens the store in `base_dir`, creating the directory if needed.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_log_retention(base_dir, DEFAULT_LOG_RETENTION)
    }

    /// Like [`open`](Self::open), keeping at most `retention` log entries per
    /// character. A smaller limit trims the loaded history.
    pub fn open_with_log_retention(base_dir: impl AsRef<Path>, retention: usize) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        let path = base_dir.join(Self::FILE_NAME);

        let mut state = if path.exists() {
            let bytes = fs::read(&path)?;
            let state: StoreState = bincode::deserialize(&bytes)
                .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
            tracing::debug!("Loaded combat store from {}", path.display());
            state
        } else {
            StoreState::default()
        };
        state.set_log_retention(retention);

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, state: &StoreState) -> Result<()> {
        let temp_path = self.path.with_extension("bin.tmp");
        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!("Saved combat store to {}", self.path.display());
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T> {
        let state = self.state.read().map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(f(&state))
    }

    /// Applies `f` to a copy, persists it, then swaps it in.
    fn write<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let mut state = self
            .state
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let mut next = state.clone();
        let value = f(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(value)
    }
}

impl CombatStore for FileCombatStore {
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

#[cfg(test)]
mod tests {
    use super::super::state::fixtures::*;
    use super::*;

    #[test]
    fn reopened_store_sees_committed_round() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileCombatStore::open(dir.path()).unwrap();
            store.upsert_character(hero()).unwrap();
            store.grant_item(HERO, health_potions(2)).unwrap();
            store.commit(commit(&[2])).unwrap();
        }

        let store = FileCombatStore::open(dir.path()).unwrap();
        assert_eq!(store.character(HERO).unwrap().unwrap().stats.currency, 1_010);
        assert_eq!(store.inventory(HERO).unwrap()[0].quantity, 1);
        assert_eq!(store.session(HERO).unwrap().unwrap().round_number, 1);
        assert_eq!(store.logs(HERO, 5).unwrap().len(), 1);
        assert!(!dir.path().join("combat_store.bin.tmp").exists());
    }

    #[test]
    fn reopening_with_a_smaller_retention_trims_logs() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileCombatStore::open(dir.path()).unwrap();
            store.upsert_character(hero()).unwrap();
            for round in 1..=4 {
                let mut next = commit(&[]);
                next.log = round_log(round);
                store.commit(next).unwrap();
            }
        }

        let store = FileCombatStore::open_with_log_retention(dir.path(), 2).unwrap();
        let logs = store.logs(HERO, 10).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log.round_number, 4);

        let mut next = commit(&[]);
        next.log = round_log(5);
        store.commit(next).unwrap();
        let reopened = FileCombatStore::open_with_log_retention(dir.path(), 2).unwrap();
        let rounds: Vec<u64> = reopened
            .logs(HERO, 10)
            .unwrap()
            .iter()
            .map(|entry| entry.log.round_number)
            .collect();
        assert_eq!(rounds, vec![5, 4]);
    }

    #[test]
    fn rejected_commit_leaves_disk_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCombatStore::open(dir.path()).unwrap();
        store.upsert_character(hero()).unwrap();
        store.grant_item(HERO, health_potions(1)).unwrap();

        assert!(store.commit(commit(&[5])).is_err());

        let reopened = FileCombatStore::open(dir.path()).unwrap();
        assert!(reopened.session(HERO).unwrap().is_none());
        assert_eq!(reopened.inventory(HERO).unwrap()[0].quantity, 1);
    }
}
