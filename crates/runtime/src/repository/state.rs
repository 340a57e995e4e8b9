//! Store contents shared by the in-memory and file-backed stores.

use std::collections::{HashMap, VecDeque};

use combat_core::{CharacterId, CombatSession, ItemId, MapId};
use serde::{Deserialize, Serialize};

use super::error::{RepositoryError, Result};
use super::types::{
    CharacterRecord, CombatLog, CombatLogEntry, CommittedLogs, InventoryItem, LogId, RoundCommit,
};

/// Log entries kept per character unless a store is configured otherwise.
pub const DEFAULT_LOG_RETENTION: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct StoreState {
    characters: HashMap<CharacterId, CharacterRecord>,
    inventories: HashMap<CharacterId, Vec<InventoryItem>>,
    sessions: HashMap<CharacterId, CombatSession>,
    /// Oldest first, at most `log_retention` entries per character.
    logs: HashMap<CharacterId, VecDeque<CombatLogEntry>>,
    next_log_id: u64,
    #[serde(skip, default = "default_log_retention")]
    log_retention: usize,
}

fn default_log_retention() -> usize {
    DEFAULT_LOG_RETENTION
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            characters: HashMap::new(),
            inventories: HashMap::new(),
            sessions: HashMap::new(),
            logs: HashMap::new(),
            next_log_id: 0,
            log_retention: DEFAULT_LOG_RETENTION,
        }
    }
}

impl StoreState {
    /// Caps every character's log history at `retention` (at least 1),
    /// dropping the oldest entries.
    pub fn set_log_retention(&mut self, retention: usize) {
        self.log_retention = retention.max(1);
        for history in self.logs.values_mut() {
            while history.len() > self.log_retention {
                history.pop_front();
            }
        }
    }

    pub fn character(&self, id: CharacterId) -> Option<CharacterRecord> {
        self.characters.get(&id).cloned()
    }

    pub fn upsert_character(&mut self, record: CharacterRecord) {
        self.characters.insert(record.id(), record);
    }

    pub fn set_current_map(&mut self, id: CharacterId, map: Option<MapId>) -> Result<()> {
        let record = self
            .characters
            .get_mut(&id)
            .ok_or(RepositoryError::CharacterNotFound(id))?;
        record.current_map = map;
        Ok(())
    }

    pub fn inventory(&self, id: CharacterId) -> Vec<InventoryItem> {
        self.inventories.get(&id).cloned().unwrap_or_default()
    }

    /// Adds `item` to the character's inventory, merging into an existing
    /// stack with the same id.
    pub fn grant_item(&mut self, id: CharacterId, item: InventoryItem) {
        let inventory = self.inventories.entry(id).or_default();
        match inventory.iter_mut().find(|held| held.item_id == item.item_id) {
            Some(held) => held.quantity = held.quantity.saturating_add(item.quantity),
            None => inventory.push(item),
        }
    }

    pub fn session(&self, id: CharacterId) -> Option<CombatSession> {
        self.sessions.get(&id).cloned()
    }

    pub fn save_session(&mut self, session: &CombatSession) {
        self.sessions.insert(session.character_id, session.clone());
    }

    /// Newest first.
    pub fn logs(&self, id: CharacterId, limit: usize) -> Vec<CombatLogEntry> {
        self.logs
            .get(&id)
            .map(|history| history.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Applies a round's writes.
    ///
    /// Every precondition is checked before the first mutation, so an error
    /// leaves the state untouched.
    pub fn apply(&mut self, commit: RoundCommit) -> Result<CommittedLogs> {
        let character = commit.character;
        if !self.characters.contains_key(&character) {
            return Err(RepositoryError::CharacterNotFound(character));
        }

        let quantities = self.check_decrements(&commit)?;

        // ===== validated; apply everything =====
        if let Some(record) = self.characters.get_mut(&character) {
            let stats = &mut record.stats;
            stats.experience = stats.experience.saturating_add(commit.experience);
            stats.currency = stats
                .currency
                .saturating_add(commit.currency_gained)
                .saturating_sub(commit.currency_lost);
        }

        let inventory = self.inventories.entry(character).or_default();
        for (item_id, quantity) in quantities {
            if let Some(held) = inventory.iter_mut().find(|held| held.item_id == item_id) {
                held.quantity = quantity;
            }
        }
        inventory.retain(|held| held.quantity > 0);

        for entry in &commit.loot {
            self.grant_item(character, InventoryItem::loot(entry));
        }

        self.save_session(&commit.session);

        let round = self.append_log(commit.log);
        let defeat = commit.defeat_log.map(|log| self.append_log(log));
        Ok(CommittedLogs { round, defeat })
    }

    fn append_log(&mut self, log: CombatLog) -> LogId {
        self.next_log_id += 1;
        let id = LogId(self.next_log_id);
        let history = self.logs.entry(log.character).or_default();
        history.push_back(CombatLogEntry { id, log });
        while history.len() > self.log_retention {
            history.pop_front();
        }
        id
    }

    /// Replays the decrements against the held quantities and returns the
    /// final quantity per touched stack.
    fn check_decrements(&self, commit: &RoundCommit) -> Result<Vec<(ItemId, u32)>> {
        let held = self
            .inventories
            .get(&commit.character)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut quantities: Vec<(ItemId, u32)> = Vec::new();
        for decrement in &commit.decrements {
            let position = quantities
                .iter()
                .position(|(id, _)| *id == decrement.item_id);
            let actual = match position {
                Some(index) => quantities[index].1,
                None => held
                    .iter()
                    .find(|item| item.item_id == decrement.item_id)
                    .map_or(0, |item| item.quantity),
            };

            if actual == 0 || actual != decrement.expected_quantity {
                return Err(RepositoryError::InventoryConflict {
                    item: decrement.item_id,
                    expected: decrement.expected_quantity,
                    actual,
                });
            }

            match position {
                Some(index) => quantities[index].1 = actual - 1,
                None => quantities.push((decrement.item_id, actual - 1)),
            }
        }
        Ok(quantities)
    }
}


#[cfg(test)]
mod tests {
    use combat_core::LootEntry;

    use super::fixtures::*;
    use super::*;

    fn seeded(potions: u32) -> StoreState {
        let mut state = StoreState::default();
        state.upsert_character(hero());
        state.grant_item(HERO, health_potions(potions));
        state
    }

    #[test]
    fn apply_updates_character_inventory_and_session() {
        let mut state = seeded(3);
        let mut commit = commit(&[3, 2]);
        commit.loot.push(LootEntry {
            item_id: ItemId(2001),
            name: "Rat Tail".to_string(),
        });

        let ids = state.apply(commit).unwrap();
        assert_eq!(ids.round, LogId(1));
        assert_eq!(ids.defeat, None);

        let record = state.character(HERO).unwrap();
        assert_eq!(record.stats.experience, 15);
        assert_eq!(record.stats.currency, 1_010);

        let inventory = state.inventory(HERO);
        assert_eq!(inventory[0].quantity, 1);
        assert_eq!(inventory[1].item_id, ItemId(2001));
        assert_eq!(state.session(HERO).unwrap().round_number, 1);
    }

    #[test]
    fn conflicting_decrement_applies_nothing() {
        let mut state = seeded(2);
        let err = state.apply(commit(&[3])).unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::InventoryConflict { expected: 3, actual: 2, .. }
        ));
        assert_eq!(state.character(HERO).unwrap().stats.currency, 1_000);
        assert_eq!(state.inventory(HERO)[0].quantity, 2);
        assert!(state.session(HERO).is_none());
        assert!(state.logs(HERO, 10).is_empty());
    }

    #[test]
    fn last_potion_removes_the_stack() {
        let mut state = seeded(1);
        state.apply(commit(&[1])).unwrap();
        assert!(state.inventory(HERO).is_empty());
    }

    #[test]
    fn decrement_of_a_missing_stack_conflicts() {
        let mut state = seeded(1);
        let err = state.apply(commit(&[1, 1])).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::InventoryConflict { expected: 1, actual: 0, .. }
        ));
    }

    #[test]
    fn logs_come_back_newest_first() {
        let mut state = seeded(0);
        for round in 1..=3 {
            let mut next = commit(&[]);
            next.log = round_log(round);
            state.apply(next).unwrap();
        }

        let logs = state.logs(HERO, 2);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].log.round_number, 3);
        assert_eq!(logs[1].id, LogId(2));
    }

    #[test]
    fn log_history_is_capped_per_character() {
        let mut state = seeded(0);
        state.set_log_retention(3);
        let mut other = hero();
        other.stats.id = CharacterId(2);
        state.upsert_character(other);

        for round in 1..=5 {
            let mut next = commit(&[]);
            next.log = round_log(round);
            state.apply(next).unwrap();
        }
        let mut rival = commit(&[]);
        rival.character = CharacterId(2);
        rival.session.character_id = CharacterId(2);
        rival.log.character = CharacterId(2);
        state.apply(rival).unwrap();

        let logs = state.logs(HERO, 10);
        let rounds: Vec<u64> = logs.iter().map(|entry| entry.log.round_number).collect();
        assert_eq!(rounds, vec![5, 4, 3]);
        assert_eq!(state.logs(CharacterId(2), 10).len(), 1);
        // ids keep counting past evicted entries
        assert_eq!(state.logs(CharacterId(2), 1)[0].id, LogId(6));
    }

    #[test]
    fn lowering_retention_trims_existing_history() {
        let mut state = seeded(0);
        for round in 1..=4 {
            let mut next = commit(&[]);
            next.log = round_log(round);
            state.apply(next).unwrap();
        }

        state.set_log_retention(0);
        let logs = state.logs(HERO, 10);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log.round_number, 4);
    }

    #[test]
    fn unknown_character_is_rejected() {
        let mut state = StoreState::default();
        let err = state.apply(commit(&[])).unwrap_err();
        assert!(matches!(err, RepositoryError::CharacterNotFound(HERO)));
    }
}
