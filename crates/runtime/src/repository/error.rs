//! Error types raised by store implementations.

use combat_core::{CharacterId, ItemId};
use thiserror::Error;

/// Errors surfaced by [`CombatStore`](super::CombatStore) implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("combat store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0} not found")]
    CharacterNotFound(CharacterId),

    /// The persisted stack no longer holds the quantity the round was computed
    /// against. Nothing from the commit was applied.
    #[error("{item} quantity changed: expected {expected}, found {actual}")]
    InventoryConflict {
        item: ItemId,
        expected: u32,
        actual: u32,
    },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
