//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the round engine, the store and background tickers so
//! clients can bubble them up with consistent context.
use combat_core::{CharacterId, EngineError, GameError, ItemId, MapId};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0} not found")]
    CharacterNotFound(CharacterId),

    #[error("{0} has no hunting ground selected")]
    NoMapSelected(CharacterId),

    #[error("{0} not found")]
    MapNotFound(MapId),

    /// A potion stack changed between the round's read and its commit. The
    /// round was discarded and may be retried.
    #[error("{item} changed during the round: expected {expected}, found {actual}")]
    InventoryConflict {
        item: ItemId,
        expected: u32,
        actual: u32,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("round ticker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Whether re-running the same round later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            RuntimeError::InventoryConflict { .. } => true,
            RuntimeError::Repository(RepositoryError::Io(_)) => true,
            RuntimeError::Engine(err) => err.severity().is_recoverable(),
            _ => false,
        }
    }
}

impl From<RepositoryError> for RuntimeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InventoryConflict {
                item,
                expected,
                actual,
            } => RuntimeError::InventoryConflict {
                item,
                expected,
                actual,
            },
            RepositoryError::CharacterNotFound(id) => RuntimeError::CharacterNotFound(id),
            other => RuntimeError::Repository(other),
        }
    }
}
