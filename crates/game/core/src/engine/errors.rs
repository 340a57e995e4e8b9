//! Errors surfaced by the round transaction.

use crate::error::{ErrorSeverity, GameError};
use crate::roster::RosterError;
use crate::state::CharacterId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineError {
    #[error("session belongs to {session}, stats belong to {character}")]
    CharacterMismatch {
        session: CharacterId,
        character: CharacterId,
    },

    #[error("roster failed: {0}")]
    Roster(#[from] RosterError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::CharacterMismatch { .. } => ErrorSeverity::Internal,
            EngineError::Roster(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EngineError::CharacterMismatch { .. } => "ENGINE_CHARACTER_MISMATCH",
            EngineError::Roster(err) => err.error_code(),
        }
    }
}
