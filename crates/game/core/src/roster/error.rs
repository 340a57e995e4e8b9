//! Roster errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::MapId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RosterError {
    /// The map lists no monster the content oracles can resolve.
    #[error("no monsters available on {map}")]
    NoMonstersAvailable { map: MapId },
}

impl GameError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RosterError::NoMonstersAvailable { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RosterError::NoMonstersAvailable { .. } => "ROSTER_NO_MONSTERS",
        }
    }
}
