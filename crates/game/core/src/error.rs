//! Common error infrastructure for combat-core.
//!
//! Domain errors (`RosterError`, `EngineError`) live next to the code that
//! raises them and implement [`GameError`] so callers can classify them.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; retrying the whole round may succeed.
    Recoverable,

    /// Invalid input or content; do not retry without changes.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common behavior for all combat-core errors.
pub trait GameError: std::error::Error {
    fn severity(&self) -> ErrorSeverity;

    /// Stable machine-readable code, e.g. `ROSTER_NO_MONSTERS`.
    fn error_code(&self) -> &'static str;
}
