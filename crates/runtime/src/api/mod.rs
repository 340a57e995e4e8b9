//! Public API surface of the combat runtime.
mod errors;
mod handle;

pub use errors::{RepositoryError, Result, RuntimeError};
pub use handle::CombatHandle;
