//! Combat runtime orchestrating rounds over `combat-core`.
//!
//! Modules:
//! - [`api`]: Public façade (`CombatHandle`) and error types
//! - [`orchestrator`]: Per-character round transaction (read, resolve, commit, publish)
//! - [`workers`]: Repeating round tickers
//! - [`events`]: Topic-based event bus
//! - [`repository`]: Character, inventory, session and log persistence
//! - [`oracle`]: Content oracles built from `combat-content` catalogs
//! - [`clock`]: Wall-clock sources
pub mod api;
pub mod clock;
pub mod events;
pub mod oracle;
pub mod orchestrator;
pub mod repository;
pub mod workers;

mod runtime;

pub use api::{CombatHandle, Result, RuntimeError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{
    CharacterSnapshot, DefeatEvent, Event, EventBus, LifecycleEvent, MonsterView, RoundEvent, Topic,
};
pub use oracle::{
    MapOracleImpl, MonsterOracleImpl, OracleManager, SkillOracleImpl, TablesOracleImpl,
};
pub use orchestrator::{CombatOrchestrator, CombatStatus, RoundOutcome, RoundReport};
pub use repository::{
    CharacterRecord, CombatLog, CombatLogEntry, CombatStore, FileCombatStore,
    InMemoryCombatStore, InventoryItem, ItemKind, KnownSkill, LogId, LogKind, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, default_store_dir};
pub use workers::RoundScheduler;
