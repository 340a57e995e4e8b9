//! Deterministic combat rules shared by the runtime and offline tools.
//!
//! `combat-core` holds the canonical round logic: the monster slot manager
//! ([`roster`]), the potion auto-use policy ([`potion`]), the round
//! processor ([`combat`]) and the round transaction that sequences them
//! ([`engine`]). Nothing here performs I/O or reads the clock; collaborator
//! data arrives through [`env`] oracles and plain snapshots, and every
//! random draw goes through a [`RandomSource`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod potion;
pub mod roster;
pub mod state;

pub use combat::{Hit, Kill, Rewards, RoundInput, RoundProcessor, RoundResult, SkillCast};
pub use config::CombatConfig;
pub use engine::{
    CombatEngine, ConsumedPotion, CurrencyChange, EngineError, PotionPhase, ResolvedRound,
    RoundFlags, RoundRequest, RoundTransition, StopReason,
};
pub use env::{
    CombatEnv, DifficultyMultipliers, DifficultyTier, DropTable, LootEntry, MapDefinition,
    MapOracle, MonsterDefinition, MonsterOracle, PcgRng, RandomSource, RngOracle, RollStream,
    SkillDefinition, SkillOracle, TablesOracle, TargetType, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use potion::{PotionBelt, PotionUse};
pub use roster::{MonsterRoster, PreparedRoster, RosterChange, RosterError, RosterSummary};
pub use state::{
    AutoPotionSettings, CharacterId, CharacterStats, CombatPhase, CombatSession, ItemId,
    LearnedSkill, MapId, MonsterId, MonsterInstance, MonsterSlot, MonsterSlots, PotionKind,
    PotionStack, SkillCooldowns, SkillId, SkillUsage, Timestamp,
};
