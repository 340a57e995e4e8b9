//! Session state and the data views a round operates on.
//!
//! [`CombatSession`] is the only persisted, mutable structure; everything else
//! here is a snapshot read from collaborators at the start of a round.
mod character;
mod common;
mod monster;
mod session;

pub use character::{AutoPotionSettings, CharacterStats, LearnedSkill, PotionKind, PotionStack};
pub use common::{CharacterId, ItemId, MapId, MonsterId, SkillId, Timestamp};
pub use monster::{MonsterInstance, MonsterSlot, MonsterSlots};
pub use session::{CombatPhase, CombatSession, SkillCooldowns, SkillUsage};

#[cfg(test)]
pub(crate) use monster::fixtures;
