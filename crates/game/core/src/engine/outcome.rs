//! Results of [`CombatEngine::run_round`](super::CombatEngine::run_round).

use crate::combat::RoundResult;
use crate::engine::RoundFlags;
use crate::potion::PotionUse;
use crate::roster::{RosterChange, RosterSummary};
use crate::state::{CombatPhase, CombatSession};

/// Why combat halted before a round could be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// HP was zero after pre-round potions.
    OutOfHealth,
    /// The map resolves to no monster definitions.
    NoMonsters,
}

/// When a potion was drunk relative to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum PotionPhase {
    PreRound,
    PostRound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsumedPotion {
    pub phase: PotionPhase,
    pub potion: PotionUse,
}

/// Currency movement for the character this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrencyChange {
    pub before: u64,
    /// Zero on defeat.
    pub gained: u64,
    /// Percentage of `before`, taken on defeat.
    pub penalty: u64,
}

impl CurrencyChange {
    pub fn after(&self) -> u64 {
        self.before.saturating_sub(self.penalty).saturating_add(self.gained)
    }
}

/// A round that ran to completion.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedRound {
    /// Session to persist. Cleared when the round ended in defeat.
    pub session: CombatSession,
    pub result: RoundResult,
    pub roster: RosterChange,
    /// Roster as prepared at the start of the round.
    pub summary: RosterSummary,
    /// Slots that received incremental spawns after the round.
    pub spawned: Vec<usize>,
    pub potions: Vec<ConsumedPotion>,
    pub currency: CurrencyChange,
    /// Experience added to the character (after difficulty scaling).
    pub experience: u64,
    /// Cumulative encounter damage, captured before a defeat clears it.
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    /// Milliseconds since the session started fighting.
    pub duration_ms: u64,
    pub flags: RoundFlags,
}

impl ResolvedRound {
    pub fn is_defeat(&self) -> bool {
        self.result.defeat
    }

    /// Phase the round left the character in. A defeat reports
    /// [`CombatPhase::Defeated`] even though the persisted session is idle.
    pub fn phase(&self) -> CombatPhase {
        if self.is_defeat() {
            CombatPhase::Defeated
        } else {
            self.session.phase()
        }
    }
}

/// Outcome of one round attempt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundTransition {
    Resolved(Box<ResolvedRound>),
    AutoStopped {
        reason: StopReason,
        /// Session to persist; no longer fighting.
        session: CombatSession,
        last_hp: u32,
    },
}
