//! Round processor.
//!
//! Pure combat math for one round: skill selection, targeting, damage in
//! both directions and kill settlement. Nothing here touches persistence;
//! the engine folds the [`RoundResult`] into the next session snapshot.
//!
//! # Core Functions
//!
//! - `resolve_skill`: first usable active skill in priority order
//! - `select_targets`: all living monsters or one uniform pick
//! - `strike_damage` / `counter_damage`: per-monster damage formulas
//! - `roll_kill` / `settle`: drops per kill and reward scaling

pub mod damage;
pub mod result;
pub mod rewards;
pub mod round;
pub mod skills;
pub mod targeting;

pub use damage::{Strike, counter_damage, strike_damage};
pub use result::{Hit, RoundResult, SkillCast};
pub use rewards::{Kill, Rewards};
pub use round::{RoundInput, RoundProcessor};
pub use skills::resolve_skill;
pub use targeting::{Targets, select_targets};
