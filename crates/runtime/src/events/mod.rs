//! Events broadcast to clients after each committed change.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CharacterSnapshot, DefeatEvent, LifecycleEvent, MonsterView, RoundEvent};
