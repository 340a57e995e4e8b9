//! Kill settlement: experience, copper and item drops.

use crate::env::{DropTable, LootEntry, RandomSource};
use crate::state::{MonsterId, MonsterInstance};

/// A monster whose HP went from positive to zero this round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kill {
    pub position: u8,
    pub definition_id: MonsterId,
    pub name: String,
    /// Unscaled experience carried by the instance.
    pub experience: u32,
    /// Unscaled copper rolled from the drop table.
    pub copper: u32,
    pub item: Option<LootEntry>,
}

/// Round totals after the difficulty reward multiplier.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    /// Sum of kill experience before scaling.
    pub experience_gained: u64,
    pub experience: u64,
    pub currency: u64,
    pub loot: Vec<LootEntry>,
}

/// Rolls drops for one kill.
///
/// Draw order: copper chance, copper amount (only on success), item chance,
/// item pick (only on success with a non-empty pool).
pub fn roll_kill(monster: &MonsterInstance, drops: &DropTable, rng: &mut impl RandomSource) -> Kill {
    let copper = if rng.chance(drops.copper_chance) {
        let extra = rng.range(0, drops.copper_range as i64) as u32;
        drops.copper_base.saturating_add(extra)
    } else {
        0
    };

    let item = if rng.chance(drops.item_chance) && !drops.items.is_empty() {
        let index = rng.below(drops.items.len() as u32) as usize;
        Some(drops.items[index].clone())
    } else {
        None
    };

    Kill {
        position: monster.position,
        definition_id: monster.definition_id,
        name: monster.name.clone(),
        experience: monster.experience_reward,
        copper,
        item,
    }
}

/// `floor(amount * multiplier)`, never negative.
pub fn scale(amount: u64, multiplier: f64) -> u64 {
    (amount as f64 * multiplier).floor().max(0.0) as u64
}

/// Sums kills and applies the reward multiplier to experience and copper.
pub fn settle(kills: &[Kill], reward_multiplier: f64) -> Rewards {
    let experience_gained: u64 = kills.iter().map(|k| k.experience as u64).sum();
    let copper: u64 = kills.iter().map(|k| k.copper as u64).sum();

    Rewards {
        experience_gained,
        experience: scale(experience_gained, reward_multiplier),
        currency: scale(copper, reward_multiplier),
        loot: kills.iter().filter_map(|k| k.item.clone()).collect(),
    }
}
