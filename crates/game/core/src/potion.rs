//! Automatic potion use.
//!
//! Runs before and after every round. Each resource is checked
//! independently; when it sits at or below its threshold the strongest
//! matching potion is drunk. The policy always picks the highest restore
//! value, even when a weaker potion would cover the gap.

use crate::state::{AutoPotionSettings, ItemId, PotionKind, PotionStack};

/// One potion drunk by the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotionUse {
    pub item_id: ItemId,
    pub kind: PotionKind,
    /// Amount actually restored after capping at the maximum.
    pub restored: u32,
    /// Stack quantity before this use. The store only decrements when the
    /// persisted quantity still equals this value.
    pub expected_quantity: u32,
}

/// Current/maximum pair for one resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gauge {
    pub current: u32,
    pub max: u32,
}

impl Gauge {
    pub fn new(current: u32, max: u32) -> Self {
        Self { current, max }
    }

    /// `current / max * 100 <= threshold`, in integer arithmetic.
    ///
    /// A zero maximum never triggers.
    fn at_or_below(&self, threshold: u8) -> bool {
        self.max > 0 && (self.current as u64) * 100 <= (threshold as u64) * (self.max as u64)
    }
}

/// Local view of the held potions, decremented as the policy drinks them.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PotionBelt {
    stacks: Vec<PotionStack>,
}

impl PotionBelt {
    pub fn new(stacks: Vec<PotionStack>) -> Self {
        Self {
            stacks: stacks.into_iter().filter(|s| s.quantity > 0).collect(),
        }
    }

    pub fn stacks(&self) -> &[PotionStack] {
        &self.stacks
    }

    pub fn quantity(&self, item_id: ItemId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.item_id == item_id)
            .map_or(0, |s| s.quantity)
    }

    /// Highest-restore stack of `kind`; ties go to the first held.
    fn best(&self, kind: PotionKind) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, stack) in self.stacks.iter().enumerate() {
            if stack.kind != kind {
                continue;
            }
            if best.is_none_or(|(_, restore)| stack.restore > restore) {
                best = Some((index, stack.restore));
            }
        }
        best.map(|(index, _)| index)
    }

    /// Removes one potion from the stack at `index`, dropping it when empty.
    /// Returns the quantity before the decrement.
    fn take(&mut self, index: usize) -> u32 {
        let stack = &mut self.stacks[index];
        let before = stack.quantity;
        stack.quantity -= 1;
        if stack.quantity == 0 {
            self.stacks.remove(index);
        }
        before
    }
}

/// Applies the auto-use policy to HP and then mana.
///
/// Gauges are updated in place and every drunk potion is returned in order.
pub fn apply_auto_potions(
    settings: &AutoPotionSettings,
    hp: &mut Gauge,
    mana: &mut Gauge,
    belt: &mut PotionBelt,
) -> Vec<PotionUse> {
    [(PotionKind::Hp, hp), (PotionKind::Mp, mana)]
        .into_iter()
        .filter_map(|(kind, gauge)| drink(settings, kind, gauge, belt))
        .collect()
}

fn drink(
    settings: &AutoPotionSettings,
    kind: PotionKind,
    gauge: &mut Gauge,
    belt: &mut PotionBelt,
) -> Option<PotionUse> {
    if !settings.enabled(kind) || !gauge.at_or_below(settings.threshold(kind)) {
        return None;
    }

    let index = belt.best(kind)?;
    let item_id = belt.stacks[index].item_id;
    let restore = belt.stacks[index].restore;

    let after = gauge.current.saturating_add(restore).min(gauge.max);
    let restored = after - gauge.current;
    gauge.current = after;

    let expected_quantity = belt.take(index);
    Some(PotionUse {
        item_id,
        kind,
        restored,
        expected_quantity,
    })
}
