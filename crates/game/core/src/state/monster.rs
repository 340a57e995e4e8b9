//! Monster instances and the fixed five-slot roster.

use crate::state::MonsterId;

/// A spawned monster living inside one roster slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterInstance {
    pub definition_id: MonsterId,
    pub name: String,
    /// Free-form family tag copied from the definition ("beast", "undead", ...).
    pub kind: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub experience_reward: u32,
    /// Slot index this instance occupies, always equal to its array index.
    pub position: u8,
    /// Set on spawn; the monster cannot be damaged during its first round.
    pub is_new: bool,
}

impl MonsterInstance {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Applies damage and returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }
}

/// One roster position: either empty or holding a monster (alive or dead).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterSlot {
    #[default]
    Empty,
    Occupied(MonsterInstance),
}

impl MonsterSlot {
    pub fn monster(&self) -> Option<&MonsterInstance> {
        match self {
            MonsterSlot::Empty => None,
            MonsterSlot::Occupied(monster) => Some(monster),
        }
    }

    pub fn monster_mut(&mut self) -> Option<&mut MonsterInstance> {
        match self {
            MonsterSlot::Empty => None,
            MonsterSlot::Occupied(monster) => Some(monster),
        }
    }

    pub fn living(&self) -> Option<&MonsterInstance> {
        self.monster().filter(|m| m.is_alive())
    }

    /// Empty slots and slots holding a corpse can receive a new spawn.
    pub fn is_vacant(&self) -> bool {
        self.living().is_none()
    }
}

/// Fixed-length roster. Slots are never removed, only emptied or replaced.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterSlots([MonsterSlot; MonsterSlots::LEN]);

impl MonsterSlots {
    pub const LEN: usize = 5;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: usize) -> Option<&MonsterSlot> {
        self.0.get(position)
    }

    pub fn monster(&self, position: usize) -> Option<&MonsterInstance> {
        self.0.get(position).and_then(MonsterSlot::monster)
    }

    pub fn monster_mut(&mut self, position: usize) -> Option<&mut MonsterInstance> {
        self.0.get_mut(position).and_then(MonsterSlot::monster_mut)
    }

    /// Places `monster` at `position`, rewriting its position field to match.
    ///
    /// Out-of-range positions are ignored.
    pub fn place(&mut self, position: usize, mut monster: MonsterInstance) {
        if let Some(slot) = self.0.get_mut(position) {
            monster.position = position as u8;
            *slot = MonsterSlot::Occupied(monster);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonsterSlot> {
        self.0.iter()
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterInstance> {
        self.0.iter().filter_map(MonsterSlot::monster)
    }

    pub fn monsters_mut(&mut self) -> impl Iterator<Item = &mut MonsterInstance> {
        self.0.iter_mut().filter_map(MonsterSlot::monster_mut)
    }

    pub fn living(&self) -> impl Iterator<Item = &MonsterInstance> {
        self.0.iter().filter_map(MonsterSlot::living)
    }

    pub fn living_positions(&self) -> Vec<usize> {
        self.living().map(|m| m.position as usize).collect()
    }

    pub fn vacant_positions(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_vacant())
            .map(|(position, _)| position)
            .collect()
    }

    pub fn has_living(&self) -> bool {
        self.living().next().is_some()
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|slot| matches!(slot, MonsterSlot::Empty))
    }

    pub fn total_hp(&self) -> u64 {
        self.monsters().map(|m| m.hp as u64).sum()
    }

    pub fn total_max_hp(&self) -> u64 {
        self.monsters().map(|m| m.max_hp as u64).sum()
    }

    pub fn as_array(&self) -> &[MonsterSlot; MonsterSlots::LEN] {
        &self.0
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::monster;
    use super::*;

    #[test]
    fn place_keeps_position_in_sync() {
        let mut slots = MonsterSlots::new();
        slots.place(3, monster(0, 40));

        assert_eq!(slots.monster(3).unwrap().position, 3);
        assert!(slots.monster(0).is_none());
        assert_eq!(slots.as_array().len(), MonsterSlots::LEN);
    }

    #[test]
    fn corpses_are_vacant_but_not_empty() {
        let mut slots = MonsterSlots::new();
        slots.place(0, monster(0, 0));
        slots.place(1, monster(1, 25));

        assert_eq!(slots.vacant_positions(), vec![0, 2, 3, 4]);
        assert_eq!(slots.living_positions(), vec![1]);
        assert!(!slots.is_empty());
        assert_eq!(slots.total_hp(), 25);
    }

    #[test]
    fn take_damage_never_underflows() {
        let mut rat = monster(0, 12);
        assert_eq!(rat.take_damage(30), 12);
        assert_eq!(rat.hp, 0);
        assert!(!rat.is_alive());
    }
}
