//! Seeds a demo character when the store does not know it yet.

use anyhow::Result;
use combat_core::{AutoPotionSettings, CharacterStats, ItemId, PotionKind, SkillId};
use combat_runtime::{CharacterRecord, CombatStore, InventoryItem, KnownSkill};

use crate::config::SimConfig;

pub fn ensure_character(store: &dyn CombatStore, config: &SimConfig) -> Result<()> {
    if let Some(record) = store.character(config.character)? {
        if record.current_map != Some(config.map) {
            store.set_current_map(config.character, Some(config.map))?;
        }
        return Ok(());
    }

    let auto_potions = if config.auto_potions {
        AutoPotionSettings {
            hp_enabled: true,
            hp_threshold: 40,
            mana_enabled: true,
            mana_threshold: 25,
        }
    } else {
        AutoPotionSettings::disabled()
    };

    store.upsert_character(CharacterRecord {
        name: "Wanderer".to_string(),
        stats: CharacterStats {
            id: config.character,
            attack: 42,
            defense: 18,
            crit_rate: 0.15,
            crit_damage: 1.8,
            max_hp: 320,
            max_mana: 90,
            currency: 500,
            experience: 0,
            difficulty: config.difficulty,
        },
        current_map: Some(config.map),
        auto_potions,
        skills: [1, 2, 3]
            .into_iter()
            .map(|id| KnownSkill {
                id: SkillId(id),
                active: true,
            })
            .collect(),
    })?;

    store.grant_item(
        config.character,
        InventoryItem::potion(ItemId(3001), "Minor Healing Draught", PotionKind::Hp, 60, 5),
    )?;
    store.grant_item(
        config.character,
        InventoryItem::potion(ItemId(3002), "Healing Draught", PotionKind::Hp, 150, 2),
    )?;
    store.grant_item(
        config.character,
        InventoryItem::potion(ItemId(3101), "Mana Tonic", PotionKind::Mp, 40, 4),
    )?;

    tracing::info!("Seeded demo {}", config.character);
    Ok(())
}
