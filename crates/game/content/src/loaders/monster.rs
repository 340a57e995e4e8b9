//! Monster catalog loader.

use std::path::Path;

use combat_core::MonsterDefinition;

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for the monster catalog from RON files.
///
/// RON format: `Vec<MonsterDefinition>`
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MonsterDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MonsterDefinition>> {
        let monsters: Vec<MonsterDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))?;

        ensure_unique("monster", &monsters, |m| m.id)?;
        for monster in &monsters {
            if monster.level == 0 || monster.hp == 0 {
                anyhow::bail!(
                    "Monster '{}' ({}) needs a positive level and hp",
                    monster.name,
                    monster.id
                );
            }
            let over = monster
                .drops
                .as_ref()
                .is_some_and(|d| d.item_chance > 100 || d.copper_chance > 100);
            if over {
                anyhow::bail!("Monster '{}' has a drop chance above 100", monster.name);
            }
        }
        Ok(monsters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definition_without_drops() {
        let monsters = MonsterLoader::parse(
            r#"[(
                id: 3,
                name: "Bat",
                kind: "beast",
                level: 2,
                hp: 30,
                attack: 6,
                defense: 2,
                experience: 8,
            )]"#,
        )
        .unwrap();

        assert_eq!(monsters.len(), 1);
        assert!(monsters[0].drops.is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let bat = r#"(id: 3, name: "Bat", kind: "beast", level: 2, hp: 30, attack: 6, defense: 2, experience: 8)"#;
        let err = MonsterLoader::parse(&format!("[{bat}, {bat}]")).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }
}
