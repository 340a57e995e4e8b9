//! Hunting ground loader.

use std::path::Path;

use combat_core::MapDefinition;

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for map definitions from RON files.
///
/// RON format: `Vec<MapDefinition>`. Monster references are checked by
/// [`ContentFactory::load_catalog`](crate::ContentFactory::load_catalog).
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MapDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MapDefinition>> {
        let maps: Vec<MapDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        ensure_unique("map", &maps, |m| m.id)?;
        for map in &maps {
            if map.min_level > map.max_level {
                anyhow::bail!(
                    "Map '{}' has min_level {} above max_level {}",
                    map.name,
                    map.min_level,
                    map.max_level
                );
            }
        }
        Ok(maps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_level_range_is_rejected() {
        let err = MapLoader::parse(
            r#"[(id: 1, name: "Cliffs", min_level: 9, max_level: 3, monsters: [])]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Cliffs"));
    }
}
