use std::collections::HashMap;

use combat_core::{MapDefinition, MapId, MapOracle};

#[derive(Debug, Clone, Default)]
pub struct MapOracleImpl {
    maps: HashMap<MapId, MapDefinition>,
}

impl MapOracleImpl {
    pub fn new(maps: impl IntoIterator<Item = MapDefinition>) -> Self {
        Self {
            maps: maps.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

impl MapOracle for MapOracleImpl {
    fn map(&self, id: MapId) -> Option<MapDefinition> {
        self.maps.get(&id).cloned()
    }
}
