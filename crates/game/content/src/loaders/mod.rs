//! Content loaders for reading combat data from files.
//!
//! Each loader parses one file into `combat-core` types; [`ContentFactory`]
//! ties them to a data directory and cross-checks the result.

pub mod config;
pub mod factory;
pub mod map;
pub mod monster;
pub mod skill;
pub mod tables;

pub use config::ConfigLoader;
pub use factory::{ContentCatalog, ContentFactory};
pub use map::MapLoader;
pub use monster::MonsterLoader;
pub use skill::SkillLoader;
pub use tables::{ContentTables, TablesLoader};

use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Fails on the first id that appears twice.
pub(crate) fn ensure_unique<T, K>(kind: &str, items: &[T], key: impl Fn(&T) -> K) -> LoadResult<()>
where
    K: Eq + Hash + std::fmt::Display,
{
    let mut seen = HashSet::new();
    for item in items {
        let id = key(item);
        if seen.contains(&id) {
            anyhow::bail!("Duplicate {} id {}", kind, id);
        }
        seen.insert(id);
    }
    Ok(())
}
