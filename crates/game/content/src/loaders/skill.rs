//! Skill catalog loader.

use std::path::Path;

use combat_core::SkillDefinition;

use crate::loaders::{LoadResult, ensure_unique, read_file};

/// Loader for skill definitions from RON files.
///
/// RON format: `Vec<SkillDefinition>`; `target` defaults to `single`.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SkillDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SkillDefinition>> {
        let skills: Vec<SkillDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;
        ensure_unique("skill", &skills, |s| s.id)?;
        Ok(skills)
    }
}
