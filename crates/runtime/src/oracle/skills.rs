use std::collections::HashMap;

use combat_core::{SkillDefinition, SkillId, SkillOracle};

#[derive(Debug, Clone, Default)]
pub struct SkillOracleImpl {
    skills: HashMap<SkillId, SkillDefinition>,
}

impl SkillOracleImpl {
    pub fn new(skills: impl IntoIterator<Item = SkillDefinition>) -> Self {
        Self {
            skills: skills.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl SkillOracle for SkillOracleImpl {
    fn skill(&self, id: SkillId) -> Option<SkillDefinition> {
        self.skills.get(&id).cloned()
    }
}
