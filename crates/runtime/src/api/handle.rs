//! Cloneable façade over the orchestrator and round scheduler.
//!
//! [`CombatHandle`] is what clients hold: start and stop automatic combat,
//! run a round on demand, query status and logs, or stream events from
//! specific topics.
use std::collections::HashMap;
use std::sync::Arc;

use combat_core::{CharacterId, CombatSession, SkillId};
use tokio::sync::broadcast;

use super::errors::Result;
use crate::events::{Event, Topic};
use crate::orchestrator::{CombatOrchestrator, CombatStatus, RoundOutcome};
use crate::repository::{CombatLogEntry, CombatStore};
use crate::workers::RoundScheduler;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct CombatHandle {
    orchestrator: Arc<CombatOrchestrator>,
    scheduler: Arc<RoundScheduler>,
}

impl CombatHandle {
    pub(crate) fn new(orchestrator: Arc<CombatOrchestrator>, scheduler: Arc<RoundScheduler>) -> Self {
        Self {
            orchestrator,
            scheduler,
        }
    }

    /// Starts automatic combat; a round runs every configured interval using
    /// `skills` as the priority list. Calling it again while combat runs
    /// only updates the priority list.
    pub async fn start(&self, id: CharacterId, skills: Vec<SkillId>) -> Result<CombatSession> {
        self.scheduler.start(id, skills).await
    }

    /// Stops automatic combat. Returns false if the character was idle.
    pub async fn stop(&self, id: CharacterId) -> Result<bool> {
        self.scheduler.stop(id).await
    }

    /// Resolves one round immediately, outside the ticker.
    pub async fn run_round(&self, id: CharacterId, skills: &[SkillId]) -> Result<RoundOutcome> {
        self.orchestrator.run_round(id, skills).await
    }

    pub fn set_skill_priority(&self, id: CharacterId, skills: Vec<SkillId>) -> bool {
        self.scheduler.set_skill_priority(id, skills)
    }

    pub fn is_ticking(&self, id: CharacterId) -> bool {
        self.scheduler.is_ticking(id)
    }

    pub fn status(&self, id: CharacterId) -> Result<CombatStatus> {
        self.orchestrator.status(id)
    }

    /// Most recent combat logs, newest first.
    pub fn logs(&self, id: CharacterId, limit: usize) -> Result<Vec<CombatLogEntry>> {
        self.orchestrator.logs(id, limit)
    }

    pub fn store(&self) -> Arc<dyn CombatStore> {
        Arc::clone(self.orchestrator.store())
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - Resolved rounds and defeats
    /// - `Topic::Lifecycle` - Start, stop, auto-stop and ticker failures
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.orchestrator.events().subscribe(topic)
    }

    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.orchestrator.events().subscribe_multiple(topics)
    }
}
