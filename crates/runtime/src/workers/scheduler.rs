//! Repeating round tickers, one per fighting character.
//!
//! A ticker waits one interval, asks the orchestrator for a scheduled round
//! and repeats until the character stops fighting. A stop request wakes the
//! ticker before its next trigger; a round already running completes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use combat_core::{CharacterId, CombatSession, SkillId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, LifecycleEvent};
use crate::orchestrator::CombatOrchestrator;

type SkillPriority = Arc<RwLock<Vec<SkillId>>>;

struct Ticker {
    stop: watch::Sender<bool>,
    skills: SkillPriority,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

pub struct RoundScheduler {
    orchestrator: Arc<CombatOrchestrator>,
    interval: Duration,
    tickers: Mutex<HashMap<CharacterId, Ticker>>,
}

impl RoundScheduler {
    pub fn new(orchestrator: Arc<CombatOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
            tickers: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts combat and its ticker. Starting a character that already has a
    /// running ticker only replaces its skill priority.
    pub async fn start(&self, id: CharacterId, skills: Vec<SkillId>) -> Result<CombatSession> {
        let session = self.orchestrator.start(id).await?;

        let mut tickers = self.tickers();
        if let Some(ticker) = tickers.get(&id).filter(|t| t.is_running()) {
            *ticker.skills.write().unwrap_or_else(PoisonError::into_inner) = skills;
            debug!(character = %id, "Ticker already running");
            return Ok(session);
        }

        let (stop, stop_rx) = watch::channel(false);
        let skills: SkillPriority = Arc::new(RwLock::new(skills));
        let handle = tokio::spawn(run_ticker(
            Arc::clone(&self.orchestrator),
            id,
            self.interval,
            Arc::clone(&skills),
            stop_rx,
        ));
        tickers.insert(id, Ticker { stop, skills, handle });
        debug!(character = %id, interval_ms = self.interval.as_millis() as u64, "Ticker spawned");
        Ok(session)
    }

    /// Cancels the ticker, then clears the fighting flag.
    pub async fn stop(&self, id: CharacterId) -> Result<bool> {
        let ticker = self.tickers().remove(&id);
        if let Some(ticker) = ticker {
            // The receiver is gone once the ticker exited on its own.
            let _ = ticker.stop.send(true);
        }
        self.orchestrator.stop(id).await
    }

    /// Replaces the skill priority used by a running ticker.
    pub fn set_skill_priority(&self, id: CharacterId, skills: Vec<SkillId>) -> bool {
        match self.tickers().get(&id).filter(|t| t.is_running()) {
            Some(ticker) => {
                *ticker.skills.write().unwrap_or_else(PoisonError::into_inner) = skills;
                true
            }
            None => false,
        }
    }

    pub fn is_ticking(&self, id: CharacterId) -> bool {
        self.tickers().get(&id).is_some_and(Ticker::is_running)
    }

    /// Signals every ticker and waits for them to exit. Fighting flags are
    /// left as they are so combat resumes after a restart.
    pub async fn shutdown(&self) -> Result<()> {
        let tickers: Vec<Ticker> = self.tickers().drain().map(|(_, t)| t).collect();
        for ticker in &tickers {
            let _ = ticker.stop.send(true);
        }
        for ticker in tickers {
            ticker.handle.await.map_err(RuntimeError::WorkerJoin)?;
        }
        Ok(())
    }

    fn tickers(&self) -> std::sync::MutexGuard<'_, HashMap<CharacterId, Ticker>> {
        self.tickers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn run_ticker(
    orchestrator: Arc<CombatOrchestrator>,
    id: CharacterId,
    period: Duration,
    skills: SkillPriority,
    mut stop: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; rounds start one period in.
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
                continue;
            }
            _ = interval.tick() => {}
        }

        let requested = skills
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match orchestrator.run_scheduled_round(id, &requested).await {
            Ok(Some(outcome)) if outcome.ends_combat() => {
                debug!(character = %id, "Combat ended; ticker exiting");
                break;
            }
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(err) if err.is_retryable() => {
                warn!(character = %id, "Scheduled round failed, retrying next tick: {}", err);
            }
            Err(err) => {
                error!(character = %id, "Scheduled round failed: {}", err);
                orchestrator
                    .events()
                    .publish(Event::Lifecycle(LifecycleEvent::TickerFailed {
                        character: id,
                        error: err.to_string(),
                    }));
                break;
            }
        }
    }
}
