//! Runtime assembly.
//!
//! The runtime wires the store, content oracles, clock and event bus into a
//! [`CombatOrchestrator`], owns the [`RoundScheduler`], and exposes a
//! builder-based API. [`CombatHandle`] is the cloneable façade for clients.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::api::{CombatHandle, Result, RuntimeError};
use crate::clock::{Clock, SystemClock};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::OracleManager;
use crate::orchestrator::CombatOrchestrator;
use crate::repository::{
    CombatStore, DEFAULT_LOG_RETENTION, FileCombatStore, InMemoryCombatStore,
};
use crate::workers::RoundScheduler;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Delay between automatic rounds.
    pub round_interval: Duration,
    pub event_buffer_size: usize,
    /// Base seed for round randomness; drawn from OS entropy when unset.
    pub seed: Option<u64>,
    /// Directory for the file-backed store. `None` keeps state in memory.
    pub store_dir: Option<PathBuf>,
    /// Combat log entries kept per character.
    pub log_retention: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_ROUND_INTERVAL: Duration = Duration::from_millis(3_000);
    pub const MIN_ROUND_INTERVAL: Duration = Duration::from_millis(10);

    /// Reads overrides from the environment.
    ///
    /// - `COMBAT_ROUND_INTERVAL_MS`
    /// - `COMBAT_EVENT_BUFFER`
    /// - `COMBAT_SEED`
    /// - `COMBAT_LOG_RETENTION`
    /// - `COMBAT_STORE_DIR`, or `COMBAT_PERSIST=true` for the per-user data
    ///   directory
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("COMBAT_ROUND_INTERVAL_MS") {
            config.round_interval = Duration::from_millis(millis).max(Self::MIN_ROUND_INTERVAL);
        }

        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        config.seed = read_env::<u64>("COMBAT_SEED");

        if let Some(retention) = read_env::<usize>("COMBAT_LOG_RETENTION") {
            config.log_retention = retention.max(1);
        }

        if let Some(dir) = read_env::<PathBuf>("COMBAT_STORE_DIR") {
            config.store_dir = Some(dir);
        } else if read_env_bool("COMBAT_PERSIST").unwrap_or(false) {
            config.store_dir = default_store_dir();
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            round_interval: Self::DEFAULT_ROUND_INTERVAL,
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
            seed: None,
            store_dir: None,
            log_retention: DEFAULT_LOG_RETENTION,
        }
    }
}

/// Per-user data directory, e.g. `~/.local/share/combat-sim` on Linux.
pub fn default_store_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "combat-sim").map(|dirs| dirs.data_dir().to_path_buf())
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Main runtime that owns the round scheduler.
pub struct Runtime {
    handle: CombatHandle,
    scheduler: Arc<RoundScheduler>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> CombatHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Stops every ticker and waits for in-flight rounds to finish.
    pub async fn shutdown(self) -> Result<()> {
        self.scheduler.shutdown().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    store: Option<Arc<dyn CombatStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            store: None,
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Use `store` instead of the one described by the configuration.
    pub fn store(mut self, store: Arc<dyn CombatStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;

        let store: Arc<dyn CombatStore> = match (self.store, &self.config.store_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => {
                tracing::info!("Using file store in {}", dir.display());
                Arc::new(FileCombatStore::open_with_log_retention(
                    dir,
                    self.config.log_retention,
                )?)
            }
            (None, None) => Arc::new(InMemoryCombatStore::with_log_retention(
                self.config.log_retention,
            )),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let events = EventBus::with_capacity(self.config.event_buffer_size);

        let orchestrator = Arc::new(CombatOrchestrator::new(
            store,
            oracles,
            events,
            clock,
            self.config.seed,
        ));
        let scheduler = Arc::new(RoundScheduler::new(
            Arc::clone(&orchestrator),
            self.config.round_interval,
        ));

        Ok(Runtime {
            handle: CombatHandle::new(orchestrator, Arc::clone(&scheduler)),
            scheduler,
        })
    }
}
