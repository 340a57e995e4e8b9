//! Combat simulator binary.
//!
//! Assembles the runtime from the bundled (or `COMBAT_CONTENT_DIR`) content,
//! seeds a demo character, starts automatic combat and prints every event as
//! one JSON line on stdout until the configured number of rounds, a defeat,
//! an auto-stop, or Ctrl-C.
//!
//! ```bash
//! COMBAT_ROUND_INTERVAL_MS=500 SIM_ROUNDS=10 cargo run -p combat-client
//! ```
mod config;
mod demo;
mod logging;

use anyhow::Result;
use combat_content::ContentFactory;
use combat_runtime::{Event, LifecycleEvent, OracleManager, Runtime, RuntimeConfig, Topic};
use tokio::sync::broadcast::error::RecvError;

use config::SimConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let sim = SimConfig::from_env();
    let runtime_config = RuntimeConfig::from_env();

    let log_dir = sim.log_dir.clone().unwrap_or_else(logging::log_directory);
    logging::setup_logging(&log_dir)?;

    let factory = match &sim.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    tracing::info!("Loading content from {}", factory.data_dir().display());
    let catalog = factory.load_catalog()?;

    tracing::info!(
        "Round interval: {:?}, store: {}",
        runtime_config.round_interval,
        runtime_config
            .store_dir
            .as_ref()
            .map_or_else(|| "memory".to_string(), |dir| dir.display().to_string())
    );
    let runtime = Runtime::builder()
        .config(runtime_config)
        .oracles(OracleManager::from_catalog(catalog))
        .build()?;
    let handle = runtime.handle();

    demo::ensure_character(handle.store().as_ref(), &sim)?;

    let mut combat = handle.subscribe(Topic::Combat);
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    handle.start(sim.character, sim.skills.clone()).await?;

    let mut rounds = 0u64;
    loop {
        tokio::select! {
            event = combat.recv() => match event {
                Ok(event) => {
                    print_event(&event)?;
                    match event {
                        Event::Round(_) => rounds += 1,
                        Event::Defeat(_) => break,
                        Event::Lifecycle(_) => {}
                    }
                    if rounds >= sim.rounds {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} combat events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            event = lifecycle.recv() => match event {
                Ok(event) => {
                    print_event(&event)?;
                    if matches!(
                        event,
                        Event::Lifecycle(
                            LifecycleEvent::AutoStopped { .. } | LifecycleEvent::TickerFailed { .. }
                        )
                    ) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} lifecycle events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    handle.stop(sim.character).await?;
    let status = handle.status(sim.character)?;
    println!("{}", serde_json::to_string(&status)?);

    runtime.shutdown().await?;
    tracing::info!("Simulation finished after {} rounds", rounds);
    Ok(())
}

fn print_event(event: &Event) -> Result<()> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
