//! Headless AI-vs-AI battle simulator.
//!
//! Loads content, drives one encounter with the AI on both sides and prints
//! the outcome as JSON on stdout.
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use combat_core::PlayerSnapshot;
use combat_runtime::{
    AiActionProvider, CombatDriver, CombatEvent, EncounterBuilder, SessionRegistry, Topic,
};
use config::{Matchup, SimConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _log_guard = setup_logging(config.log_dir.clone())?;

    let (catalog, roster, combat) = match &config.data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            (
                factory.load_catalog()?,
                factory.load_players()?,
                factory.load_config()?,
            )
        }
        None => (
            ContentFactory::bundled_catalog()?,
            ContentFactory::bundled_players()?,
            ContentFactory::bundled_config()?,
        ),
    };
    let runtime = config.runtime.clone().with_combat(combat);

    let registry = SessionRegistry::new();
    let builder = EncounterBuilder::new(&catalog, registry, runtime.clone());
    let encounter = match &config.matchup {
        Matchup::Pve { player, monster } => builder.pve(find(&roster, *player)?, monster)?,
        Matchup::Pvp {
            challenger,
            opponent,
        } => builder.pvp(find(&roster, *challenger)?, find(&roster, *opponent)?)?,
    };
    tracing::info!(seed = encounter.seed, matchup = ?config.matchup, "simulation starting");

    let ai = Arc::new(AiActionProvider::new(runtime.ai_delay));
    let driver = CombatDriver::new(encounter.session, ai.clone(), ai, runtime)
        .with_guard(encounter.guard);

    let echo = config.narrate.then(|| {
        let mut narration = driver.handle().subscribe(Topic::Narration);
        tokio::spawn(async move {
            while let Ok(event) = narration.recv().await {
                if let CombatEvent::Narration { lines } = event {
                    for line in lines {
                        eprintln!("{line}");
                    }
                }
            }
        })
    });

    let outcome = driver.run().await?;
    if let Some(echo) = echo {
        // The bus closes with the driver, which ends the echo task.
        let _ = echo.await;
    }

    let report = serde_json::json!({
        "seed": encounter.seed,
        "outcome": outcome,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn find(roster: &[PlayerSnapshot], id: u64) -> Result<&PlayerSnapshot> {
    roster
        .iter()
        .find(|p| p.player_id.0 == id)
        .with_context(|| format!("player {id} is not in the roster"))
}

/// Setup logging to a rolling file under the platform log directory.
fn setup_logging(log_dir: Option<PathBuf>) -> Result<WorkerGuard> {
    let log_dir = log_dir.unwrap_or_else(default_log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "combat-sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/combat-sim.log", log_dir.display());
    Ok(guard)
}

/// Platform cache directory for logs, following `directories` conventions.
fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "combat-sim")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/combat-sim/logs"))
}
