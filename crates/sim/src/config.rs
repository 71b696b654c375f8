//! Simulator configuration read from the environment.
use std::env;
use std::path::PathBuf;

use combat_runtime::RuntimeConfig;

/// Which encounter to simulate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Matchup {
    /// A roster player against a catalog monster.
    Pve { player: u64, monster: String },
    /// Two roster players.
    Pvp { challenger: u64, opponent: u64 },
}

#[derive(Clone, Debug)]
pub struct SimConfig {
    pub runtime: RuntimeConfig,
    pub matchup: Matchup,
    /// Content directory. `None` uses the bundled catalog.
    pub data_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    /// Echo narration to stderr while the battle runs.
    pub narrate: bool,
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables (on top of those read by [`RuntimeConfig::from_env`]):
    /// - `SIM_PLAYER` - Roster id of the first player (default: 1001)
    /// - `SIM_MONSTER` - Monster id for PvE (default: thornback_wolf)
    /// - `SIM_OPPONENT` - Roster id of a second player; switches to PvP
    /// - `SIM_DATA_DIR` - Content directory (default: bundled content)
    /// - `SIM_LOG_DIR` - Log directory (default: platform-specific)
    /// - `SIM_NARRATE` - Echo narration to stderr (default: true)
    ///
    /// The AI delay defaults to zero here; set `COMBAT_AI_DELAY_MS` to watch
    /// a battle at table speed.
    pub fn from_env() -> Self {
        let mut runtime = RuntimeConfig::from_env();
        if env::var("COMBAT_AI_DELAY_MS").is_err() {
            runtime.ai_delay = std::time::Duration::ZERO;
        }
        if runtime.max_turns.is_none() {
            runtime.max_turns = Some(1_000);
        }

        let player = read_env::<u64>("SIM_PLAYER").unwrap_or(1001);
        let matchup = match read_env::<u64>("SIM_OPPONENT") {
            Some(opponent) => Matchup::Pvp {
                challenger: player,
                opponent,
            },
            None => Matchup::Pve {
                player,
                monster: env::var("SIM_MONSTER").unwrap_or_else(|_| "thornback_wolf".into()),
            },
        };

        Self {
            runtime,
            matchup,
            data_dir: env::var("SIM_DATA_DIR").ok().map(PathBuf::from),
            log_dir: env::var("SIM_LOG_DIR").ok().map(PathBuf::from),
            narrate: read_env::<bool>("SIM_NARRATE").unwrap_or(true),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
