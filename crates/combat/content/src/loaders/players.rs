//! Player snapshot loader.
//!
//! Live hosts read snapshots from their own persistence; the simulator and
//! tests read them from a RON roster.

use std::path::Path;

use combat_core::PlayerSnapshot;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRoster {
    pub players: Vec<PlayerSnapshot>,
}

/// Loader for player snapshots from RON files.
pub struct PlayerLoader;

impl PlayerLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<PlayerSnapshot>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<PlayerSnapshot>> {
        let roster: PlayerRoster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse player roster RON: {}", e))?;

        Ok(roster.players)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::PlayerId;

    use super::*;

    #[test]
    fn parses_equipment_and_upgrades() {
        let players = PlayerLoader::parse(
            r#"(players: [(
                player_id: (7),
                name: "Ayla",
                level: 4,
                base: (hp: 220.0, atk: 24.0, def: 11.0, spd: 13.0),
                equipment: { "weapon": "iron_sword" },
                upgrades: { "weapon": (level: 2, bonus_stats: { "crit_rate": 0.02 }) },
                title_id: Some("bard"),
            )])"#,
        )
        .unwrap();

        let ayla = &players[0];
        assert_eq!(ayla.player_id, PlayerId(7));
        assert_eq!(ayla.equipment["weapon"], "iron_sword");
        assert_eq!(ayla.upgrades["weapon"].level, 2);
        assert_eq!(ayla.agency_id, None);
        assert_eq!(ayla.base.crit_damage, 1.5);
    }
}
