//! Monster and monster title loader.

use std::path::Path;

use combat_core::{MonsterDefinition, TitleDefinition};
use serde::{Deserialize, Serialize};

use crate::loaders::titles::ensure_unique_ids;
use crate::loaders::{LoadResult, read_file};

/// Monster catalog structure for RON files.
///
/// Monster titles live next to the monsters that reference them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonsterCatalog {
    #[serde(default)]
    pub monster_titles: Vec<TitleDefinition>,
    pub monsters: Vec<MonsterDefinition>,
}

/// Loader for monsters from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        Self::parse(&read_file(path)?)
    }

    /// Parses and validates a monster catalog.
    ///
    /// Reward ranges must satisfy `min <= max`. A title reference that the
    /// file does not define is allowed; the builder treats it as a data gap.
    pub fn parse(content: &str) -> LoadResult<MonsterCatalog> {
        let catalog: MonsterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))?;
        ensure_unique_ids(catalog.monsters.iter().map(|m| m.id.as_str()), "monster")?;
        ensure_unique_ids(
            catalog.monster_titles.iter().map(|t| t.id.as_str()),
            "monster title",
        )?;

        for monster in &catalog.monsters {
            let rewards = &monster.rewards;
            if rewards.exp.min > rewards.exp.max || rewards.prisma.min > rewards.prisma.max {
                anyhow::bail!("Monster '{}' has an inverted reward range", monster.id);
            }
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_monsters_with_titles() {
        let catalog = MonsterLoader::parse(
            r#"(
                monster_titles: [
                    (id: "brute", name: "Brute", skills: [(name: "Savage Rampage", kind: active)]),
                ],
                monsters: [
                    (
                        id: "ogre",
                        name: "Ogre",
                        stats: (hp: 400.0, atk: 30.0, def: 12.0, spd: 5.0),
                        title_id: Some("brute"),
                        rewards: (exp: (min: 10, max: 20), prisma: (min: 1, max: 3)),
                    ),
                ],
            )"#,
        )
        .unwrap();

        let ogre = &catalog.monsters[0];
        assert_eq!(ogre.stats.hp, 400.0);
        // Omitted crit stats fall back to the stat line defaults.
        assert_eq!(ogre.stats.crit_rate, 0.05);
        assert_eq!(ogre.rewards.exp.max, 20);
        assert_eq!(catalog.monster_titles[0].skills.len(), 1);
    }

    #[test]
    fn rejects_inverted_reward_ranges() {
        let err = MonsterLoader::parse(
            r#"(monsters: [(
                id: "imp",
                name: "Imp",
                stats: (hp: 50.0),
                rewards: (exp: (min: 9, max: 1), prisma: (min: 0, max: 0)),
            )])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'imp'"));
    }
}
