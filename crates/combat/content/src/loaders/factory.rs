//! Content factory for building catalogs from data files.

use std::path::{Path, PathBuf};

use combat_core::{
    AgencyDefinition, CombatConfig, ItemDefinition, PlayerSnapshot, TitleDefinition,
};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::loaders::{
    AgencyLoader, ConfigLoader, ItemLoader, LoadResult, MonsterCatalog, MonsterLoader,
    PlayerLoader, TitleLoader,
};

const BUNDLED_TITLES: &str = include_str!("../../data/titles.ron");
const BUNDLED_MONSTERS: &str = include_str!("../../data/monsters.ron");
const BUNDLED_ITEMS: &str = include_str!("../../data/items.ron");
const BUNDLED_AGENCIES: &str = include_str!("../../data/agencies.ron");
const BUNDLED_PLAYERS: &str = include_str!("../../data/players.ron");
const BUNDLED_CONFIG: &str = include_str!("../../data/config.toml");

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── titles.ron
/// ├── monsters.ron
/// ├── items.ron
/// ├── agencies.ron
/// └── players.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load player titles from `titles.ron`.
    pub fn load_titles(&self) -> LoadResult<Vec<TitleDefinition>> {
        TitleLoader::load(&self.data_dir.join("titles.ron"))
    }

    /// Load monsters and monster titles from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDefinition>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load agency profiles from `agencies.ron`.
    pub fn load_agencies(&self) -> LoadResult<Vec<AgencyDefinition>> {
        AgencyLoader::load(&self.data_dir.join("agencies.ron"))
    }

    /// Load the player roster from `players.ron`.
    pub fn load_players(&self) -> LoadResult<Vec<PlayerSnapshot>> {
        PlayerLoader::load(&self.data_dir.join("players.ron"))
    }

    /// Loads every catalog table in the directory into one [`Catalog`].
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let monsters = self.load_monsters()?;
        let catalog = Catalog::new()
            .with_titles(self.load_titles()?)
            .with_monster_titles(monsters.monster_titles)
            .with_monsters(monsters.monsters)
            .with_items(self.load_items()?)
            .with_agencies(self.load_agencies()?);
        info!(
            target: "content::factory",
            dir = %self.data_dir.display(),
            titles = catalog.title_count(),
            monsters = catalog.monsters().count(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The catalog compiled into the crate.
    pub fn bundled_catalog() -> LoadResult<Catalog> {
        let monsters = MonsterLoader::parse(BUNDLED_MONSTERS)?;
        let catalog = Catalog::new()
            .with_titles(TitleLoader::parse(BUNDLED_TITLES)?)
            .with_monster_titles(monsters.monster_titles)
            .with_monsters(monsters.monsters)
            .with_items(ItemLoader::parse(BUNDLED_ITEMS)?)
            .with_agencies(AgencyLoader::parse(BUNDLED_AGENCIES)?);
        debug!(target: "content::factory", "bundled catalog parsed");
        Ok(catalog)
    }

    /// The player roster compiled into the crate.
    pub fn bundled_players() -> LoadResult<Vec<PlayerSnapshot>> {
        PlayerLoader::parse(BUNDLED_PLAYERS)
    }

    /// The tuning compiled into the crate.
    pub fn bundled_config() -> LoadResult<CombatConfig> {
        ConfigLoader::parse(BUNDLED_CONFIG)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{CatalogOracle, SkillRef, build_monster, build_player};

    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_parses() {
        let catalog = ContentFactory::bundled_catalog().unwrap();
        assert!(catalog.monster_ids().count() >= 3);
        assert_eq!(
            ContentFactory::bundled_config().unwrap(),
            CombatConfig::default()
        );
        assert!(!ContentFactory::bundled_players().unwrap().is_empty());
    }

    /// Every declared active in the bundled data resolves to a known skill.
    #[test]
    fn bundled_skills_are_implemented() {
        let catalog = ContentFactory::bundled_catalog().unwrap();
        for player in ContentFactory::bundled_players().unwrap() {
            let built = build_player(&player, &catalog);
            assert!(
                built.skills.iter().all(|s| s.skill != SkillRef::Unknown),
                "{} declares an unknown skill",
                player.name
            );
        }
        for id in catalog.monster_ids() {
            let monster = catalog.monster(id).unwrap();
            let built = build_monster(monster, &catalog);
            assert!(built.skills.iter().all(|s| s.skill != SkillRef::Unknown));
        }
    }
}
