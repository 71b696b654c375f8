//! In-memory catalog indexed by content id.

use std::collections::BTreeMap;

use combat_core::{
    AgencyDefinition, CatalogOracle, ItemDefinition, MonsterDefinition, TitleDefinition,
};

/// Every content table an encounter may consult, keyed by id.
///
/// Later insertions with an existing id replace the earlier entry, so a
/// host can layer override files on top of the bundled data.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    titles: BTreeMap<String, TitleDefinition>,
    monster_titles: BTreeMap<String, TitleDefinition>,
    items: BTreeMap<String, ItemDefinition>,
    agencies: BTreeMap<String, AgencyDefinition>,
    monsters: BTreeMap<String, MonsterDefinition>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_titles(mut self, titles: impl IntoIterator<Item = TitleDefinition>) -> Self {
        self.titles
            .extend(titles.into_iter().map(|t| (t.id.clone(), t)));
        self
    }

    pub fn with_monster_titles(
        mut self,
        titles: impl IntoIterator<Item = TitleDefinition>,
    ) -> Self {
        self.monster_titles
            .extend(titles.into_iter().map(|t| (t.id.clone(), t)));
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemDefinition>) -> Self {
        self.items
            .extend(items.into_iter().map(|i| (i.id.clone(), i)));
        self
    }

    pub fn with_agencies(mut self, agencies: impl IntoIterator<Item = AgencyDefinition>) -> Self {
        self.agencies
            .extend(agencies.into_iter().map(|a| (a.id.clone(), a)));
        self
    }

    pub fn with_monsters(mut self, monsters: impl IntoIterator<Item = MonsterDefinition>) -> Self {
        self.monsters
            .extend(monsters.into_iter().map(|m| (m.id.clone(), m)));
        self
    }

    /// Monster ids in sorted order.
    pub fn monster_ids(&self) -> impl Iterator<Item = &str> {
        self.monsters.keys().map(String::as_str)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterDefinition> {
        self.monsters.values()
    }

    pub fn title_count(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
            && self.monster_titles.is_empty()
            && self.items.is_empty()
            && self.agencies.is_empty()
            && self.monsters.is_empty()
    }
}

impl CatalogOracle for Catalog {
    fn title(&self, id: &str) -> Option<&TitleDefinition> {
        self.titles.get(id)
    }

    fn monster_title(&self, id: &str) -> Option<&TitleDefinition> {
        self.monster_titles.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn agency(&self, id: &str) -> Option<&AgencyDefinition> {
        self.agencies.get(id)
    }

    fn monster(&self, id: &str) -> Option<&MonsterDefinition> {
        self.monsters.get(id)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{BaseStatLine, RewardTable};

    use super::*;

    fn slime(name: &str) -> MonsterDefinition {
        MonsterDefinition {
            id: "slime".into(),
            name: name.into(),
            stats: BaseStatLine::default(),
            title_id: None,
            rewards: RewardTable::default(),
        }
    }

    #[test]
    fn later_entries_replace_earlier_ones() {
        let catalog = Catalog::new()
            .with_monsters([slime("Slime")])
            .with_monsters([slime("King Slime")]);
        assert_eq!(catalog.monster("slime").map(|m| m.name.as_str()), Some("King Slime"));
        assert_eq!(catalog.monster_ids().collect::<Vec<_>>(), vec!["slime"]);
    }

    #[test]
    fn empty_catalog_misses_everything() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.title("bard").is_none());
        assert!(catalog.agency("guild").is_none());
    }
}
