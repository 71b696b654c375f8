//! Player title loader.

use std::path::Path;

use combat_core::TitleDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Title catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleCatalog {
    pub titles: Vec<TitleDefinition>,
}

/// Loader for player titles from RON files.
pub struct TitleLoader;

impl TitleLoader {
    /// Load player titles from a RON file.
    ///
    /// Titles with duplicate ids are rejected: the second definition would
    /// silently shadow the first once indexed.
    pub fn load(path: &Path) -> LoadResult<Vec<TitleDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<TitleDefinition>> {
        let catalog: TitleCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse title catalog RON: {}", e))?;
        ensure_unique_ids(catalog.titles.iter().map(|t| t.id.as_str()), "title")?;

        Ok(catalog.titles)
    }
}

/// Fails on the first id that appears twice.
pub(crate) fn ensure_unique_ids<'a>(
    ids: impl Iterator<Item = &'a str>,
    what: &str,
) -> LoadResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("Duplicate {} id '{}'", what, id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use combat_core::SkillKind;

    use super::*;

    #[test]
    fn parses_skill_declarations() {
        let titles = TitleLoader::parse(
            r#"(
                titles: [
                    (
                        id: "bard",
                        name: "Wandering Bard",
                        stat_boost: { "spd": 4.0 },
                        skills: [
                            (name: "Sorrowful Aria", kind: active, cooldown: Some(4)),
                            (name: "Verse of the Griffin", kind: active),
                            (name: "Feathered Sonnet", kind: passive),
                        ],
                    ),
                ],
            )"#,
        )
        .unwrap();

        let bard = &titles[0];
        assert_eq!(bard.stat_boost.get("spd"), Some(&4.0));
        assert_eq!(bard.skills[0].cooldown, Some(4));
        assert_eq!(bard.skills[1].cooldown, None);
        assert_eq!(bard.skills[2].kind, SkillKind::Passive);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = TitleLoader::parse(
            r#"(titles: [(id: "a", name: "A"), (id: "a", name: "B")])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate title id 'a'"));
    }
}
