//! Equipment loader.

use std::path::Path;

use combat_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::titles::ensure_unique_ids;
use crate::loaders::{LoadResult, read_file};

/// Root of `items.ron`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Reads equipment definitions. Stat boosts are stored unscaled; the
/// participant builder applies the slot's upgrade level.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        ensure_unique_ids(catalog.items.iter().map(|i| i.id.as_str()), "item")?;

        Ok(catalog.items)
    }
}
