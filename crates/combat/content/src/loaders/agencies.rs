//! Agency profile loader.

use std::path::Path;

use combat_core::AgencyDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::titles::ensure_unique_ids;
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgencyCatalog {
    pub agencies: Vec<AgencyDefinition>,
}

/// Loader for agency profiles from RON files.
pub struct AgencyLoader;

impl AgencyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<AgencyDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<AgencyDefinition>> {
        let catalog: AgencyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse agency catalog RON: {}", e))?;
        ensure_unique_ids(catalog.agencies.iter().map(|a| a.id.as_str()), "agency")?;

        Ok(catalog.agencies)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::ModifierOp;

    use super::*;

    #[test]
    fn reward_multipliers_default_to_one() {
        let agencies = AgencyLoader::parse(
            r#"(agencies: [(
                id: "order",
                name: "Order of the Veil",
                stat_modifiers: [(stat: "def", op: multiply, value: 1.1)],
                debuff_specialist: true,
            )])"#,
        )
        .unwrap();

        let order = &agencies[0];
        assert_eq!(order.exp_multiplier, 1.0);
        assert_eq!(order.prisma_multiplier, 1.0);
        assert!(order.debuff_specialist);
        assert_eq!(order.stat_modifiers[0].op, ModifierOp::Multiply);
    }
}
