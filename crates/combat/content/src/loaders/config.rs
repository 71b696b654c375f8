//! Combat tuning loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys absent from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if !(0.0..=1.0).contains(&config.evasion_cap) {
            anyhow::bail!("evasion_cap must lie in [0, 1], got {}", config.evasion_cap);
        }
        if !(0.0..=1.0).contains(&config.ai_skill_chance) {
            anyhow::bail!(
                "ai_skill_chance must lie in [0, 1], got {}",
                config.ai_skill_chance
            );
        }

        Ok(config)
    }
}
