//! Content loaders for reading combat data from files.
//!
//! Every loader offers `load(path)` for files and `parse(text)` for data
//! that is already in memory (bundled content, tests).

pub mod agencies;
pub mod config;
pub mod factory;
pub mod item;
pub mod monsters;
pub mod players;
pub mod titles;

pub use agencies::AgencyLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use item::ItemLoader;
pub use monsters::{MonsterCatalog, MonsterLoader};
pub use players::PlayerLoader;
pub use titles::TitleLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
