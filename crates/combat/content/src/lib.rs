//! Data-driven content definitions and loaders.
//!
//! This crate houses static combat content and provides loaders for RON/TOML data files:
//! - Player titles and their skill declarations (RON)
//! - Monsters and monster titles (RON)
//! - Item catalogs (RON)
//! - Agency profiles (RON)
//! - Player snapshots for offline simulation (RON)
//! - Engine tuning (TOML)
//!
//! Content is consumed through [`combat_core::CatalogOracle`] and never appears in battle state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::Catalog;

#[cfg(feature = "loaders")]
pub use loaders::{
    AgencyLoader, ConfigLoader, ContentFactory, ItemLoader, MonsterLoader, PlayerLoader,
    TitleLoader,
};
