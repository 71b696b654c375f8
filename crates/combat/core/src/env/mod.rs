//! Traits and types describing the engine's external collaborators.
//!
//! - [`CatalogOracle`] supplies titles, monsters, items and agencies
//! - [`RngOracle`] supplies deterministic randomness

mod catalog;
mod rng;

pub use catalog::{
    AgencyDefinition, BaseStatLine, CatalogOracle, EmptyCatalog, ItemDefinition, ModifierOp,
    MonsterDefinition, PlayerId, PlayerSnapshot, RewardRange, RewardTable, SkillDecl, SkillKind,
    SlotUpgrade, StatBoost, StatModifier, TitleDefinition,
};
pub use rng::{Dice, FixedRng, PcgRng, RngOracle, SequenceRng, compute_seed};
