//! Deterministic rules of the turn-based combat engine.
//!
//! `combat-core` owns the canonical battle rules (participants, status
//! effects, the damage pipeline, the skill and passive libraries and the
//! turn state machine) and exposes pure, synchronous APIs. All battle
//! state mutation flows through [`engine::CombatSession`]; drivers in
//! `combat-runtime` advance it phase by phase and content crates feed it
//! through [`env::CatalogOracle`].
pub mod ai;
pub mod builder;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod outcome;
pub mod passives;
pub mod skills;
pub mod state;
pub mod stats;

pub use ai::{AiChoice, choose_action};
pub use builder::{build_monster, build_player};
pub use combat::{DamageOutcome, DamageRequest, HitKind};
pub use config::CombatConfig;
pub use engine::{
    ActionError, ActionOutcome, ActionReport, Applied, CombatAction, CombatSession,
    ConfigurationGap, HookBus, HookEvent, HookPoint, MatchKind, OutcomeCallback, Phase,
    SessionBuilder, TurnStart,
};
pub use env::{
    AgencyDefinition, BaseStatLine, CatalogOracle, Dice, EmptyCatalog, FixedRng, ItemDefinition,
    ModifierOp, MonsterDefinition, PcgRng, PlayerId, PlayerSnapshot, RewardRange, RewardTable,
    RngOracle, SequenceRng, SkillDecl, SkillKind, SlotUpgrade, StatBoost, StatModifier,
    TitleDefinition,
};
pub use error::{CombatError, ErrorSeverity};
pub use outcome::{
    CombatOutcome, LevelGrowth, OutcomeReason, RewardGrant, TelemetryEvent, level_from_exp,
};
pub use passives::PassiveId;
pub use skills::SkillId;
pub use state::{
    EffectKind, EffectPayload, EffectSpec, Marker, Participant, PassiveState, Side, SkillRef,
    SkillSlot, StatDelta, StatusEffect, StatusEffects, TurnState,
};
pub use stats::{StatKind, Stats};
