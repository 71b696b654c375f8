//! Battle-time state: participants, their effects and turn bookkeeping.
//!
//! The engine owns these structures inside a
//! [`CombatSession`](crate::engine::CombatSession) and mutates them only
//! through its operations.

mod participant;
mod passive;
mod status;
mod turn;

pub use participant::{Participant, Side, SkillRef, SkillSlot};
pub use passive::PassiveState;
pub use status::{
    EffectCategory, EffectKind, EffectPayload, EffectSpec, Marker, StatDelta, StatusEffect,
    StatusEffects,
};
pub use turn::TurnState;
