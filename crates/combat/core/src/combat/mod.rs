//! Pure combat formulas.
//!
//! This module holds the side-effect free pieces of damage resolution.
//! The stateful pipeline that rolls dice, consumes shields and fires hooks
//! lives in [`engine`](crate::engine).
//!
//! # Core Functions
//!
//! - `evasion_chance`: speed-derived evasion with bonuses and cap
//! - `mitigated_damage`: attack × multiplier, crit, vulnerability, defense

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{DamageRequest, MitigationInput, mitigated_damage};
pub use hit::evasion_chance;
pub use result::{DamageOutcome, HitKind};
