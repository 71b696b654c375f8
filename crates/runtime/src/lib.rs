//! Async orchestration for combat sessions.
//!
//! `combat-core` resolves everything synchronously. This crate drives a
//! [`combat_core::CombatSession`] phase by phase, suspending between phases
//! to await player input or an AI delay, and publishes what happened on a
//! topic event bus. Consumers build an encounter, hand it to a
//! [`CombatDriver`] together with one [`ActionProvider`] per side, and talk
//! to the running battle through a [`DriverHandle`].
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`providers`] ships the built-in action providers
//! - [`registry`] tracks which players are currently fighting
//! - [`driver`] hosts the turn loop and its configuration
pub mod api;
pub mod driver;
pub mod encounter;
pub mod events;
pub mod logging;
pub mod providers;
pub mod registry;

pub use api::{ActionProvider, ActionRequest, DriverHandle, ProviderKind, Result, RuntimeError};
pub use driver::{CombatDriver, RuntimeConfig};
pub use encounter::{Encounter, EncounterBuilder};
pub use events::{CombatEvent, EventBus, PhaseEvent, Topic};
pub use logging::init_tracing;
pub use providers::{AiActionProvider, ChannelActionProvider, ScriptedActionProvider};
pub use registry::{SessionGuard, SessionRegistry};
