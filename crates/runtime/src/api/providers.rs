//! Asynchronous abstraction for sourcing combat intent.
//!
//! Runtime users plug in [`ActionProvider`] implementations so a battle can
//! run with human input, scripted fixtures, or the AI policy.
use async_trait::async_trait;
use combat_core::{CombatAction, CombatSession, Side};
use serde::{Deserialize, Serialize};

use super::errors::{ProviderKind, Result};

/// An action submitted from outside the driver (a button press, a command).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub actor: Side,
    pub action: CombatAction,
}

impl ActionRequest {
    pub fn new(actor: Side, action: CombatAction) -> Self {
        Self { actor, action }
    }
}

/// Trait for providing the action of the side whose turn it is.
///
/// Different implementations can handle:
/// - Player input (from a UI or chat front end)
/// - AI decisions
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Provide an action for `actor`.
    ///
    /// The session is lent mutably so AI policies can roll the session
    /// dice; input providers only read it. The driver validates the
    /// returned action and asks again if the engine rejects it.
    async fn provide_action(&self, actor: Side, session: &mut CombatSession) -> Result<CombatAction>;
}
