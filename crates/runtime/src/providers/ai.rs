//! AI action provider.

use std::time::Duration;

use async_trait::async_trait;
use combat_core::{CombatAction, CombatSession, Side, choose_action};

use crate::api::{ActionProvider, ProviderKind, Result};

/// Wraps the engine's AI policy behind the provider interface.
///
/// The provider waits `delay` before deciding so a watching player can
/// follow the narration. The decision itself rolls the session dice, so a
/// seeded session replays identically regardless of the delay.
#[derive(Debug, Clone, Default)]
pub struct AiActionProvider {
    delay: Duration,
}

impl AiActionProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A provider that decides immediately.
    pub fn instant() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActionProvider for AiActionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ai
    }

    async fn provide_action(&self, actor: Side, session: &mut CombatSession) -> Result<CombatAction> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let choice = choose_action(session, actor);
        tracing::debug!(
            target: "runtime::ai",
            side = %actor,
            target_side = %choice.target,
            action = ?choice.action,
            "ai chose action"
        );
        Ok(choice.action)
    }
}
