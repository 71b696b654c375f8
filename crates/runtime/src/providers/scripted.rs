//! Replays a fixed list of actions.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use combat_core::{CombatAction, CombatSession, Side};

use crate::api::{ActionProvider, ProviderKind, Result};

/// Hands out queued actions in order, then basic attacks.
#[derive(Debug, Default)]
pub struct ScriptedActionProvider {
    script: Mutex<VecDeque<CombatAction>>,
}

impl ScriptedActionProvider {
    pub fn new(script: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedActionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Scripted
    }

    async fn provide_action(&self, _actor: Side, _session: &mut CombatSession) -> Result<CombatAction> {
        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or(CombatAction::Attack))
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{Participant, SessionBuilder, Stats};

    use super::*;

    #[tokio::test]
    async fn falls_back_to_attacks_once_the_script_runs_out() {
        let mut session = SessionBuilder::new(
            Participant::new("A", Stats::default()),
            Participant::new("B", Stats::default()),
        )
        .build();
        let provider = ScriptedActionProvider::new([CombatAction::Skill("Heavy Blow".into())]);

        assert_eq!(
            provider.provide_action(Side::P1, &mut session).await.unwrap(),
            CombatAction::Skill("Heavy Blow".into())
        );
        assert_eq!(provider.remaining(), 0);
        assert_eq!(
            provider.provide_action(Side::P1, &mut session).await.unwrap(),
            CombatAction::Attack
        );
    }
}
