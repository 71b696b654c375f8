//! Player input delivered over a channel.

use async_trait::async_trait;
use combat_core::{CombatAction, CombatSession, Side};
use tokio::sync::{Mutex, mpsc};

use crate::api::{ActionProvider, ActionRequest, ProviderKind, Result, RuntimeError};

/// Sending half handed to the front end.
#[derive(Clone, Debug)]
pub struct ActionSender {
    tx: mpsc::Sender<ActionRequest>,
    side: Side,
}

impl ActionSender {
    pub fn side(&self) -> Side {
        self.side
    }

    pub async fn send(&self, action: CombatAction) -> Result<()> {
        self.tx
            .send(ActionRequest::new(self.side, action))
            .await
            .map_err(|_| RuntimeError::ProviderChannelClosed { side: self.side })
    }
}

/// Provider that waits for actions pushed through an [`ActionSender`].
///
/// Requests addressed to the other side are discarded. The driver bounds
/// the wait with its inactivity timeout.
pub struct ChannelActionProvider {
    rx: Mutex<mpsc::Receiver<ActionRequest>>,
}

impl ChannelActionProvider {
    /// Creates a provider for `side` and its sender.
    pub fn channel(side: Side, buffer: usize) -> (ActionSender, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (
            ActionSender { tx, side },
            Self { rx: Mutex::new(rx) },
        )
    }
}

#[async_trait]
impl ActionProvider for ChannelActionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Player
    }

    async fn provide_action(&self, actor: Side, _session: &mut CombatSession) -> Result<CombatAction> {
        let mut rx = self.rx.lock().await;
        loop {
            let request = rx
                .recv()
                .await
                .ok_or(RuntimeError::ProviderChannelClosed { side: actor })?;
            if request.actor == actor {
                return Ok(request.action);
            }
            tracing::warn!(
                target: "runtime::input",
                expected = %actor,
                got = %request.actor,
                "discarding input for the wrong side"
            );
        }
    }
}
