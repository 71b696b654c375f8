//! Cloneable façade for talking to a running driver.
//!
//! [`DriverHandle`] hides channel plumbing and offers helpers for
//! surrendering or streaming events from specific topics.
use tokio::sync::{broadcast, mpsc};

use combat_core::Side;

use super::errors::{Result, RuntimeError};
use crate::driver::Control;
use crate::events::{CombatEvent, EventBus, Topic};

/// Client-facing handle to interact with a driver.
#[derive(Clone)]
pub struct DriverHandle {
    control_tx: mpsc::Sender<Control>,
    event_bus: EventBus,
}

impl DriverHandle {
    pub(crate) fn new(control_tx: mpsc::Sender<Control>, event_bus: EventBus) -> Self {
        Self {
            control_tx,
            event_bus,
        }
    }

    /// Concede the battle on behalf of `side`.
    ///
    /// The driver applies it at the next phase boundary, including while it
    /// is waiting for an action.
    pub async fn surrender(&self, side: Side) -> Result<()> {
        self.control_tx
            .send(Control::Surrender(side))
            .await
            .map_err(|_| RuntimeError::ControlChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Narration` - Battle log lines, one event per phase
    /// - `Topic::Phase` - Turn, rejection and finish notifications
    /// - `Topic::Telemetry` - Quest and statistics events
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<CombatEvent>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
