//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::CombatEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle log lines
    Narration,
    /// Turn management and final outcome
    Phase,
    /// Quest and statistics events
    Telemetry,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Narration, Topic::Phase, Topic::Telemetry];
}

struct Channels {
    narration: broadcast::Sender<CombatEvent>,
    phase: broadcast::Sender<CombatEvent>,
    telemetry: broadcast::Sender<CombatEvent>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<CombatEvent> {
        match topic {
            Topic::Narration => &self.narration,
            Topic::Phase => &self.phase,
            Topic::Telemetry => &self.telemetry,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing is fire-and-forget: events sent while
/// nobody listens are dropped, and slow receivers observe `Lagged`.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                narration: broadcast::channel(capacity).0,
                phase: broadcast::channel(capacity).0,
                telemetry: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: CombatEvent) {
        let topic = event.topic();
        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<CombatEvent> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<CombatEvent>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut narration = bus.subscribe(Topic::Narration);
        let mut phase = bus.subscribe(Topic::Phase);

        bus.publish(CombatEvent::Narration {
            lines: vec!["hello".into()],
        });

        assert_eq!(
            narration.recv().await.unwrap(),
            CombatEvent::Narration {
                lines: vec!["hello".into()]
            }
        );
        assert!(matches!(
            phase.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        EventBus::new().publish(CombatEvent::Narration { lines: Vec::new() });
    }
}
