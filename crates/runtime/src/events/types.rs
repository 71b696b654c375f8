use combat_core::{CombatOutcome, MatchKind, Side, TelemetryEvent};
use serde::{Deserialize, Serialize};

use super::bus::Topic;

/// Phase notifications emitted by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhaseEvent {
    Started {
        kind: MatchKind,
        first: Side,
    },
    /// `side` may act now.
    AwaitingAction { side: Side, round: u32 },
    /// `side` lost its action to a control effect.
    TurnSkipped { side: Side, round: u32 },
    /// The engine refused an action; the driver asks again.
    ActionRejected { side: Side, reason: String },
    Finished(CombatOutcome),
}

/// Event wrapper that carries the payload of one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Narration produced since the previous phase boundary.
    Narration { lines: Vec<String> },
    Phase(PhaseEvent),
    Telemetry(TelemetryEvent),
}

impl CombatEvent {
    pub fn topic(&self) -> Topic {
        match self {
            CombatEvent::Narration { .. } => Topic::Narration,
            CombatEvent::Phase(_) => Topic::Phase,
            CombatEvent::Telemetry(_) => Topic::Telemetry,
        }
    }
}
