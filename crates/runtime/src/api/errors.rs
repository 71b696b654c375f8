//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine, the session registry and action
//! providers so clients can bubble them up with consistent context.
use std::fmt;

use combat_core::{ActionError, PlayerId, Side};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("player {player} is already in combat")]
    AlreadyInCombat { player: PlayerId },

    #[error("unknown monster '{0}'")]
    UnknownMonster(String),

    #[error("{side} action provider channel closed")]
    ProviderChannelClosed { side: Side },

    #[error("driver control channel closed")]
    ControlChannelClosed,

    #[error("driver task join failed")]
    DriverJoin(#[source] tokio::task::JoinError),

    #[error("driver stopped without an outcome")]
    NoOutcome,

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Who is behind an action provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Player,
    Ai,
    Scripted,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Player => "player",
            ProviderKind::Ai => "ai",
            ProviderKind::Scripted => "scripted",
        };
        write!(f, "{}", label)
    }
}
