//! Error types for session operations.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::Side;

use super::Phase;

/// Rejection of an operation. A rejected operation never mutates the session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{actor} acted out of turn; {current} is acting")]
    NotYourTurn { actor: Side, current: Side },

    #[error("the session is already finished")]
    Finished,

    #[error("cannot {attempted} during the {phase} phase")]
    WrongPhase {
        phase: Phase,
        attempted: &'static str,
    },

    #[error("{actor} is silenced and cannot use skills")]
    Silenced { actor: Side },

    #[error("skill `{skill}` is on cooldown for {remaining} more turn(s)")]
    OnCooldown { skill: String, remaining: u32 },

    #[error("{actor} has no skill named `{skill}`")]
    NotLearned { actor: Side, skill: String },
}

impl CombatError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Silenced { .. } | Self::OnCooldown { .. } => ErrorSeverity::Recoverable,
            Self::NotYourTurn { .. }
            | Self::Finished
            | Self::WrongPhase { .. }
            | Self::NotLearned { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            Self::Finished => "ACTION_FINISHED",
            Self::WrongPhase { .. } => "ACTION_WRONG_PHASE",
            Self::Silenced { .. } => "ACTION_SILENCED",
            Self::OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            Self::NotLearned { .. } => "ACTION_NOT_LEARNED",
        }
    }
}

/// A declared skill with no resolver.
///
/// Not a rejection: the turn is consumed with a visible narration so the
/// encounter never stalls, and no cooldown is set.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("skill `{skill}` is not implemented")]
pub struct ConfigurationGap {
    pub skill: String,
}

impl CombatError for ConfigurationGap {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "CONFIGURATION_GAP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities() {
        let cooldown = ActionError::OnCooldown {
            skill: "Heavy Blow".into(),
            remaining: 2,
        };
        assert!(cooldown.severity().is_recoverable());
        assert_eq!(ActionError::Finished.severity(), ErrorSeverity::Validation);
        assert_eq!(
            ConfigurationGap { skill: "x".into() }.severity(),
            ErrorSeverity::Internal
        );
    }
}
