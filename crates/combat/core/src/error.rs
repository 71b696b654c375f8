//! Shared error classification.
//!
//! Domain errors live next to the operations that raise them (see
//! [`ActionError`](crate::engine::ActionError)); this module only provides
//! the severity model every one of them reports. Missing catalog entries are
//! data gaps resolved to neutral values and never surface here.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same actor may retry with another action (cooldown, silence).
    Recoverable,
    /// The request is invalid as issued (wrong turn, finished session).
    Validation,
    /// Declared content the engine cannot resolve.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and front ends.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
