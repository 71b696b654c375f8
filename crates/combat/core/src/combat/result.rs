//! Outcome of a single hit.

/// How a hit resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitKind {
    /// Damage reached the defender (possibly fully absorbed by shields).
    Landed,
    /// The attacker's blindness made it miss.
    Missed,
    /// The defender dodged.
    Evaded,
    /// Invincibility negated the hit.
    Negated,
}

/// Result of [`apply_damage`](crate::engine::CombatSession::apply_damage).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageOutcome {
    /// Damage after shields, before hp clamping.
    pub amount: i64,
    pub crit: bool,
    pub kind: HitKind,
}

impl DamageOutcome {
    pub const fn avoided(kind: HitKind) -> Self {
        Self {
            amount: 0,
            crit: false,
            kind,
        }
    }

    pub const fn landed(&self) -> bool {
        matches!(self.kind, HitKind::Landed)
    }
}
