//! Battle results, reward helpers and telemetry events.

use crate::env::PlayerId;
use crate::state::Side;

/// Why a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum OutcomeReason {
    Knockout,
    Draw,
    Surrender,
    Timeout,
}

/// Final result of an encounter, delivered once to the result callback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    pub winner: Option<Side>,
    pub loser: Option<Side>,
    pub reason: OutcomeReason,
    /// A defeat retaliation took the winner down with the loser.
    pub draw_after_passive: bool,
    pub rounds: u32,
    pub rewards: Option<RewardGrant>,
}

impl CombatOutcome {
    pub fn decided(winner: Side, reason: OutcomeReason, rounds: u32) -> Self {
        Self {
            winner: Some(winner),
            loser: Some(winner.opponent()),
            reason,
            draw_after_passive: false,
            rounds,
            rewards: None,
        }
    }

    pub fn undecided(reason: OutcomeReason, rounds: u32) -> Self {
        Self {
            winner: None,
            loser: None,
            reason,
            draw_after_passive: false,
            rounds,
            rewards: None,
        }
    }
}

/// PvE rewards earned by the winning player, agency multipliers applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardGrant {
    pub player_id: PlayerId,
    pub exp: u64,
    pub prisma: u64,
}

/// Level reached with `exp` total experience.
///
/// # Formula
///
/// ```text
/// level = floor(sqrt(exp / 100)) + 1
/// ```
pub fn level_from_exp(exp: u64) -> u32 {
    ((exp as f64 / 100.0).sqrt().floor() as u32) + 1
}

/// Base stat growth for a number of gained levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelGrowth {
    pub levels: u32,
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
}

impl LevelGrowth {
    pub const HP_PER_LEVEL: u32 = 15;
    pub const ATK_PER_LEVEL: u32 = 3;
    pub const DEF_PER_LEVEL: u32 = 2;
    pub const SPD_PER_LEVEL: u32 = 1;

    /// Growth between two experience totals. Zero when no level is gained.
    pub fn between(old_exp: u64, new_exp: u64) -> Self {
        let levels = level_from_exp(new_exp).saturating_sub(level_from_exp(old_exp));
        Self {
            levels,
            hp: Self::HP_PER_LEVEL * levels,
            atk: Self::ATK_PER_LEVEL * levels,
            def: Self::DEF_PER_LEVEL * levels,
            spd: Self::SPD_PER_LEVEL * levels,
        }
    }
}

/// Fire-and-forget events for quest and statistics collaborators.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TelemetryEvent {
    SkillUsed { player: PlayerId, skill: String },
    CritLanded { player: PlayerId },
    PveWin { player: PlayerId },
    PvpWin { player: PlayerId },
    PvpParticipate { player: PlayerId },
    ExpEarned { player: PlayerId, amount: u64 },
    PrismaEarned { player: PlayerId, amount: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_curve() {
        assert_eq!(level_from_exp(0), 1);
        assert_eq!(level_from_exp(99), 1);
        assert_eq!(level_from_exp(100), 2);
        assert_eq!(level_from_exp(400), 3);
        assert_eq!(level_from_exp(899), 3);
    }

    #[test]
    fn growth_scales_with_levels_gained() {
        let growth = LevelGrowth::between(50, 400);
        assert_eq!(growth.levels, 2);
        assert_eq!((growth.hp, growth.atk, growth.def, growth.spd), (30, 6, 4, 2));
        assert_eq!(LevelGrowth::between(10, 20), LevelGrowth::default());
    }
}
