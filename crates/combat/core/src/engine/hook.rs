//! Lifecycle hooks that let passives react to battle events.
//!
//! Each [`PassiveId`] declares the [`HookPoints`] it listens on. When a
//! session is built, the [`HookBus`] registers every participant's passives
//! per hook point, in participant-then-declaration order. Firing a hook
//! walks the owner's registrations for that point and dispatches each one
//! to the passive library.

use std::collections::HashMap;

use bitflags::bitflags;
use tracing::debug;

use crate::passives::PassiveId;
use crate::state::{EffectKind, Participant, Side};

/// A moment in the battle lifecycle at which passives may act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "camelCase")]
pub enum HookPoint {
    BattleStart,
    TurnStart,
    DamageDealt,
    DamageTaken,
    CritLanded,
    DebuffApplied,
    Defeat,
    SkillUsed,
    TurnEnd,
    AttackLanded,
}

bitflags! {
    /// Set of hook points a passive listens on.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct HookPoints: u16 {
        const BATTLE_START = 1 << 0;
        const TURN_START = 1 << 1;
        const DAMAGE_DEALT = 1 << 2;
        const DAMAGE_TAKEN = 1 << 3;
        const CRIT_LANDED = 1 << 4;
        const DEBUFF_APPLIED = 1 << 5;
        const DEFEAT = 1 << 6;
        const SKILL_USED = 1 << 7;
        const TURN_END = 1 << 8;
        const ATTACK_LANDED = 1 << 9;
    }
}

impl HookPoint {
    pub const ALL: [HookPoint; 10] = [
        HookPoint::BattleStart,
        HookPoint::TurnStart,
        HookPoint::DamageDealt,
        HookPoint::DamageTaken,
        HookPoint::CritLanded,
        HookPoint::DebuffApplied,
        HookPoint::Defeat,
        HookPoint::SkillUsed,
        HookPoint::TurnEnd,
        HookPoint::AttackLanded,
    ];

    pub const fn flag(self) -> HookPoints {
        match self {
            Self::BattleStart => HookPoints::BATTLE_START,
            Self::TurnStart => HookPoints::TURN_START,
            Self::DamageDealt => HookPoints::DAMAGE_DEALT,
            Self::DamageTaken => HookPoints::DAMAGE_TAKEN,
            Self::CritLanded => HookPoints::CRIT_LANDED,
            Self::DebuffApplied => HookPoints::DEBUFF_APPLIED,
            Self::Defeat => HookPoints::DEFEAT,
            Self::SkillUsed => HookPoints::SKILL_USED,
            Self::TurnEnd => HookPoints::TURN_END,
            Self::AttackLanded => HookPoints::ATTACK_LANDED,
        }
    }
}

/// Battle start runs twice: before and after turn order is fixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartStage {
    Opening,
    Ordered,
}

/// Defeat runs in two stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefeatStage {
    /// The owner dropped to 0 hp. Revival passives may bring it back.
    Lethal,
    /// The owner lost the battle. Retaliation passives strike the winner.
    Finalize,
}

/// Which end of a debuff the hook owner is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebuffRole {
    Caster,
    Target,
}

/// Payload delivered to a passive. Sides are absolute.
#[derive(Clone, Debug, PartialEq)]
pub enum HookEvent {
    BattleStart(StartStage),
    TurnStart,
    /// Mitigated amount, before shields.
    DamageDealt { target: Side, amount: i64 },
    /// Hp actually lost.
    DamageTaken { attacker: Side, amount: i64 },
    CritLanded { target: Side },
    DebuffApplied { role: DebuffRole, effect: String, kind: EffectKind },
    Defeat(DefeatStage),
    /// `caster` used a skill; the owner may be the caster or its opponent.
    SkillUsed { caster: Side },
    TurnEnd,
    AttackLanded { target: Side },
}

impl HookEvent {
    pub const fn point(&self) -> HookPoint {
        match self {
            Self::BattleStart(_) => HookPoint::BattleStart,
            Self::TurnStart => HookPoint::TurnStart,
            Self::DamageDealt { .. } => HookPoint::DamageDealt,
            Self::DamageTaken { .. } => HookPoint::DamageTaken,
            Self::CritLanded { .. } => HookPoint::CritLanded,
            Self::DebuffApplied { .. } => HookPoint::DebuffApplied,
            Self::Defeat(_) => HookPoint::Defeat,
            Self::SkillUsed { .. } => HookPoint::SkillUsed,
            Self::TurnEnd => HookPoint::TurnEnd,
            Self::AttackLanded { .. } => HookPoint::AttackLanded,
        }
    }
}

/// One passive listening on one hook point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registration {
    pub owner: Side,
    pub passive: PassiveId,
}

/// Registry of passive listeners, keyed by hook point.
#[derive(Clone, Debug, Default)]
pub struct HookBus {
    registrations: HashMap<HookPoint, Vec<Registration>>,
}

impl HookBus {
    /// Registers every passive of both participants, P1 first.
    pub fn new(participants: &[Participant; 2]) -> Self {
        let mut bus = Self::default();
        for (side, participant) in Side::BOTH.into_iter().zip(participants) {
            for &passive in &participant.passives {
                bus.register(side, passive);
            }
        }
        bus
    }

    pub fn register(&mut self, owner: Side, passive: PassiveId) {
        let points = passive.hooks();
        for point in HookPoint::ALL {
            if points.contains(point.flag()) {
                self.registrations
                    .entry(point)
                    .or_default()
                    .push(Registration { owner, passive });
            }
        }
        debug!(
            target: "combat::hooks",
            side = %owner,
            passive = %passive,
            points = ?points,
            "registered passive"
        );
    }

    /// Passives of `owner` listening on `point`, in registration order.
    pub fn listeners(&self, owner: Side, point: HookPoint) -> Vec<PassiveId> {
        self.registrations
            .get(&point)
            .map(|regs| {
                regs.iter()
                    .filter(|r| r.owner == owner)
                    .map(|r| r.passive)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total registrations across all hook points.
    pub fn len(&self) -> usize {
        self.registrations.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;

    #[test]
    fn registers_in_participant_then_declaration_order() {
        let p1 = Participant::new("A", Stats::default())
            .with_passive(PassiveId::ForestsBreath)
            .with_passive(PassiveId::GravePact);
        let p2 = Participant::new("B", Stats::default()).with_passive(PassiveId::EternalPower);
        let bus = HookBus::new(&[p1, p2]);

        assert_eq!(
            bus.listeners(Side::P1, HookPoint::TurnStart),
            vec![PassiveId::ForestsBreath, PassiveId::GravePact]
        );
        assert_eq!(
            bus.listeners(Side::P2, HookPoint::TurnStart),
            vec![PassiveId::EternalPower]
        );
        assert!(bus.listeners(Side::P2, HookPoint::Defeat).is_empty());
    }

    #[test]
    fn pipeline_passives_register_nothing() {
        let p1 = Participant::new("A", Stats::default()).with_passive(PassiveId::KeenSenses);
        let p2 = Participant::new("B", Stats::default());
        assert!(HookBus::new(&[p1, p2]).is_empty());
    }
}
