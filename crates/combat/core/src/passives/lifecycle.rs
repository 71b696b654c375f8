//! Battle-start, turn-start and turn-end passives.

use super::PassiveId;
use crate::config::CombatConfig;
use crate::engine::{CombatSession, StartStage};
use crate::state::{EffectKind, EffectSpec, Marker, Side, StatDelta};
use crate::stats::StatKind;

const CONFECTION_TURNS: u32 = 4;
const SANGUINE_THRESHOLD: f64 = 0.60;
const GRAVE_PACT_THRESHOLD: f64 = 0.30;
const DARK_HONOR_THRESHOLD: f64 = 0.40;
const IMMORTAL_BLADE_THRESHOLD: f64 = 0.30;
const WRITTEN_FATE_PERIOD: u32 = 4;

pub(super) fn battle_start(session: &mut CombatSession, owner: Side, passive: PassiveId, stage: StartStage) {
    let enemy = owner.opponent();
    match (stage, passive) {
        (StartStage::Opening, PassiveId::AncestorsSight) => {
            let stats = &mut session.participant_mut(enemy).stats;
            stats.add_clamped(StatKind::CritRate, -0.15);
            stats.add_clamped(StatKind::CritDamage, -0.15);
            let line = format!(
                "{}'s Ancestors Sight exposes the weak points of {}!",
                session.name(owner),
                session.name(enemy)
            );
            session.narrate(line);
        }
        (StartStage::Opening, PassiveId::HauntingPresence) => {
            let spec = EffectSpec::debuff("Haunting Presence", 999, StatKind::Spd, StatDelta::Percent(-0.05));
            session.apply_effect(owner, enemy, spec);
            let line = format!("{}'s Haunting Presence slows {}.", session.name(owner), session.name(enemy));
            session.narrate(line);
        }
        (StartStage::Opening, PassiveId::FirewallProtocol) => {
            session.apply_effect(owner, owner, EffectSpec::new("Immunity", EffectKind::Immunity, 3));
            let line = format!("Firewall Protocol! {} is immune to debuffs.", session.name(owner));
            session.narrate(line);
        }
        (StartStage::Ordered, PassiveId::MasterTactician) => {
            if session.participant(owner).stats.spd > session.participant(enemy).stats.spd {
                let spec = EffectSpec::debuff("Tacticians Ploy", 3, StatKind::Atk, StatDelta::Percent(-0.15));
                session.apply_effect(owner, enemy, spec);
                let line = format!(
                    "Master Tactician! {} outpaces and weakens {} from the start!",
                    session.name(owner),
                    session.name(enemy)
                );
                session.narrate(line);
            }
        }
        _ => {}
    }
}

pub(super) fn turn_start(session: &mut CombatSession, owner: Side, passive: PassiveId) {
    match passive {
        PassiveId::OceansLullaby => {
            if session.dice().chance(0.25)
                && let Some(removed) = session.remove_first_effect(owner, |e| {
                    matches!(e.kind, EffectKind::Debuff | EffectKind::Dot)
                })
            {
                let line = format!(
                    "Oceans Lullaby soothes {}, washing away {}.",
                    session.name(owner),
                    removed.name
                );
                session.narrate(line);
            }
        }
        PassiveId::PerfectConfection => {
            let state = &mut session.participant_mut(owner).passive;
            state.confection_turns += 1;
            if state.confection_turns >= CONFECTION_TURNS {
                state.confection_turns = 0;
                let spec = EffectSpec::marker("Perfect Confection Ready", Marker::EmpoweredStrike, 2);
                session.apply_effect(owner, owner, spec);
                let line = format!("Perfect Confection! {}'s next hit is empowered.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::SanguinePact => {
            let participant = session.participant(owner);
            if participant.hp_ratio() >= SANGUINE_THRESHOLD {
                session.participant_mut(owner).passive.sanguine_latched = false;
            } else if !participant.passive.sanguine_latched && !participant.effects.has_named("Sanguine Pact") {
                let spec = EffectSpec::buff("Sanguine Pact", 3, StatKind::Atk, StatDelta::Percent(0.25));
                session.apply_effect(owner, owner, spec);
                session.participant_mut(owner).passive.sanguine_latched = true;
                let line = format!("Sanguine Pact! {} draws strength from its wounds.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::WhimsOfFortune => {
            if session.dice().chance(0.33) {
                session.apply_effect(owner, owner, EffectSpec::new("Counter-Attack", EffectKind::Counter, 2));
                let line = format!("Whims of Fortune! {} readies a counter.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::GravePact => {
            let participant = session.participant(owner);
            let active = participant.effects.has_named("Grave Pact");
            if participant.hp_ratio() < GRAVE_PACT_THRESHOLD && !active {
                let spec = EffectSpec::buff(
                    "Grave Pact",
                    CombatConfig::PERSISTENT_DURATION,
                    StatKind::Def,
                    StatDelta::Percent(0.25),
                );
                session.apply_effect(owner, owner, spec);
                let line = format!("Grave Pact hardens {} at death's door.", session.name(owner));
                session.narrate(line);
            } else if participant.hp_ratio() >= GRAVE_PACT_THRESHOLD && active {
                session.remove_effects(owner, |e| e.name == "Grave Pact");
            }
        }
        PassiveId::ForestsBreath => {
            let amount = session.participant(owner).max_hp_fraction(0.05);
            let healed = session.heal(owner, amount);
            if healed > 0 {
                let line = format!("Forests Breath restores {healed} HP to {}.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::DarkHonor => {
            let participant = session.participant(owner);
            if participant.hp_ratio() < DARK_HONOR_THRESHOLD && !participant.effects.has_named("Dark Honor") {
                let bonus = (participant.stats.spd * 0.2).trunc();
                let spec = EffectSpec::buff(
                    "Dark Honor",
                    CombatConfig::PERSISTENT_DURATION,
                    StatKind::Spd,
                    StatDelta::Flat(bonus),
                );
                session.apply_effect(owner, owner, spec);
                let line = format!("Dark Honor! {} moves faster in desperation.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::ImmortalBlade => {
            let participant = session.participant(owner);
            if participant.hp_ratio() < IMMORTAL_BLADE_THRESHOLD
                && !participant.effects.has_named("Immortal Blade")
            {
                let spec = EffectSpec::buff("Immortal Blade", 3, StatKind::CritRate, StatDelta::Flat(0.2));
                session.apply_effect(owner, owner, spec);
                let line = format!("Immortal Blade! {}'s strikes grow deadly.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::EternalPower => {
            let participant = session.participant_mut(owner);
            if participant.passive.eternal_stacks < crate::state::PassiveState::MAX_ETERNAL_STACKS {
                participant.passive.eternal_stacks += 1;
                let stacks = participant.passive.eternal_stacks;
                let bonus = (participant.base_stats().atk * 0.05 * stacks as f64).trunc();
                let spec = EffectSpec::buff("Eternal Power", 2, StatKind::Atk, StatDelta::Flat(bonus));
                session.replace_effect(owner, owner, spec);
            }
        }
        PassiveId::WrittenFate => {
            let turn_count = session.turn().turn_count;
            if turn_count > 0
                && (turn_count - 1) % WRITTEN_FATE_PERIOD == 0
                && session.dice().chance(0.40)
            {
                let enemy = owner.opponent();
                session.apply_effect(owner, enemy, EffectSpec::new("Stunned by Fate", EffectKind::Stun, 2));
                let line = format!("Written Fate! {} is bound by destiny.", session.name(enemy));
                session.narrate(line);
            }
        }
        _ => {}
    }
}

pub(super) fn turn_end(session: &mut CombatSession, owner: Side, passive: PassiveId) {
    if passive != PassiveId::PerfectSymmetry {
        return;
    }
    let enemy = owner.opponent();
    if let Some(removed) =
        session.remove_first_effect(owner, |e| matches!(e.kind, EffectKind::Debuff | EffectKind::Dot))
    {
        let line = format!("Perfect Symmetry removes {} from {}.", removed.name, session.name(owner));
        session.narrate(line);
    }
    if let Some(removed) = session.remove_first_effect(enemy, |e| e.kind == EffectKind::Buff) {
        let line = format!("Perfect Symmetry removes {} from {}.", removed.name, session.name(enemy));
        session.narrate(line);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{HookEvent, SessionBuilder};
    use crate::env::FixedRng;
    use crate::passives::{PassiveId, trigger};
    use crate::state::{EffectKind, Participant, Side};
    use crate::stats::Stats;

    fn fighter(name: &str) -> Participant {
        Participant::new(name, Stats::new(100.0, 40.0, 20.0, 10.0))
    }

    #[test]
    fn ancestors_sight_clamps_at_zero() {
        let mut enemy = fighter("B");
        enemy.stats.crit_rate = 0.05;
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::AncestorsSight), enemy)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.start().unwrap();
        let stats = s.participant(Side::P2).stats;
        assert_eq!(stats.crit_rate, 0.0);
        assert!((stats.crit_damage - 1.35).abs() < 1e-9);
    }

    #[test]
    fn grave_pact_comes_and_goes_with_hp() {
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::GravePact), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.participant_mut(Side::P1).set_hp(20);
        trigger(&mut s, Side::P1, PassiveId::GravePact, &HookEvent::TurnStart);
        assert_eq!(s.participant(Side::P1).stats.def, 25.0);

        s.participant_mut(Side::P1).set_hp(80);
        trigger(&mut s, Side::P1, PassiveId::GravePact, &HookEvent::TurnStart);
        assert_eq!(s.participant(Side::P1).stats.def, 20.0);
        assert!(!s.participant(Side::P1).effects.has_named("Grave Pact"));
    }

    #[test]
    fn sanguine_pact_latches_until_recovery() {
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::SanguinePact), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.participant_mut(Side::P1).set_hp(50);
        trigger(&mut s, Side::P1, PassiveId::SanguinePact, &HookEvent::TurnStart);
        assert_eq!(s.participant(Side::P1).stats.atk, 50.0);
        assert!(s.participant(Side::P1).passive.sanguine_latched);

        s.remove_effects(Side::P1, |e| e.name == "Sanguine Pact");
        trigger(&mut s, Side::P1, PassiveId::SanguinePact, &HookEvent::TurnStart);
        assert!(!s.participant(Side::P1).effects.has_named("Sanguine Pact"));

        s.participant_mut(Side::P1).set_hp(90);
        trigger(&mut s, Side::P1, PassiveId::SanguinePact, &HookEvent::TurnStart);
        assert!(!s.participant(Side::P1).passive.sanguine_latched);
    }

    #[test]
    fn eternal_power_stacks_on_base_attack() {
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::EternalPower), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        for _ in 0..3 {
            trigger(&mut s, Side::P1, PassiveId::EternalPower, &HookEvent::TurnStart);
        }
        // 5% of 40 per stack, truncated: 2, 4, then 6.
        assert_eq!(s.participant(Side::P1).stats.atk, 46.0);
        assert_eq!(s.participant(Side::P1).passive.eternal_stacks, 3);
    }

    #[test]
    fn perfect_symmetry_cleanses_and_purges() {
        use crate::state::{EffectSpec, StatDelta};
        use crate::stats::StatKind;

        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::PerfectSymmetry), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.apply_effect(Side::P2, Side::P1, EffectSpec::dot("Poison", 3, 5));
        s.apply_effect(
            Side::P2,
            Side::P2,
            EffectSpec::buff("Might", 3, StatKind::Atk, StatDelta::Percent(0.5)),
        );
        trigger(&mut s, Side::P1, PassiveId::PerfectSymmetry, &HookEvent::TurnEnd);
        assert!(!s.participant(Side::P1).effects.has_kind(EffectKind::Dot));
        assert_eq!(s.participant(Side::P2).stats.atk, 40.0);
    }
}
