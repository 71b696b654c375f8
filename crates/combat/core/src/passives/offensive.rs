//! Passives driven by the owner's own offense: crits, attacks and skills.

use super::PassiveId;
use crate::combat::DamageRequest;
use crate::config::CombatConfig;
use crate::engine::CombatSession;
use crate::state::{EffectKind, EffectSpec, PassiveState, Side, StatDelta};
use crate::stats::StatKind;

const TWINS_PERIOD: u32 = 4;
const TWINS_MULTIPLIER: f64 = 0.5;
const CUTS_PERIOD: u32 = 3;

pub(super) fn crit_landed(session: &mut CombatSession, owner: Side, passive: PassiveId) {
    match passive {
        PassiveId::StaticResonance => {
            let spec = EffectSpec::buff("Static Resonance", 3, StatKind::Spd, StatDelta::Percent(0.15));
            session.apply_effect(owner, owner, spec);
            let line = format!("Static Resonance! The critical hit speeds up {}.", session.name(owner));
            session.narrate(line);
        }
        PassiveId::SpiritOfThePack => {
            let participant = session.participant_mut(owner);
            participant.passive.pack_stacks += 1;
            let stacks = participant.passive.pack_stacks;
            let bonus = (participant.base_stats().spd * 0.05 * stacks as f64).trunc();
            let spec = EffectSpec::buff(
                "Spirit of the Pack",
                CombatConfig::PERSISTENT_DURATION,
                StatKind::Spd,
                StatDelta::Flat(bonus),
            );
            session.replace_effect(owner, owner, spec);
            let line = format!("Spirit of the Pack! {} grows permanently faster.", session.name(owner));
            session.narrate(line);
        }
        PassiveId::BloodFrenzy => {
            let bonus = (session.participant(owner).stats.atk * 0.10).trunc();
            let spec = EffectSpec::buff("Blood Frenzy", 3, StatKind::Atk, StatDelta::Flat(bonus));
            session.apply_effect(owner, owner, spec);
            let line = format!("Blood Frenzy! The critical hit empowers {}.", session.name(owner));
            session.narrate(line);
        }
        _ => {}
    }
}

/// Follow-ups after the owner's basic attack landed on `target`.
pub(super) fn attack_landed(session: &mut CombatSession, owner: Side, passive: PassiveId, target: Side) {
    match passive {
        PassiveId::TwinsHarmony => {
            let state = &mut session.participant_mut(owner).passive;
            state.twins_attacks += 1;
            if state.twins_attacks >= TWINS_PERIOD {
                state.twins_attacks = 0;
                let hit = session.apply_damage(owner, target, DamageRequest::hit(TWINS_MULTIPLIER));
                let crit = if hit.crit { "Critical! " } else { "" };
                let line = format!(
                    "Twins Harmony! {crit}{} follows up for {} damage!",
                    session.name(owner),
                    hit.amount
                );
                session.narrate(line);
            }
        }
        PassiveId::EagerHeart => {
            if session.dice().chance(0.05) {
                let spec = EffectSpec::buff("Eager Heart", 1, StatKind::Atk, StatDelta::Percent(0.10));
                session.apply_effect(owner, owner, spec);
                let line = format!("Eager Heart burns, raising {}'s attack!", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::WintersEmbrace => {
            if session.dice().chance(0.25) {
                let spec = EffectSpec::debuff("Winters Chill", 3, StatKind::Spd, StatDelta::Percent(-0.15));
                session.apply_effect(owner, target, spec);
                let line = format!("Winters Embrace slows {}!", session.name(target));
                session.narrate(line);
            }
        }
        PassiveId::DanceOfAThousandCuts => thousand_cuts(session, owner, target),
        _ => {}
    }
}

/// `caster` used a skill. The owner may be the caster or its opponent.
pub(super) fn skill_used(session: &mut CombatSession, owner: Side, passive: PassiveId, caster: Side) {
    let own_skill = caster == owner;
    match passive {
        PassiveId::ArcaneEcho if own_skill => {
            if session.dice().chance(0.05) {
                session.participant_mut(owner).tick_cooldowns(1);
                session.narrate("Arcane Echo reduces every cooldown!");
            }
        }
        PassiveId::FeatheredSonnet if own_skill => {
            let participant = session.participant_mut(owner);
            if participant.passive.sonnet_stacks >= PassiveState::MAX_SONNET_STACKS {
                return;
            }
            participant.passive.sonnet_stacks += 1;
            let stacks = participant.passive.sonnet_stacks;
            let bonus = (participant.base_stats().spd * 0.05 * stacks as f64).trunc();
            let spec = EffectSpec::buff(
                "Feathered Sonnet",
                CombatConfig::PERSISTENT_DURATION,
                StatKind::Spd,
                StatDelta::Flat(bonus),
            );
            session.replace_effect(owner, owner, spec);
            let line = format!("Feathered Sonnet rises to {stacks} stacks on {}.", session.name(owner));
            session.narrate(line);
        }
        PassiveId::DanceOfAThousandCuts if own_skill => thousand_cuts(session, owner, owner.opponent()),
        PassiveId::SpellthiefsGleam if !own_skill => spellthief(session, owner, caster),
        _ => {}
    }
}

fn thousand_cuts(session: &mut CombatSession, owner: Side, target: Side) {
    let state = &mut session.participant_mut(owner).passive;
    state.cuts_landed += 1;
    if state.cuts_landed < CUTS_PERIOD {
        return;
    }
    state.cuts_landed = 0;
    let per_turn = session.participant(target).max_hp_fraction(0.06);
    session.apply_effect(owner, target, EffectSpec::dot("Thousand Cuts Bleed", 3, per_turn));
    let line = format!("Dance of a Thousand Cuts! {} bleeds heavily.", session.name(target));
    session.narrate(line);
}

/// Copies a random lasting stat buff of `victim` onto `owner`.
fn spellthief(session: &mut CombatSession, owner: Side, victim: Side) {
    if !session.dice().chance(0.20) {
        return;
    }
    let candidates: Vec<(String, StatKind, f64)> = session
        .participant(victim)
        .effects
        .iter()
        .filter(|e| e.kind == EffectKind::Buff && e.duration > 1)
        .filter_map(|e| e.stat_delta().map(|(stat, delta)| (e.name.clone(), stat, delta)))
        .collect();
    if candidates.is_empty() {
        return;
    }
    let index = session.dice().pick(candidates.len());
    let (name, stat, delta) = candidates[index].clone();
    let spec = EffectSpec::buff(format!("Stolen: {name}"), 3, stat, StatDelta::Flat(delta));
    session.apply_effect(owner, owner, spec);
    let line = format!("Spellthiefs Gleam! {} steals {name}!", session.name(owner));
    session.narrate(line);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{HookEvent, SessionBuilder};
    use crate::env::FixedRng;
    use crate::passives::{PassiveId, trigger};
    use crate::state::{EffectSpec, Participant, Side, StatDelta};
    use crate::stats::{StatKind, Stats};

    fn fighter(name: &str) -> Participant {
        let mut stats = Stats::new(100.0, 40.0, 0.0, 20.0);
        stats.crit_rate = 0.0;
        Participant::new(name, stats)
    }

    #[test]
    fn twins_harmony_strikes_every_fourth_attack() {
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::TwinsHarmony), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        let event = HookEvent::AttackLanded { target: Side::P2 };
        for _ in 0..3 {
            trigger(&mut s, Side::P1, PassiveId::TwinsHarmony, &event);
        }
        assert_eq!(s.participant(Side::P2).hp(), 100);
        trigger(&mut s, Side::P1, PassiveId::TwinsHarmony, &event);
        assert_eq!(s.participant(Side::P2).hp(), 80);
        assert_eq!(s.participant(Side::P1).passive.twins_attacks, 0);
    }

    #[test]
    fn thousand_cuts_counts_attacks_and_skills() {
        let owner = fighter("A").with_passive(PassiveId::DanceOfAThousandCuts);
        let mut s = SessionBuilder::new(owner, fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        trigger(&mut s, Side::P1, PassiveId::DanceOfAThousandCuts, &HookEvent::AttackLanded { target: Side::P2 });
        trigger(&mut s, Side::P1, PassiveId::DanceOfAThousandCuts, &HookEvent::SkillUsed { caster: Side::P1 });
        // The opponent's skills do not count.
        trigger(&mut s, Side::P1, PassiveId::DanceOfAThousandCuts, &HookEvent::SkillUsed { caster: Side::P2 });
        assert!(!s.participant(Side::P2).effects.has_named("Thousand Cuts Bleed"));
        trigger(&mut s, Side::P1, PassiveId::DanceOfAThousandCuts, &HookEvent::AttackLanded { target: Side::P2 });
        assert!(s.participant(Side::P2).effects.has_named("Thousand Cuts Bleed"));
    }

    #[test]
    fn feathered_sonnet_caps_at_five_stacks() {
        let owner = fighter("A").with_passive(PassiveId::FeatheredSonnet);
        let mut s = SessionBuilder::new(owner, fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        for _ in 0..7 {
            trigger(&mut s, Side::P1, PassiveId::FeatheredSonnet, &HookEvent::SkillUsed { caster: Side::P1 });
        }
        // 5% of 20 per stack: trunc(20 × 0.25) = 5.
        assert_eq!(s.participant(Side::P1).stats.spd, 25.0);
        assert_eq!(s.participant(Side::P1).passive.sonnet_stacks, 5);
    }

    #[test]
    fn spellthief_copies_a_lasting_buff() {
        let owner = fighter("A").with_passive(PassiveId::SpellthiefsGleam);
        let mut s = SessionBuilder::new(owner, fighter("B"))
            .rng(Arc::new(FixedRng::ALWAYS), 0)
            .build();
        s.apply_effect(
            Side::P2,
            Side::P2,
            EffectSpec::buff("Might", 3, StatKind::Atk, StatDelta::Percent(0.25)),
        );
        trigger(&mut s, Side::P1, PassiveId::SpellthiefsGleam, &HookEvent::SkillUsed { caster: Side::P2 });
        assert!(s.participant(Side::P1).effects.has_named("Stolen: Might"));
        assert_eq!(s.participant(Side::P1).stats.atk, 50.0);
        assert_eq!(s.participant(Side::P2).stats.atk, 50.0);
    }
}
