//! Monster skills.
//!
//! Most are a single scaled hit with a rider effect; a few spend hp or
//! borrow the opponent's own skills.

use tracing::debug;

use super::{SkillId, blind, drain_text, heal_blocked_line, strike, volley};
use crate::combat::DamageRequest;
use crate::engine::CombatSession;
use crate::state::StatDelta::{Flat, Percent};
use crate::state::{EffectKind, EffectSpec, Side, SkillRef};
use crate::stats::StatKind;

/// Self-inflicted cost that never drops the caster below 1 hp.
fn pay_hp(session: &mut CombatSession, side: Side, amount: i64) -> i64 {
    let owner = session.participant_mut(side);
    let affordable = amount.min(owner.hp() - 1).max(0);
    owner.lose_hp(affordable)
}

/// Hit plus damage scaled off the caster's defense that skips mitigation.
fn bulwark_hit(
    session: &mut CombatSession,
    caster: Side,
    target: Side,
    skill: SkillId,
    multiplier: f64,
    def_fraction: f64,
) -> String {
    let (_, line) = strike(session, caster, target, skill, DamageRequest::hit(multiplier));
    let bonus = (session.participant(caster).stats.def * def_fraction) as i64;
    let dealt = session.participant_mut(target).lose_hp(bonus);
    format!("{line} Its guard adds {dealt} crushing damage.")
}

fn fraction_of_atk(session: &CombatSession, side: Side, fraction: f64) -> i64 {
    (session.participant(side).stats.atk * fraction) as i64
}

pub(super) fn silent_strike(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.50).bonus_crit_rate(0.20);
    strike(session, caster, target, SkillId::SilentStrike, request).1
}

pub(super) fn flowing_blade(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::FlowingBlade, DamageRequest::hit(1.20));
    let slow = -(session.participant(target).stats.spd * 0.15).trunc();
    session.apply_effect(caster, target, EffectSpec::debuff("Slowed", 2, StatKind::Spd, Flat(slow)));
    format!("{line} {} is slowed.", session.name(target))
}

pub(super) fn mechanical_slash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::MechanicalSlash, DamageRequest::hit(1.60)).1
}

pub(super) fn core_overload(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let cost = session.participant(caster).max_hp_fraction(0.15);
    let paid = pay_hp(session, caster, cost);
    let (_, line) = strike(session, caster, target, SkillId::CoreOverload, DamageRequest::hit(1.80));
    format!("{line} The overload burns {paid} of its own HP.")
}

pub(super) fn vengeful_fist(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.70).ignore_def(0.15);
    strike(session, caster, target, SkillId::VengefulFist, request).1
}

pub(super) fn savage_rampage(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let cost = session.participant(caster).max_hp_fraction(0.10);
    let paid = pay_hp(session, caster, cost);
    let (_, line) = strike(session, caster, target, SkillId::SavageRampage, DamageRequest::hit(2.0));
    format!("{line} The frenzy costs {paid} HP.")
}

fn rooting_hit(session: &mut CombatSession, caster: Side, target: Side, skill: SkillId, multiplier: f64) -> String {
    let (_, line) = strike(session, caster, target, skill, DamageRequest::hit(multiplier));
    session.apply_effect(caster, target, EffectSpec::new("Rooted", EffectKind::Stun, 2));
    format!("{line} {} is rooted in place!", session.name(target))
}

pub(super) fn root_bind(session: &mut CombatSession, caster: Side, target: Side) -> String {
    rooting_hit(session, caster, target, SkillId::RootBind, 1.20)
}

pub(super) fn binding_thorns(session: &mut CombatSession, caster: Side, target: Side) -> String {
    rooting_hit(session, caster, target, SkillId::BindingThorns, 1.0)
}

/// Hit plus a dot worth a fraction of the target's max hp.
fn festering_hit(
    session: &mut CombatSession,
    caster: Side,
    target: Side,
    skill: SkillId,
    multiplier: f64,
    effect: &str,
    fraction: f64,
) -> String {
    let (_, line) = strike(session, caster, target, skill, DamageRequest::hit(multiplier));
    let tick = session.participant(target).max_hp_fraction(fraction);
    session.apply_effect(caster, target, EffectSpec::dot(effect, 3, tick));
    format!("{line} {} suffers {effect} ({tick} per turn).", session.name(target))
}

pub(super) fn concentrated_venom(session: &mut CombatSession, caster: Side, target: Side) -> String {
    festering_hit(session, caster, target, SkillId::ConcentratedVenom, 0.90, "Poisoned", 0.05)
}

pub(super) fn crimson_edge(session: &mut CombatSession, caster: Side, target: Side) -> String {
    festering_hit(session, caster, target, SkillId::CrimsonEdge, 1.10, "Bleeding", 0.04)
}

pub(super) fn poison_vial(session: &mut CombatSession, caster: Side, target: Side) -> String {
    festering_hit(session, caster, target, SkillId::PoisonVial, 0.90, "Strong Poison", 0.10)
}

pub(super) fn wilted_rose(session: &mut CombatSession, caster: Side, target: Side) -> String {
    festering_hit(session, caster, target, SkillId::WiltedRose, 0.80, "Wilted Rose Curse", 0.10)
}

pub(super) fn burning_light(session: &mut CombatSession, caster: Side, target: Side) -> String {
    festering_hit(session, caster, target, SkillId::BurningLight, 1.60, "Burned", 0.05)
}

pub(super) fn arenas_cleave(session: &mut CombatSession, caster: Side, target: Side) -> String {
    bulwark_hit(session, caster, target, SkillId::ArenasCleave, 1.70, 0.10)
}

pub(super) fn finishing_blow(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.50).bonus_crit_rate(0.25);
    strike(session, caster, target, SkillId::FinishingBlow, request).1
}

pub(super) fn shadow_slash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (hit, line) = strike(session, caster, target, SkillId::ShadowSlash, DamageRequest::hit(1.50));
    let drained = drain_text(session, caster, (hit.amount as f64 * 0.20) as i64);
    format!("{line}{drained}")
}

pub(super) fn splitting_shadow(session: &mut CombatSession, caster: Side, target: Side) -> String {
    volley(session, caster, target, SkillId::SplittingShadow, 2, DamageRequest::hit(0.80)).1
}

pub(super) fn blade_fury(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(0.60).bonus_crit_rate(0.10);
    volley(session, caster, target, SkillId::BladeFury, 3, request).1
}

pub(super) fn acid_splash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::AcidSplash, DamageRequest::hit(1.20));
    let corrosion = -(session.participant(target).stats.def * 0.15).trunc();
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Defense Down", 3, StatKind::Def, Flat(corrosion)),
    );
    format!("{line} Acid eats through {}'s armor.", session.name(target))
}

pub(super) fn prison_chain(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let line = bulwark_hit(session, caster, target, SkillId::PrisonChain, 1.0, 0.20);
    let slow = -(session.participant(target).stats.spd * 0.25).trunc();
    session.apply_effect(caster, target, EffectSpec::debuff("Chained", 3, StatKind::Spd, Flat(slow)));
    format!("{line} {} is chained and slowed.", session.name(target))
}

pub(super) fn drag_to_the_abyss(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::DragToTheAbyss, DamageRequest::hit(1.80));
    if session.dice().chance(0.25) {
        session.apply_effect(caster, target, EffectSpec::new("Stunned", EffectKind::Stun, 2));
        line.push_str(&format!("\n> {} is dragged under and stunned!", session.name(target)));
    }
    line
}

pub(super) fn solar_spear(session: &mut CombatSession, caster: Side, target: Side) -> String {
    bulwark_hit(session, caster, target, SkillId::SolarSpear, 1.80, 0.10)
}

pub(super) fn cursed_cannonball(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.70).ignore_def(0.15);
    strike(session, caster, target, SkillId::CursedCannonball, request).1
}

pub(super) fn deep_sea_curse(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::DeepSeaCurse, DamageRequest::hit(1.30));
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Deep Sea Curse", 2, StatKind::Atk, Percent(-0.20)),
    );
    format!("{line} The depths sap {}'s strength.", session.name(target))
}

/// Casts one of the opponent's own skills at half attack.
pub(super) fn lifes_mirror(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let candidates: Vec<(String, SkillRef)> = session
        .participant(target)
        .skills
        .iter()
        .filter(|slot| slot.skill != SkillRef::Active(SkillId::LifesMirror))
        .map(|slot| (slot.name.clone(), slot.skill))
        .collect();
    if candidates.is_empty() {
        return format!(
            "{} raises {}, but there is nothing to reflect.",
            session.name(caster),
            SkillId::LifesMirror
        );
    }

    let (name, skill) = candidates[session.dice().pick(candidates.len())].clone();
    let SkillRef::Active(copied) = skill else {
        return format!(
            "{} raises {}, but {name} cannot be mirrored.",
            session.name(caster),
            SkillId::LifesMirror
        );
    };

    let atk = session.participant(caster).stats.atk;
    let penalty = atk - (atk * 0.5).trunc();
    session.participant_mut(caster).stats.add_raw(StatKind::Atk, -penalty);
    debug!(target: "combat::skills", side = %caster, copied = %copied, "mirroring opponent skill");
    let copied_line = super::resolve(session, caster, target, copied);
    session.participant_mut(caster).stats.add_raw(StatKind::Atk, penalty);

    format!(
        "{} raises {} and mirrors {copied} at half power!\n> {copied_line}",
        session.name(caster),
        SkillId::LifesMirror
    )
}

pub(super) fn dual_face(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::DualFace, DamageRequest::hit(1.30)).1
}

/// Hit plus a burn scaled off the caster's attack.
fn searing_hit(
    session: &mut CombatSession,
    caster: Side,
    target: Side,
    skill: SkillId,
    multiplier: f64,
    effect: &str,
    (fraction, duration): (f64, u32),
) -> String {
    let (_, line) = strike(session, caster, target, skill, DamageRequest::hit(multiplier));
    let tick = fraction_of_atk(session, caster, fraction);
    session.apply_effect(caster, target, EffectSpec::dot(effect, duration, tick));
    format!("{line} {} catches fire ({tick} per turn).", session.name(target))
}

pub(super) fn lava_burst(session: &mut CombatSession, caster: Side, target: Side) -> String {
    searing_hit(session, caster, target, SkillId::LavaBurst, 2.0, "Burn (Lava)", (0.20, 2))
}

pub(super) fn incinerate(session: &mut CombatSession, caster: Side, target: Side) -> String {
    searing_hit(session, caster, target, SkillId::Incinerate, 1.40, "Burn", (0.15, 1))
}

pub(super) fn spirit_fireball(session: &mut CombatSession, caster: Side, target: Side) -> String {
    searing_hit(session, caster, target, SkillId::SpiritFireball, 1.90, "Spirit Burn", (0.25, 2))
}

pub(super) fn draining_note(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::DrainingNote, DamageRequest::hit(1.0));
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Draining Note", 2, StatKind::Atk, Percent(-0.20)),
    );
    format!("{line} {}'s attack falters.", session.name(target))
}

pub(super) fn lullaby_of_nightmares(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) =
        strike(session, caster, target, SkillId::LullabyOfNightmares, DamageRequest::hit(1.20));
    if session.dice().chance(0.30) {
        session.apply_effect(caster, target, EffectSpec::new("Sleep", EffectKind::Stun, 2));
        line.push_str(&format!("\n> {} falls into a nightmare!", session.name(target)));
    }
    line
}

pub(super) fn blinding_mist(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::BlindingMist, DamageRequest::hit(0.90));
    session.apply_effect(caster, target, blind("Blinded", 2, 0.20));
    format!("{line} {} is blinded.", session.name(target))
}

pub(super) fn hand_of_fog(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::HandOfFog, DamageRequest::hit(1.50));
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Slowed by Fog", 2, StatKind::Spd, Percent(-0.15)),
    );
    format!("{line} The fog slows {}.", session.name(target))
}

pub(super) fn dark_claw(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.80).bonus_crit_damage(0.15);
    strike(session, caster, target, SkillId::DarkClaw, request).1
}

pub(super) fn shadow_breath(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::ShadowBreath, DamageRequest::hit(1.10));
    session.apply_effect(caster, target, blind("Blinded", 2, 0.20));
    format!("{line} Shadows cloud {}'s eyes.", session.name(target))
}

pub(super) fn imperial_sword(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::ImperialSword, DamageRequest::hit(1.90)).1
}

fn sundering_hit(
    session: &mut CombatSession,
    caster: Side,
    target: Side,
    skill: SkillId,
    multiplier: f64,
    effect: &str,
    pct: f64,
) -> String {
    let (_, line) = strike(session, caster, target, skill, DamageRequest::hit(multiplier));
    session.apply_effect(caster, target, EffectSpec::debuff(effect, 2, StatKind::Def, Percent(-pct)));
    format!("{line} {}'s defense weakens.", session.name(target))
}

pub(super) fn decree_of_ruin(session: &mut CombatSession, caster: Side, target: Side) -> String {
    sundering_hit(session, caster, target, SkillId::DecreeOfRuin, 1.40, "Defense Broken", 0.15)
}

pub(super) fn ivory_curse(session: &mut CombatSession, caster: Side, target: Side) -> String {
    sundering_hit(session, caster, target, SkillId::IvoryCurse, 1.30, "Defense Cursed", 0.10)
}

pub(super) fn blood_offering(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let cost = session.participant(caster).max_hp_fraction(0.15);
    let paid = pay_hp(session, caster, cost);
    let mut line = format!(
        "{} makes a {}, spilling {paid} HP.",
        session.name(caster),
        SkillId::BloodOffering
    );
    let amount = session.participant(caster).max_hp_fraction(0.30);
    line.push_str(&drain_text(session, caster, amount));
    line
}

/// Steals a slice of the target's current hp.
pub(super) fn thread_of_life(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let amount = (session.participant(target).hp() as f64 * 0.15) as i64;
    let stolen = session.participant_mut(target).lose_hp(amount);
    let line = format!(
        "{} pulls the {}, draining {stolen} HP from {}.",
        session.name(caster),
        SkillId::ThreadOfLife,
        session.name(target)
    );
    format!("{line}{}", drain_text(session, caster, stolen))
}

pub(super) fn self_mending(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    if session.participant(caster).effects.is_heal_blocked() {
        return heal_blocked_line(session, caster, SkillId::SelfMending);
    }
    let amount = session.participant(caster).max_hp_fraction(0.25);
    let healed = session.heal(caster, amount);
    format!("{} uses {}, recovering {healed} HP!", session.name(caster), SkillId::SelfMending)
}

pub(super) fn abyss_strike(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(2.0).ignore_def(0.15);
    strike(session, caster, target, SkillId::AbyssStrike, request).1
}

pub(super) fn hellfire_chains(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::HellfireChains, DamageRequest::hit(1.20));
    let tick = fraction_of_atk(session, caster, 0.10);
    session.apply_effect(caster, target, EffectSpec::dot("Burn (Hellfire)", 2, tick));
    session.apply_effect(caster, target, EffectSpec::dot("Poison (Hellfire)", 2, tick));
    format!("{line} Hellfire burns and poisons {}.", session.name(target))
}

pub(super) fn red_moon_charm(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(caster, target, EffectSpec::new("Charmed", EffectKind::Stun, 2));
    let line = format!(
        "{} casts {}, charming {}!",
        session.name(caster),
        SkillId::RedMoonCharm,
        session.name(target)
    );
    let amount = session.participant(caster).max_hp_fraction(0.10);
    format!("{line}{}", drain_text(session, caster, amount))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{CombatSession, SessionBuilder};
    use crate::env::FixedRng;
    use crate::skills::{SkillId, resolve};
    use crate::state::{EffectKind, EffectSpec, Participant, Side};
    use crate::stats::Stats;

    fn fighter(name: &str, atk: f64, def: f64) -> Participant {
        let mut stats = Stats::new(1000.0, atk, def, 20.0);
        stats.crit_rate = 0.0;
        Participant::new(name, stats)
    }

    fn session(p1: Participant, p2: Participant) -> CombatSession {
        SessionBuilder::new(p1, p2)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build()
    }

    #[test]
    fn lifes_mirror_copies_at_half_attack() {
        let monster = fighter("Mirror", 100.0, 0.0).with_skill("Lifes Mirror", 3);
        let player = fighter("Hero", 80.0, 0.0).with_skill("Heavy Blow", 3);
        let mut s = session(monster, player);
        let line = resolve(&mut s, Side::P1, Side::P2, SkillId::LifesMirror);
        // trunc(50 × 1.3) = 65
        assert_eq!(s.participant(Side::P2).hp(), 935);
        assert_eq!(s.participant(Side::P1).stats.atk, 100.0);
        assert!(line.contains("Heavy Blow"));
    }

    #[test]
    fn lifes_mirror_fails_on_unknown_skills() {
        let monster = fighter("Mirror", 100.0, 0.0);
        let player = fighter("Hero", 80.0, 0.0).with_skill("Forgotten Art", 3);
        let mut s = session(monster, player);
        let line = resolve(&mut s, Side::P1, Side::P2, SkillId::LifesMirror);
        assert!(line.contains("cannot be mirrored"));
        assert_eq!(s.participant(Side::P2).hp(), 1000);
    }

    #[test]
    fn thread_of_life_steals_current_hp() {
        let mut s = session(fighter("A", 10.0, 0.0), fighter("B", 10.0, 0.0));
        s.participant_mut(Side::P1).set_hp(500);
        s.participant_mut(Side::P2).set_hp(800);
        resolve(&mut s, Side::P1, Side::P2, SkillId::ThreadOfLife);
        assert_eq!(s.participant(Side::P2).hp(), 680);
        assert_eq!(s.participant(Side::P1).hp(), 620);
    }

    #[test]
    fn thread_of_life_respects_heal_block() {
        let mut s = session(fighter("A", 10.0, 0.0), fighter("B", 10.0, 0.0));
        s.participant_mut(Side::P1).set_hp(500);
        s.apply_effect(Side::P2, Side::P1, EffectSpec::new("Heal Block", EffectKind::HealBlock, 2));
        let line = resolve(&mut s, Side::P1, Side::P2, SkillId::ThreadOfLife);
        assert_eq!(s.participant(Side::P1).hp(), 500);
        assert!(line.contains("Heal block"));
    }

    #[test]
    fn arenas_cleave_adds_unmitigated_bonus() {
        let mut s = session(fighter("A", 100.0, 50.0), fighter("B", 10.0, 20.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::ArenasCleave);
        // (170 - 20) + trunc(50 × 0.1)
        assert_eq!(s.participant(Side::P2).hp(), 845);
    }

    #[test]
    fn core_overload_cannot_kill_its_caster() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        s.participant_mut(Side::P1).set_hp(50);
        resolve(&mut s, Side::P1, Side::P2, SkillId::CoreOverload);
        assert_eq!(s.participant(Side::P1).hp(), 1);
        assert_eq!(s.participant(Side::P2).hp(), 820);
    }

    #[test]
    fn poison_vial_scales_with_target_max_hp() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::PoisonVial);
        assert!(s.participant(Side::P2).effects.has_named("Strong Poison"));
        assert!(s.participant(Side::P2).effects.has_kind(EffectKind::Dot));
    }
}
