//! Player skills built around a damaging hit.

use super::{SkillId, Volley, blind, drain_text, heal_blocked_line, strike, volley, volley_line};
use crate::combat::DamageRequest;
use crate::engine::CombatSession;
use crate::passives::PassiveId;
use crate::state::StatDelta::{Flat, Percent};
use crate::state::{EffectKind, EffectPayload, EffectSpec, Marker, Side};
use crate::stats::StatKind;

pub(super) fn duskfall_strike(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::DuskfallStrike, DamageRequest::hit(1.50));
    session.apply_effect(caster, target, blind("Duskfall Blind", 3, 0.35));
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Duskfall Slow", 3, StatKind::Spd, Percent(-0.25)),
    );
    format!("{line} The dusk clouds {}'s sight.", session.name(target))
}

pub(super) fn phantom_crescendo(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (hit, line) = strike(
        session,
        caster,
        target,
        SkillId::PhantomCrescendo,
        DamageRequest::hit(1.60).ignore_def(0.30),
    );
    let drained = drain_text(session, caster, (hit.amount as f64 * 0.25) as i64);
    format!("{line}{drained}")
}

pub(super) fn blazing_finale(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let empowered = session.participant(caster).effects.has_kind(EffectKind::Buff);
    let multiplier = if empowered { 1.40 * 1.50 } else { 1.40 };
    let (_, mut line) = strike(session, caster, target, SkillId::BlazingFinale, DamageRequest::hit(multiplier));
    if empowered {
        line.push_str("\n> Active buffs fuel a far larger blast!");
    }
    if session.participant(caster).has_passive(PassiveId::HarmoniousResonance) {
        session.participant_mut(caster).passive.enhance_support = true;
    }
    line
}

pub(super) fn inferno_brand(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::InfernoBrand, DamageRequest::hit(1.20));
    let burn = session.participant(target).max_hp_fraction(0.10);
    session.apply_effect(caster, target, EffectSpec::dot("Inferno Burn", 3, burn));
    session.apply_effect(
        caster,
        target,
        EffectSpec::new("Branded", EffectKind::Debuff, 3).payload(EffectPayload::Vulnerability(0.25)),
    );
    format!("{line} {} is branded and left vulnerable.", session.name(target))
}

pub(super) fn soul_combustion(session: &mut CombatSession, caster: Side, target: Side) -> String {
    // Missing hp scales the blast: +0% at full hp, up to +150% near death.
    let missing = 1.0 - session.participant(caster).hp_ratio();
    let multiplier = 1.0 + missing * 1.5;
    let (_, line) = strike(session, caster, target, SkillId::SoulCombustion, DamageRequest::hit(multiplier));
    line
}

pub(super) fn hundred_spirits_palm(session: &mut CombatSession, caster: Side, target: Side) -> String {
    const SPIRITS: [(&str, StatKind); 3] = [
        ("Weakened Spirit", StatKind::Atk),
        ("Broken Spirit", StatKind::Def),
        ("Slowed Spirit", StatKind::Spd),
    ];
    let mut volley = Volley::default();
    let mut inflicted = Vec::new();
    for _ in 0..2 {
        let hit = session.apply_damage(caster, target, DamageRequest::hit(1.0));
        volley.record(&hit);
        if session.dice().chance(0.50) {
            let (name, stat) = SPIRITS[session.dice().pick(SPIRITS.len())];
            session.apply_effect(caster, target, EffectSpec::debuff(name, 2, stat, Percent(-0.15)));
            inflicted.push(name);
        }
    }
    let mut line = volley_line(session, caster, SkillId::HundredSpiritsPalm, 2, volley);
    if !inflicted.is_empty() {
        line.push_str(&format!("\n> The ancestral spirits inflict: {}!", inflicted.join(", ")));
    }
    line
}

pub(super) fn absolute_zero(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::AbsoluteZero, DamageRequest::hit(1.30));
    if session.dice().chance(0.50) {
        session.apply_effect(caster, target, EffectSpec::new("Freeze", EffectKind::Freeze, 2));
        line.push_str(&format!("\n> {} freezes in place!", session.name(target)));
    }
    line
}

pub(super) fn snowflake_dance(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let slowed = session.participant(target).effects.lowers(StatKind::Spd);
    let request = DamageRequest::hit(0.70).force_crit(slowed);
    let (_, mut line) = volley(session, caster, target, SkillId::SnowflakeDance, 2, request);
    if slowed {
        line.push_str("\n> The slowed foe cannot escape the blizzard!");
    }
    line
}

pub(super) fn crystallize_mana(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::CrystallizeMana, DamageRequest::hit(1.40));
    session.participant_mut(target).delay_cooldowns(2);
    format!("{line} {}'s skills are locked in crystal.", session.name(target))
}

pub(super) fn amethyst_purge(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let purged = session.purge_buffs(target);
    let multiplier = 1.0 + 0.20 * purged as f64;
    let (_, mut line) = strike(session, caster, target, SkillId::AmethystPurge, DamageRequest::hit(multiplier));
    if purged > 0 {
        line.push_str(&format!("\n> {purged} buff(s) were burned away from {}!", session.name(target)));
    }
    line
}

pub(super) fn leviathans_mirage(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(
        session,
        caster,
        target,
        SkillId::SummonLeviathansMirage,
        DamageRequest::hit(1.60),
    );
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Mirage DEF Down", 4, StatKind::Def, Percent(-0.30)),
    );
    line
}

pub(super) fn verse_of_the_griffin(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.50).ignore_def(0.50);
    let (_, line) = strike(session, caster, target, SkillId::VerseOfTheGriffin, request);
    line
}

pub(super) fn thunderclap_sonata(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.0).force_crit(true);
    let (hit, line) = strike(session, caster, target, SkillId::ThunderclapSonata, request);
    let recoil = session.participant_mut(caster).lose_hp((hit.amount as f64 * 0.15) as i64);
    format!("{line} The thunder recoils for {recoil} damage.")
}

pub(super) fn lightning_etude(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let mut volley = Volley::default();
    let mut paralyzed = false;
    for _ in 0..3 {
        let hit = session.apply_damage(caster, target, DamageRequest::hit(0.50));
        volley.record(&hit);
        if session.dice().chance(0.20) {
            session.apply_effect(caster, target, EffectSpec::new("Etude Paralyze", EffectKind::Paralyze, 2));
            paralyzed = true;
        }
    }
    let mut line = volley_line(session, caster, SkillId::LightningEtude, 3, volley);
    if paralyzed {
        line.push_str(&format!("\n> Lightning paralyzes {}!", session.name(target)));
    }
    line
}

pub(super) fn glacial_prison(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::GlacialPrison, DamageRequest::hit(1.20));
    session.apply_effect(
        caster,
        caster,
        EffectSpec::marker("Guaranteed Stun", Marker::GuaranteedStun, 2),
    );
    format!("{line} The next attack will freeze its target.")
}

pub(super) fn system_crash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let amount = (session.participant(caster).stats.atk * 0.80) as i64;
    let (_, line) = strike(session, caster, target, SkillId::SystemCrash, DamageRequest::fixed(amount));
    session.apply_effect(
        caster,
        target,
        EffectSpec::new("System Crash Heal Block", EffectKind::HealBlock, 3),
    );
    format!("{line} {} can no longer recover.", session.name(target))
}

pub(super) fn sakura_flash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let request = DamageRequest::hit(1.50).bonus_crit_damage(0.50).bypass_evasion();
    let (_, line) = strike(session, caster, target, SkillId::SakuraFlash, request);
    line
}

pub(super) fn sundering_quake(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::SunderingQuake, DamageRequest::hit(1.30));
    if session.dice().chance(0.30) {
        session.apply_effect(
            caster,
            target,
            EffectSpec::debuff("Quake Weaken", 3, StatKind::Def, Percent(-0.20)),
        );
        line.push_str(&format!("\n> {}'s defense cracks!", session.name(target)));
    }
    line
}

pub(super) fn retribution_bash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::RetributionBash, DamageRequest::hit(0.80));
    if session.participant(caster).effects.has_shield() {
        session.apply_effect(caster, target, EffectSpec::new("Bash Stun", EffectKind::Stun, 2));
        line.push_str(&format!("\n> The shielded bash stuns {}!", session.name(target)));
    }
    line
}

pub(super) fn lancers_cometfall(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::LancersCometfall, DamageRequest::hit(1.25));
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Cometfall Focus", 2, StatKind::CritRate, Flat(0.30)),
    );
    line
}

pub(super) fn cascading_logic_bomb(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::CascadingLogicBomb, DamageRequest::hit(0.80));
    let burn = session.participant(target).max_hp_fraction(0.05);
    session.apply_effect(caster, target, EffectSpec::dot("Logic Bomb Burn", 4, burn));
    format!("{line} A virus takes root.")
}

pub(super) fn neurotoxin_bloom(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::NeurotoxinBloom, DamageRequest::hit(0.50));
    let poison = session.participant(target).max_hp_fraction(0.07);
    session.apply_effect(caster, target, EffectSpec::dot("Neurotoxin", 3, poison));
    format!("{line} {} is poisoned.", session.name(target))
}

pub(super) fn paralyzing_venom(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::ParalyzingVenom, DamageRequest::hit(0.70));
    if session.dice().chance(0.40) {
        session.apply_effect(caster, target, EffectSpec::new("Paralyzed", EffectKind::Paralyze, 2));
        line.push_str(&format!("\n> {}'s nerves seize up!", session.name(target)));
    }
    line
}

pub(super) fn caramelized_shot(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::CaramelizedShot, DamageRequest::hit(1.15));
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Caramelized", 3, StatKind::Spd, Percent(-0.15)),
    );
    line
}

pub(super) fn flourish_and_fire(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Flourish", 3, StatKind::CritRate, Flat(0.25)),
    );
    let request = DamageRequest::hit(0.75).bonus_crit_rate(0.25);
    let (_, line) = strike(session, caster, target, SkillId::FlourishAndFire, request);
    line
}

pub(super) fn blood_price_offering(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let participant = session.participant_mut(caster);
    let cost = (participant.hp() as f64 * 0.15) as i64;
    let remaining = (participant.hp() - cost).max(1);
    participant.set_hp(remaining);
    let (_, line) = strike(
        session,
        caster,
        target,
        SkillId::BloodPriceOffering,
        DamageRequest::fixed(cost * 2),
    );
    let bleed = session.participant(target).max_hp_fraction(0.04);
    session.apply_effect(caster, target, EffectSpec::dot("Blood Price Bleed", 3, bleed));
    format!("{line} {} sacrificed {cost} HP and the wound bleeds.", session.name(caster))
}

pub(super) fn chaotic_roll(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let roll = session.dice().unit();
    if roll < 0.25 {
        session.apply_effect(caster, target, EffectSpec::new("Chaotic Stun", EffectKind::Stun, 2));
        format!("Chaotic Roll! {} stuns {}!", session.name(caster), session.name(target))
    } else if roll < 0.50 {
        if session.participant(caster).effects.is_heal_blocked() {
            return heal_blocked_line(session, caster, SkillId::ChaoticRoll);
        }
        let amount = session.participant(caster).max_hp_fraction(0.20);
        let healed = session.heal(caster, amount);
        format!("Chaotic Roll! {} recovers {healed} HP!", session.name(caster))
    } else {
        let (_, line) = strike(session, caster, target, SkillId::ChaoticRoll, DamageRequest::hit(1.50));
        line
    }
}

pub(super) fn all_in(session: &mut CombatSession, caster: Side, target: Side) -> String {
    if !session.dice().chance(0.50) {
        return format!("All In! {}'s reckless gamble misses completely!", session.name(caster));
    }
    let request = DamageRequest::hit(1.0).force_crit(true).bonus_crit_damage(1.0);
    let (_, line) = strike(session, caster, target, SkillId::AllIn, request);
    line
}

pub(super) fn blade_of_ephemeral_grace(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(
        session,
        caster,
        target,
        SkillId::BladeOfEphemeralGrace,
        DamageRequest::hit(1.35),
    );
    if session.dice().chance(0.50) {
        session.apply_effect(
            caster,
            caster,
            EffectSpec::buff("Ephemeral Grace", 3, StatKind::Spd, Percent(0.20)),
        );
        line.push_str(&format!("\n> {} moves faster!", session.name(caster)));
    }
    line
}

pub(super) fn arcane_silence(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::ArcaneSilence, DamageRequest::hit(1.0));
    session.apply_effect(caster, target, EffectSpec::new("Arcane Silence", EffectKind::Silence, 2));
    format!("{line} {} is silenced.", session.name(target))
}

pub(super) fn golden_shackle(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::GoldenShackle, DamageRequest::hit(0.80));
    if session.dice().chance(0.40) {
        session.apply_effect(caster, target, EffectSpec::new("Silence", EffectKind::Silence, 2));
        line.push_str(&format!("\n> {} is silenced and cannot use skills!", session.name(target)));
    }
    line
}

pub(super) fn soul_drain(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (hit, line) = strike(session, caster, target, SkillId::SoulDrain, DamageRequest::hit(0.70));
    let drained = drain_text(session, caster, (hit.amount as f64 * 0.20) as i64);
    format!("{line}{drained}")
}

pub(super) fn crescent_weep(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::CrescentWeep, DamageRequest::hit(0.80));
    if session.dice().chance(0.40) {
        session.apply_effect(
            caster,
            target,
            EffectSpec::debuff("Weeping Wound", 3, StatKind::Atk, Percent(-0.15)),
        );
        line.push_str(&format!("\n> {}'s attacks weaken!", session.name(target)));
    }
    line
}

pub(super) fn vine_lash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, mut line) = strike(session, caster, target, SkillId::VineLash, DamageRequest::hit(0.85));
    if session.dice().chance(0.20) {
        session.apply_effect(caster, target, EffectSpec::new("Stunned by Vines", EffectKind::Stun, 2));
        line.push_str(&format!("\n> Roots bind {} in place!", session.name(target)));
    }
    line
}

pub(super) fn shadow_bolt(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::ShadowBolt, DamageRequest::hit(0.95)).1
}

pub(super) fn cross_slash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    volley(session, caster, target, SkillId::CrossSlash, 2, DamageRequest::hit(0.60)).1
}

pub(super) fn fel_flame(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::FelFlame, DamageRequest::hit(0.75));
    let burn = (session.participant(caster).stats.atk * 0.05) as i64;
    session.apply_effect(caster, target, EffectSpec::dot("Fel Flame Burn", 3, burn));
    format!("{line} Fel fire burns {}'s soul.", session.name(target))
}

pub(super) fn button_mash(session: &mut CombatSession, caster: Side, target: Side) -> String {
    volley(session, caster, target, SkillId::ButtonMash, 3, DamageRequest::hit(0.35)).1
}

pub(super) fn rage_quit(session: &mut CombatSession, caster: Side, target: Side) -> String {
    if session.participant(caster).hp_ratio() > 0.25 {
        return format!(
            "{} tries to use {}, but is still above 25% HP!",
            session.name(caster),
            SkillId::RageQuit
        );
    }
    let (_, line) = strike(session, caster, target, SkillId::RageQuit, DamageRequest::hit(1.50));
    session.apply_effect(caster, caster, EffectSpec::new("Stunned (Rage Quit)", EffectKind::Stun, 2));
    format!("{line} {} is left stunned by the outburst.", session.name(caster))
}

pub(super) fn spicy_dish(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let (_, line) = strike(session, caster, target, SkillId::SpicyDish, DamageRequest::hit(0.80));
    let burn = (session.participant(caster).stats.atk * 0.10) as i64;
    session.apply_effect(caster, target, EffectSpec::dot("Burn (Spicy)", 3, burn));
    format!("{line} {} is set ablaze.", session.name(target))
}

pub(super) fn first_cut(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::FirstCut, DamageRequest::hit(1.10)).1
}

pub(super) fn swift_strike(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::SwiftStrike, DamageRequest::hit(1.05)).1
}

pub(super) fn ember_cast(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::EmberCast, DamageRequest::hit(1.20)).1
}

pub(super) fn heavy_blow(session: &mut CombatSession, caster: Side, target: Side) -> String {
    strike(session, caster, target, SkillId::HeavyBlow, DamageRequest::hit(1.30)).1
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{CombatSession, SessionBuilder};
    use crate::env::{FixedRng, SequenceRng};
    use crate::passives::PassiveId;
    use crate::skills::{SkillId, resolve};
    use crate::state::{EffectKind, EffectSpec, Marker, Participant, Side, StatDelta};
    use crate::stats::{StatKind, Stats};

    fn fighter(name: &str, atk: f64, def: f64) -> Participant {
        let mut stats = Stats::new(1000.0, atk, def, 0.0);
        stats.crit_rate = 0.0;
        Participant::new(name, stats)
    }

    fn session(p1: Participant, p2: Participant) -> CombatSession {
        SessionBuilder::new(p1, p2)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build()
    }

    #[test]
    fn heavy_blow_scales_attack() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 20.0));
        let line = resolve(&mut s, Side::P1, Side::P2, SkillId::HeavyBlow);
        // trunc(100 × 1.3 - 20) = 110
        assert_eq!(s.participant(Side::P2).hp(), 890);
        assert!(line.contains("Heavy Blow"));
        assert!(line.contains("110"));
    }

    #[test]
    fn verse_of_the_griffin_ignores_half_defense() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 40.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::VerseOfTheGriffin);
        // 150 - 40 × 0.5 = 130
        assert_eq!(s.participant(Side::P2).hp(), 870);
    }

    #[test]
    fn inferno_brand_marks_for_extra_damage() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::InfernoBrand);
        assert!(s.participant(Side::P2).effects.has_named("Branded"));
        assert!(s.participant(Side::P2).effects.has_named("Inferno Burn"));
        let before = s.participant(Side::P2).hp();
        resolve(&mut s, Side::P1, Side::P2, SkillId::HeavyBlow);
        // 130 × 1.25 = 162
        assert_eq!(before - s.participant(Side::P2).hp(), 162);
    }

    #[test]
    fn amethyst_purge_grows_with_purged_buffs() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        for name in ["One", "Two"] {
            s.apply_effect(
                Side::P2,
                Side::P2,
                EffectSpec::buff(name, 3, StatKind::Spd, StatDelta::Flat(5.0)),
            );
        }
        resolve(&mut s, Side::P1, Side::P2, SkillId::AmethystPurge);
        assert!(!s.participant(Side::P2).effects.has_kind(EffectKind::Buff));
        assert_eq!(s.participant(Side::P2).stats.spd, 0.0);
        assert_eq!(s.participant(Side::P2).hp(), 860);
    }

    #[test]
    fn snowflake_dance_crits_slowed_targets() {
        let target = Participant::new("B", Stats::new(1000.0, 10.0, 0.0, 10.0));
        let mut s = session(fighter("A", 100.0, 0.0), target);
        s.apply_effect(
            Side::P1,
            Side::P2,
            EffectSpec::debuff("Chill", 3, StatKind::Spd, StatDelta::Flat(-1.0)),
        );
        resolve(&mut s, Side::P1, Side::P2, SkillId::SnowflakeDance);
        // Two forced crits of 70 × 1.5 = 105.
        assert_eq!(s.participant(Side::P2).hp(), 790);
    }

    #[test]
    fn glacial_prison_arms_the_next_attack() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::GlacialPrison);
        assert!(s.participant(Side::P1).effects.has_marker(Marker::GuaranteedStun));
    }

    #[test]
    fn thunderclap_recoils_on_the_caster() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::ThunderclapSonata);
        assert_eq!(s.participant(Side::P2).hp(), 850);
        assert_eq!(s.participant(Side::P1).hp(), 1000 - 22);
    }

    #[test]
    fn blood_price_offering_never_kills_the_caster() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        s.participant_mut(Side::P1).set_hp(1);
        resolve(&mut s, Side::P1, Side::P2, SkillId::BloodPriceOffering);
        assert_eq!(s.participant(Side::P1).hp(), 1);
    }

    #[test]
    fn rage_quit_requires_low_hp() {
        let mut s = session(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::RageQuit);
        assert_eq!(s.participant(Side::P2).hp(), 1000);

        s.participant_mut(Side::P1).set_hp(200);
        resolve(&mut s, Side::P1, Side::P2, SkillId::RageQuit);
        assert_eq!(s.participant(Side::P2).hp(), 850);
        assert!(s.participant(Side::P1).effects.has_kind(EffectKind::Stun));
    }

    #[test]
    fn blazing_finale_primes_harmonious_resonance() {
        let caster = fighter("A", 100.0, 0.0).with_passive(PassiveId::HarmoniousResonance);
        let mut s = session(caster, fighter("B", 10.0, 0.0));
        resolve(&mut s, Side::P1, Side::P2, SkillId::BlazingFinale);
        assert!(s.participant(Side::P1).passive.enhance_support);
    }

    #[test]
    fn all_in_gambles_on_a_coin_flip() {
        let rng = SequenceRng::from_units(&[0.9], 0.99);
        let mut s = SessionBuilder::new(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0))
            .rng(Arc::new(rng), 0)
            .build();
        resolve(&mut s, Side::P1, Side::P2, SkillId::AllIn);
        assert_eq!(s.participant(Side::P2).hp(), 1000);

        let rng = SequenceRng::from_units(&[0.1], 0.99);
        let mut s = SessionBuilder::new(fighter("A", 100.0, 0.0), fighter("B", 10.0, 0.0))
            .rng(Arc::new(rng), 0)
            .build();
        resolve(&mut s, Side::P1, Side::P2, SkillId::AllIn);
        // 100 × (1.5 + 1.0) = 250
        assert_eq!(s.participant(Side::P2).hp(), 750);
    }
}
