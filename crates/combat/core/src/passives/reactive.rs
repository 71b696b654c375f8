//! Passives reacting to damage and debuffs.

use super::PassiveId;
use crate::config::CombatConfig;
use crate::engine::{CombatSession, DebuffRole};
use crate::state::{EffectKind, EffectSpec, Side, StatDelta};
use crate::stats::StatKind;

const ARCHIPELAGO_THRESHOLD: f64 = 0.50;
const UNYIELDING_THRESHOLD: f64 = 0.40;
const FINAL_PRAYER_THRESHOLD: f64 = 0.30;

pub(super) fn damage_dealt(session: &mut CombatSession, owner: Side, passive: PassiveId, amount: i64) {
    if passive != PassiveId::SoulSiphon || amount <= 0 {
        return;
    }
    if session.participant(owner).effects.is_heal_blocked() || !session.dice().chance(0.15) {
        return;
    }
    let healed = session.heal(owner, (amount as f64 * 0.25) as i64);
    let line = format!("Soul Siphon! {} drains {healed} HP.", session.name(owner));
    session.narrate(line);
}

/// `owner` was hit by `attacker` for `amount` after shields.
pub(super) fn damage_taken(
    session: &mut CombatSession,
    owner: Side,
    passive: PassiveId,
    attacker: Side,
    amount: i64,
) {
    if amount <= 0 {
        return;
    }
    match passive {
        PassiveId::ArchipelagosBlessing => {
            let participant = session.participant(owner);
            if participant.passive.archipelago_used
                || participant.effects.is_heal_blocked()
                || participant.hp_ratio() >= ARCHIPELAGO_THRESHOLD
            {
                return;
            }
            session.participant_mut(owner).passive.archipelago_used = true;
            let amount = session.participant(owner).max_hp_fraction(0.20);
            let healed = session.heal(owner, amount);
            session.cleanse_harmful(owner);
            let line = format!(
                "Archipelagos Blessing! {} recovers {healed} HP and is cleansed!",
                session.name(owner)
            );
            session.narrate(line);
        }
        PassiveId::StonewillResilience => {
            if session.dice().chance(0.20) {
                let amount = (session.participant(owner).stats.def * 0.10) as i64;
                session.apply_effect(owner, owner, EffectSpec::shield("Stonewill Shield", 2, amount));
                let line = format!("Stonewill Resilience shields {} for {amount}.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::UnyieldingHeart => {
            let participant = session.participant(owner);
            if participant.passive.unyielding_heart_used || participant.hp_ratio() >= UNYIELDING_THRESHOLD {
                return;
            }
            let per_turn = participant.max_hp_fraction(0.10);
            session.participant_mut(owner).passive.unyielding_heart_used = true;
            session.apply_effect(owner, owner, EffectSpec::hot("Unyielding Heart", 4, per_turn));
            let line = format!("Unyielding Heart! {} refuses to fall.", session.name(owner));
            session.narrate(line);
        }
        PassiveId::VolatileEncryption => {
            if session.dice().chance(0.15) {
                let spec = EffectSpec::debuff("Volatile Encryption", 2, StatKind::Atk, StatDelta::Percent(-0.20));
                session.apply_effect(owner, attacker, spec);
                let line = format!(
                    "Volatile Encryption corrupts {}'s attack data!",
                    session.name(attacker)
                );
                session.narrate(line);
            }
        }
        PassiveId::RimefrostAura => {
            if session.dice().chance(0.30) {
                let spec = EffectSpec::debuff("Rimefrost Slow", 3, StatKind::Spd, StatDelta::Percent(-0.10));
                session.apply_effect(owner, attacker, spec);
                let line = format!("Rimefrost Aura chills {}.", session.name(attacker));
                session.narrate(line);
            }
        }
        PassiveId::ToxicBody => {
            let per_turn = session.participant(attacker).max_hp_fraction(0.03);
            session.apply_effect(owner, attacker, EffectSpec::dot("Toxic Body", 2, per_turn));
        }
        PassiveId::ThornyGarden => {
            let thorns = (amount as f64 * 0.10) as i64;
            let lost = session.participant_mut(attacker).lose_hp(thorns);
            if lost > 0 {
                let line = format!("Thorny Garden pricks {} for {lost} damage.", session.name(attacker));
                session.narrate(line);
            }
        }
        PassiveId::RetributionAura => {
            if session.dice().chance(0.20) {
                let bonus = (session.participant(owner).stats.def * 0.15).trunc();
                let spec = EffectSpec::buff("Retribution Aura", 3, StatKind::Def, StatDelta::Flat(bonus));
                session.apply_effect(owner, owner, spec);
                let line = format!("Retribution Aura hardens {}.", session.name(owner));
                session.narrate(line);
            }
        }
        PassiveId::BodyOfFire => {
            let per_turn = (session.participant(owner).stats.atk * 0.10) as i64;
            session.apply_effect(owner, attacker, EffectSpec::dot("Body of Fire", 1, per_turn));
        }
        PassiveId::FinalPrayer => {
            let participant = session.participant(owner);
            if participant.passive.final_prayer_used
                || participant.effects.is_heal_blocked()
                || participant.hp_ratio() >= FINAL_PRAYER_THRESHOLD
            {
                return;
            }
            let amount = participant.max_hp_fraction(0.25);
            session.participant_mut(owner).passive.final_prayer_used = true;
            let healed = session.heal(owner, amount);
            let line = format!("Final Prayer restores {healed} HP to {}!", session.name(owner));
            session.narrate(line);
        }
        _ => {}
    }
}

pub(super) fn debuff_applied(
    session: &mut CombatSession,
    owner: Side,
    passive: PassiveId,
    role: DebuffRole,
    effect: &str,
    kind: EffectKind,
) {
    match (role, passive) {
        (DebuffRole::Target, PassiveId::ResoluteGuardian) => {
            let spec = EffectSpec::buff("Resolute Guardian", 3, StatKind::Def, StatDelta::Percent(0.10));
            session.apply_effect(owner, owner, spec);
            let line = format!("Resolute Guardian! {} steels itself.", session.name(owner));
            session.narrate(line);
        }
        (DebuffRole::Caster, PassiveId::WardensGrace) => {
            let spec = EffectSpec::buff("Wardens Grace", 3, StatKind::Spd, StatDelta::Percent(0.15));
            session.apply_effect(owner, owner, spec);
            let line = format!("Wardens Grace quickens {}.", session.name(owner));
            session.narrate(line);
        }
        (DebuffRole::Caster, PassiveId::BoundSoul) => {
            let bonus = (session.participant(owner).stats.def * 0.15).trunc();
            let spec = EffectSpec::buff(
                "Bound Soul",
                CombatConfig::PERSISTENT_DURATION,
                StatKind::Def,
                StatDelta::Flat(bonus),
            );
            session.apply_effect(owner, owner, spec);
        }
        (DebuffRole::Caster, PassiveId::MasterOfPuppets)
            if matches!(kind, EffectKind::Stun | EffectKind::Paralyze | EffectKind::Silence) =>
        {
            let target = owner.opponent();
            if let Some(applied) = session.participant_mut(target).effects.find_named_mut(effect) {
                applied.duration += 1;
                let line = format!(
                    "Master of Puppets extends {} on {}.",
                    effect,
                    session.name(target)
                );
                session.narrate(line);
            }
        }
        _ => {}
    }
}
