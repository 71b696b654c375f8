//! Player skills that protect, heal or empower the caster.

use super::{SkillId, heal_blocked_line};
use crate::config::CombatConfig;
use crate::engine::CombatSession;
use crate::passives::PassiveId;
use crate::state::StatDelta::{Flat, Percent};
use crate::state::{EffectKind, EffectPayload, EffectSpec, Marker, Side, SkillRef};
use crate::stats::StatKind;

pub(super) fn tidal_bulwark(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let shield = session.participant(caster).max_hp_fraction(0.50);
    session.apply_effect(caster, caster, EffectSpec::shield("Tidal Shield", 3, shield));
    session.apply_effect(caster, caster, EffectSpec::new("Tidal Counter", EffectKind::Counter, 3));
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Tidal Defense", 3, StatKind::Def, Percent(0.30)),
    );
    format!(
        "{} raises a {} worth {shield} HP and readies a counter!",
        session.name(caster),
        SkillId::TidalBulwark
    )
}

/// Regeneration plus an attack buff; enhanced after Blazing Finale.
pub(super) fn solar_overture(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let regen = session.participant(caster).max_hp_fraction(0.15);
    session.apply_effect(caster, caster, EffectSpec::hot("Solar Regeneration", 4, regen));

    let enhanced = std::mem::take(&mut session.participant_mut(caster).passive.enhance_support);
    let (name, pct) = if enhanced {
        ("Solar ATK Up (Enhanced)", 0.45)
    } else {
        ("Solar ATK Up", 0.30)
    };
    session.apply_effect(caster, caster, EffectSpec::buff(name, 4, StatKind::Atk, Percent(pct)));

    let mut line = format!(
        "{} performs {}, bathing in restorative light!",
        session.name(caster),
        SkillId::SolarOverture
    );
    if enhanced {
        line.push_str("\n> The lingering finale amplifies the overture!");
    }

    let owner = session.participant_mut(caster);
    if owner.has_passive(PassiveId::HarmoniousResonance)
        && let Some(slot) = owner
            .skills
            .iter_mut()
            .find(|s| s.skill == SkillRef::Active(SkillId::BlazingFinale))
        && slot.remaining > 0
    {
        slot.remaining -= 1;
        line.push_str(&format!("\n> {} cooldown reduced by 1.", SkillId::BlazingFinale));
    }
    line
}

pub(super) fn flowing_mantra(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let cleansed = session.cleanse_harmful(caster);
    session.apply_effect(
        caster,
        caster,
        EffectSpec::new("Flowing Evasion", EffectKind::Buff, 3).payload(EffectPayload::Evasion(0.35)),
    );
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Flowing Attack", 3, StatKind::Atk, Percent(0.15)),
    );
    let mut line = format!(
        "{} chants {}, flowing like water!",
        session.name(caster),
        SkillId::FlowingMantra
    );
    if cleansed > 0 {
        line.push_str(&format!("\n> {cleansed} harmful effect(s) wash away."));
    }
    line
}

/// Averages both sides' hp ratios, then heals the caster.
pub(super) fn harmonic_convergence(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let average = (session.participant(caster).hp_ratio() + session.participant(target).hp_ratio()) / 2.0;
    for side in [caster, target] {
        let owner = session.participant_mut(side);
        let hp = owner.max_hp_fraction(average);
        owner.set_hp(hp);
    }
    let mut line = format!(
        "{} invokes {}, balancing both fighters at {:.0}% HP!",
        session.name(caster),
        SkillId::HarmonicConvergence,
        average * 100.0
    );
    if session.participant(caster).effects.is_heal_blocked() {
        line.push_str("\n> Heal block prevents the follow-up recovery!");
    } else {
        let amount = session.participant(caster).max_hp_fraction(0.10);
        let healed = session.heal(caster, amount);
        line.push_str(&format!("\n> {} recovers {healed} HP.", session.name(caster)));
    }
    line
}

pub(super) fn rhyme_of_the_roc(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(caster, caster, EffectSpec::buff("Rocs ATK Up", 3, StatKind::Atk, Percent(0.30)));
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Rocs Crit Up", 3, StatKind::CritRate, Flat(0.50)),
    );
    format!(
        "{} recites {}, soaring in power and precision!",
        session.name(caster),
        SkillId::RhymeOfTheRoc
    )
}

pub(super) fn strings_of_fate(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::new("Strings of Fate Link", EffectKind::Reflect, 4).payload(EffectPayload::Reflect(0.20)),
    );
    format!(
        "{} weaves {}, binding its fate to {}!",
        session.name(caster),
        SkillId::StringsOfFate,
        session.name(target)
    )
}

/// Heal and shield that grow with the round number.
pub(super) fn winters_heart(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let round = f64::from(session.round());
    let owner = session.participant(caster);
    let heal = owner.max_hp_fraction(0.20) + owner.max_hp_fraction(0.02 * round);
    let shield = owner.max_hp_fraction(0.15) + owner.max_hp_fraction(0.01 * round);

    let healed = session.heal(caster, heal);
    session.apply_effect(caster, caster, EffectSpec::shield("Winter Shield", 3, shield));
    format!(
        "{} channels {}, recovering {healed} HP behind a {shield} HP shield!",
        session.name(caster),
        SkillId::WintersHeart
    )
}

pub(super) fn falling_blossom(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::marker("Untargetable", Marker::Untargetable, 2),
    );
    session.apply_effect(
        caster,
        caster,
        EffectSpec::marker("Blossom Strike", Marker::BlossomStrike, 2),
    );
    format!(
        "{} vanishes in a {}, petals poised to strike!",
        session.name(caster),
        SkillId::FallingBlossom
    )
}

pub(super) fn ironclad_resolve(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(caster, caster, EffectSpec::new("Taunt", EffectKind::Taunt, 2));
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Ironclad Defense", 2, StatKind::Def, Percent(0.60)),
    );
    session.apply_effect(caster, caster, EffectSpec::new("Disarmed", EffectKind::Disarm, 2));
    format!(
        "{} assumes {}, drawing every blow but lowering its weapon!",
        session.name(caster),
        SkillId::IroncladResolve
    )
}

pub(super) fn barricade_of_thorns(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let shield = session.participant(caster).max_hp_fraction(0.35);
    session.apply_effect(caster, caster, EffectSpec::shield("Thorns Shield", 3, shield));
    session.apply_effect(
        caster,
        caster,
        EffectSpec::new("Thorns Reflect", EffectKind::Reflect, 3).payload(EffectPayload::Reflect(0.20)),
    );
    format!(
        "{} grows a {} absorbing {shield} damage!",
        session.name(caster),
        SkillId::BarricadeOfThorns
    )
}

pub(super) fn ride_the_wind(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Wind Rider (SPD)", 3, StatKind::Spd, Percent(0.25)),
    );
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Wind Rider (ATK)", 3, StatKind::Atk, Percent(0.15)),
    );
    format!("{} uses {}, gaining speed and attack!", session.name(caster), SkillId::RideTheWind)
}

pub(super) fn orchestrated_assault(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Orchestrated Crit Rate", 4, StatKind::CritRate, Flat(0.20)),
    );
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Orchestrated Crit Dmg", 4, StatKind::CritDamage, Flat(0.20)),
    );
    format!(
        "{} conducts an {}, sharpening every strike!",
        session.name(caster),
        SkillId::OrchestratedAssault
    )
}

pub(super) fn hallowed_ground(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    if session.participant(caster).effects.is_heal_blocked() {
        return heal_blocked_line(session, caster, SkillId::HallowedGround);
    }
    let regen = session.participant(caster).max_hp_fraction(0.15);
    session.apply_effect(caster, caster, EffectSpec::hot("Hallowed Ground", 3, regen));
    format!(
        "{} consecrates {}, regenerating {regen} HP per turn!",
        session.name(caster),
        SkillId::HallowedGround
    )
}

pub(super) fn sacred_intervention(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::new("Invincibility", EffectKind::Invincibility, 2),
    );
    format!(
        "{} calls a {} and becomes invincible!",
        session.name(caster),
        SkillId::SacredIntervention
    )
}

pub(super) fn raise_dead(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::new("Summoned Skeleton", EffectKind::Summon, 3).payload(EffectPayload::Strike(0.40)),
    );
    format!("{} uses {}, summoning a skeleton ally!", session.name(caster), SkillId::RaiseDead)
}

pub(super) fn natures_blessing(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    if session.participant(caster).effects.is_heal_blocked() {
        return heal_blocked_line(session, caster, SkillId::NaturesBlessing);
    }
    let regen = session.participant(caster).max_hp_fraction(0.07);
    session.apply_effect(caster, caster, EffectSpec::hot("Natures Blessing", 4, regen));
    format!(
        "{} receives {}, regenerating {regen} HP per turn!",
        session.name(caster),
        SkillId::NaturesBlessing
    )
}

pub(super) fn blade_dance(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(caster, caster, EffectSpec::buff("Blade Dance", 3, StatKind::Spd, Percent(0.20)));
    format!("{} begins a {}, moving faster!", session.name(caster), SkillId::BladeDance)
}

pub(super) fn demonic_pact(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let owner = session.participant_mut(caster);
    let cost = ((owner.hp() as f64 * 0.10) as i64).min(owner.hp() - 1).max(0);
    owner.lose_hp(cost);
    session.apply_effect(caster, caster, EffectSpec::buff("Demonic Pact", 2, StatKind::Atk, Percent(0.30)));
    format!(
        "{} seals a {}, sacrificing {cost} HP for power!",
        session.name(caster),
        SkillId::DemonicPact
    )
}

/// Instant self-heal; debuff specialists heal 10% less.
fn restore(session: &mut CombatSession, caster: Side, skill: SkillId, fraction: f64) -> String {
    if session.participant(caster).effects.is_heal_blocked() {
        return heal_blocked_line(session, caster, skill);
    }
    let owner = session.participant(caster);
    let mut amount = owner.max_hp_fraction(fraction);
    if owner.is_debuff_specialist() {
        amount = (amount as f64 * 0.9) as i64;
    }
    let healed = session.heal(caster, amount);
    format!("{} uses {skill}, recovering {healed} HP!", session.name(caster))
}

pub(super) fn hearty_meal(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    restore(session, caster, SkillId::HeartyMeal, 0.25)
}

pub(super) fn mending_light(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    restore(session, caster, SkillId::MendingLight, 0.15)
}

pub(super) fn steady_guard(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(caster, caster, EffectSpec::buff("Steady Guard", 2, StatKind::Def, Percent(0.15)));
    format!("{} takes a {}, raising defense!", session.name(caster), SkillId::SteadyGuard)
}

pub(super) fn hallowed_ward(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    let shield = session.participant(caster).max_hp_fraction(0.10);
    session.apply_effect(
        caster,
        caster,
        EffectSpec::shield("Hallowed Ward", CombatConfig::PERSISTENT_DURATION, shield),
    );
    format!(
        "{} raises a {} absorbing {shield} damage!",
        session.name(caster),
        SkillId::HallowedWard
    )
}

pub(super) fn wind_step(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(caster, caster, EffectSpec::buff("Wind Step", 2, StatKind::Spd, Percent(0.20)));
    format!("{} uses {}, quickening its pace!", session.name(caster), SkillId::WindStep)
}

pub(super) fn iron_resolve(session: &mut CombatSession, caster: Side, _target: Side) -> String {
    session.apply_effect(caster, caster, EffectSpec::buff("Iron Resolve", 2, StatKind::Def, Percent(0.30)));
    format!("{} steels itself with {}!", session.name(caster), SkillId::IronResolve)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{CombatSession, SessionBuilder};
    use crate::env::{AgencyDefinition, FixedRng};
    use crate::passives::PassiveId;
    use crate::skills::{SkillId, resolve};
    use crate::state::{EffectKind, EffectSpec, Participant, Side};
    use crate::stats::Stats;

    fn fighter(name: &str) -> Participant {
        let mut stats = Stats::new(1000.0, 100.0, 20.0, 10.0);
        stats.crit_rate = 0.0;
        Participant::new(name, stats)
    }

    fn session(p1: Participant, p2: Participant) -> CombatSession {
        SessionBuilder::new(p1, p2)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build()
    }

    #[test]
    fn solar_overture_consumes_the_finale_flag() {
        let caster = fighter("A")
            .with_skill("Blazing Finale", 3)
            .with_passive(PassiveId::HarmoniousResonance);
        let mut s = session(caster, fighter("B"));
        s.participant_mut(Side::P1).skills[0].remaining = 2;
        s.participant_mut(Side::P1).passive.enhance_support = true;

        let line = resolve(&mut s, Side::P1, Side::P2, SkillId::SolarOverture);
        let owner = s.participant(Side::P1);
        assert!(owner.effects.has_named("Solar ATK Up (Enhanced)"));
        assert_eq!(owner.stats.atk, 145.0);
        assert!(!owner.passive.enhance_support);
        assert_eq!(owner.skills[0].remaining, 1);
        assert!(line.contains("cooldown reduced"));
    }

    #[test]
    fn solar_overture_without_resonance_keeps_cooldowns() {
        let caster = fighter("A").with_skill("Blazing Finale", 3);
        let mut s = session(caster, fighter("B"));
        s.participant_mut(Side::P1).skills[0].remaining = 2;
        resolve(&mut s, Side::P1, Side::P2, SkillId::SolarOverture);
        let owner = s.participant(Side::P1);
        assert!(owner.effects.has_named("Solar ATK Up"));
        assert_eq!(owner.skills[0].remaining, 2);
    }

    #[test]
    fn harmonic_convergence_averages_hp() {
        let mut s = session(fighter("A"), fighter("B"));
        s.participant_mut(Side::P1).set_hp(200);
        s.participant_mut(Side::P2).set_hp(800);
        resolve(&mut s, Side::P1, Side::P2, SkillId::HarmonicConvergence);
        assert_eq!(s.participant(Side::P2).hp(), 500);
        assert_eq!(s.participant(Side::P1).hp(), 600);
    }

    #[test]
    fn mending_light_is_weaker_for_specialists() {
        let mut agency = AgencyDefinition::new("order", "Order");
        agency.debuff_specialist = true;
        let mut s = session(fighter("A").with_agency(agency), fighter("B"));
        s.participant_mut(Side::P1).set_hp(100);
        resolve(&mut s, Side::P1, Side::P2, SkillId::MendingLight);
        // trunc(150 × 0.9) = 135
        assert_eq!(s.participant(Side::P1).hp(), 235);
    }

    #[test]
    fn hearty_meal_fails_under_heal_block() {
        let mut s = session(fighter("A"), fighter("B"));
        s.participant_mut(Side::P1).set_hp(100);
        s.apply_effect(Side::P2, Side::P1, EffectSpec::new("Heal Block", EffectKind::HealBlock, 2));
        let line = resolve(&mut s, Side::P1, Side::P2, SkillId::HeartyMeal);
        assert_eq!(s.participant(Side::P1).hp(), 100);
        assert!(line.contains("heal block"));
    }

    #[test]
    fn raise_dead_summons_a_skeleton() {
        let mut s = session(fighter("A"), fighter("B"));
        resolve(&mut s, Side::P1, Side::P2, SkillId::RaiseDead);
        assert!(s.participant(Side::P1).effects.has_kind(EffectKind::Summon));
    }

    #[test]
    fn demonic_pact_never_kills() {
        let mut s = session(fighter("A"), fighter("B"));
        s.participant_mut(Side::P1).set_hp(1);
        resolve(&mut s, Side::P1, Side::P2, SkillId::DemonicPact);
        assert_eq!(s.participant(Side::P1).hp(), 1);
        assert_eq!(s.participant(Side::P1).stats.atk, 130.0);
    }
}
