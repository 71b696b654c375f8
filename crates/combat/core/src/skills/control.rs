//! Player skills that weaken or lock down the opponent.

use super::{SkillId, blind, crit_tag};
use crate::combat::DamageRequest;
use crate::engine::CombatSession;
use crate::state::StatDelta::Percent;
use crate::state::{EffectKind, EffectPayload, EffectSpec, Side};
use crate::stats::StatKind;

pub(super) fn sorrowful_aria(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Sorrowful ATK Down", 4, StatKind::Atk, Percent(-0.30)),
    );
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Sorrowful DEF Down", 4, StatKind::Def, Percent(-0.30)),
    );
    let mut line = format!(
        "{} sings {}, crushing {}'s will to fight!",
        session.name(caster),
        SkillId::SorrowfulAria,
        session.name(target)
    );
    if session.dice().chance(0.40) {
        session.apply_effect(caster, target, EffectSpec::new("Aria Silence", EffectKind::Silence, 2));
        line.push_str(&format!("\n> The melody silences {}!", session.name(target)));
    }
    line
}

/// Swaps attack and defense with the target until either side's swap expires.
pub(super) fn realitys_blueprint(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let swapped = |side: Side| session.participant(side).effects.has_kind(EffectKind::StatSwap);
    if swapped(caster) || swapped(target) {
        return format!(
            "{} draws {}, but reality is already rewritten.",
            session.name(caster),
            SkillId::RealitysBlueprint
        );
    }

    let (own, other) = (session.participant(caster).stats, session.participant(target).stats);
    let to_caster = EffectPayload::Swap {
        atk: other.atk - own.atk,
        def: other.def - own.def,
    };
    let to_target = EffectPayload::Swap {
        atk: own.atk - other.atk,
        def: own.def - other.def,
    };
    session.apply_effect(
        caster,
        caster,
        EffectSpec::new("Stat Swap (Self)", EffectKind::StatSwap, 3).payload(to_caster),
    );
    session.apply_effect(
        caster,
        target,
        EffectSpec::new("Stat Swap (Target)", EffectKind::StatSwap, 3).payload(to_target),
    );
    format!(
        "{} uses {}, swapping attack and defense with {}!",
        session.name(caster),
        SkillId::RealitysBlueprint,
        session.name(target)
    )
}

pub(super) fn dreamtide(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(caster, target, EffectSpec::new("Dreamtide Stun", EffectKind::Stun, 2));
    session.apply_effect(
        caster,
        target,
        EffectSpec::new("Dreamtide Heal Block", EffectKind::HealBlock, 3),
    );
    format!(
        "{} drowns {} in {}, lulling it to sleep!",
        session.name(caster),
        session.name(target),
        SkillId::Dreamtide
    )
}

/// The target strikes itself.
pub(super) fn puppets_vow(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let line = format!(
        "{} uses {}, forcing {} to attack itself!",
        session.name(caster),
        SkillId::PuppetsVow,
        session.name(target)
    );
    session.narrate(line);
    let hit = session.apply_damage(target, target, DamageRequest::hit(0.75));
    format!(
        "> {}The puppet's strike deals {} damage to {}!",
        crit_tag(hit.crit),
        hit.amount,
        session.name(target)
    )
}

pub(super) fn data_leak(session: &mut CombatSession, caster: Side, target: Side) -> String {
    let purged = session.purge_buffs(target);
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Data Leak DEF Down", 3, StatKind::Def, Percent(-0.50)),
    );
    let detail = if purged > 0 {
        format!("Every buff on {} is wiped and its defense collapses!", session.name(target))
    } else {
        format!("{}'s defense collapses!", session.name(target))
    };
    format!("{} triggers a {}!\n> {detail}", session.name(caster), SkillId::DataLeak)
}

pub(super) fn foresights_gambit(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(caster, target, blind("Blind", 3, 0.25));
    format!(
        "{} uses {}, clouding {}'s vision!",
        session.name(caster),
        SkillId::ForesightsGambit,
        session.name(target)
    )
}

pub(super) fn protocol_override(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(caster, target, EffectSpec::new("Heal Block", EffectKind::HealBlock, 3));
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Protocol Slow", 3, StatKind::Spd, Percent(-0.25)),
    );
    format!(
        "{} runs {}, corrupting {}'s systems and blocking recovery!",
        session.name(caster),
        SkillId::ProtocolOverride,
        session.name(target)
    )
}

pub(super) fn whispers_of_decay(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Attack Down (Decay)", 3, StatKind::Atk, Percent(-0.20)),
    );
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Defense Down (Decay)", 3, StatKind::Def, Percent(-0.20)),
    );
    format!(
        "{} murmurs {}, rotting {}'s strength and guard!",
        session.name(caster),
        SkillId::WhispersOfDecay,
        session.name(target)
    )
}

pub(super) fn gilded_prison(session: &mut CombatSession, caster: Side, target: Side) -> String {
    if !session.dice().chance(0.50) {
        return format!(
            "{} conjures a {}, but {} slips away!",
            session.name(caster),
            SkillId::GildedPrison,
            session.name(target)
        );
    }
    session.apply_effect(caster, target, EffectSpec::new("Paralyze", EffectKind::Paralyze, 3));
    format!(
        "{} conjures a {}, paralyzing {}!",
        session.name(caster),
        SkillId::GildedPrison,
        session.name(target)
    )
}

pub(super) fn lunar_curse(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(
        caster,
        caster,
        EffectSpec::buff("Lunar Blessing", 3, StatKind::Atk, Percent(0.15)),
    );
    let mut line = format!(
        "{} casts {}, empowering its attack!",
        session.name(caster),
        SkillId::LunarCurse
    );
    if session.dice().chance(0.75) {
        session.apply_effect(
            caster,
            target,
            EffectSpec::debuff("Lunar Curse", 4, StatKind::Spd, Percent(-0.20)),
        );
        line.push_str(&format!("\n> {} slows down as well!", session.name(target)));
    } else {
        line.push_str(&format!("\n> The curse fails to slow {}.", session.name(target)));
    }
    line
}

pub(super) fn whispers_of_fear(session: &mut CombatSession, caster: Side, target: Side) -> String {
    if !session.dice().chance(0.50) {
        return format!(
            "{} whispers {}, but {} shrugs it off!",
            session.name(caster),
            SkillId::WhispersOfFear,
            session.name(target)
        );
    }
    session.apply_effect(caster, target, blind("Fear", 3, 0.25));
    format!(
        "{} whispers {}, filling {} with dread!",
        session.name(caster),
        SkillId::WhispersOfFear,
        session.name(target)
    )
}

pub(super) fn fading_curse(session: &mut CombatSession, caster: Side, target: Side) -> String {
    session.apply_effect(
        caster,
        target,
        EffectSpec::debuff("Fading Curse", 2, StatKind::Atk, Percent(-0.10)),
    );
    format!(
        "{} casts {}, lowering {}'s attack!",
        session.name(caster),
        SkillId::FadingCurse,
        session.name(target)
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{CombatSession, SessionBuilder};
    use crate::env::FixedRng;
    use crate::skills::{SkillId, resolve};
    use crate::state::{EffectKind, Participant, Side};
    use crate::stats::Stats;

    fn session(p1: Participant, p2: Participant) -> CombatSession {
        SessionBuilder::new(p1, p2)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build()
    }

    #[test]
    fn realitys_blueprint_swaps_and_reverts_together() {
        let caster = Participant::new("A", Stats::new(500.0, 30.0, 80.0, 0.0));
        let target = Participant::new("B", Stats::new(500.0, 90.0, 10.0, 0.0));
        let mut s = session(caster, target);
        resolve(&mut s, Side::P1, Side::P2, SkillId::RealitysBlueprint);
        assert_eq!((s.participant(Side::P1).stats.atk, s.participant(Side::P1).stats.def), (90.0, 10.0));
        assert_eq!((s.participant(Side::P2).stats.atk, s.participant(Side::P2).stats.def), (30.0, 80.0));

        // A second cast while linked changes nothing.
        resolve(&mut s, Side::P1, Side::P2, SkillId::RealitysBlueprint);
        assert_eq!(s.participant(Side::P1).stats.atk, 90.0);

        for _ in 0..3 {
            s.countdown_effects(Side::P2);
        }
        assert_eq!((s.participant(Side::P1).stats.atk, s.participant(Side::P1).stats.def), (30.0, 80.0));
        assert_eq!((s.participant(Side::P2).stats.atk, s.participant(Side::P2).stats.def), (90.0, 10.0));
        assert!(!s.participant(Side::P1).effects.has_kind(EffectKind::StatSwap));
    }

    #[test]
    fn dreamtide_stuns_and_blocks_healing() {
        let mut s = session(
            Participant::new("A", Stats::default()),
            Participant::new("B", Stats::default()),
        );
        resolve(&mut s, Side::P1, Side::P2, SkillId::Dreamtide);
        let effects = &s.participant(Side::P2).effects;
        assert!(effects.has_kind(EffectKind::Stun));
        assert!(effects.is_heal_blocked());
    }

    #[test]
    fn puppets_vow_turns_the_target_on_itself() {
        let caster = Participant::new("A", Stats::new(500.0, 10.0, 0.0, 0.0));
        let mut target_stats = Stats::new(500.0, 100.0, 20.0, 0.0);
        target_stats.crit_rate = 0.0;
        let mut s = session(caster, Participant::new("B", target_stats));
        resolve(&mut s, Side::P1, Side::P2, SkillId::PuppetsVow);
        // 100 × 0.75 - 20 = 55
        assert_eq!(s.participant(Side::P2).hp(), 445);
        assert_eq!(s.participant(Side::P1).hp(), 500);
    }
}
