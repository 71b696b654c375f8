//! Revival and retaliation passives.
//!
//! Revivals run in the lethal stage, one attempt per passive per battle.
//! Retaliations run in the finalize stage against the winner.

use tracing::debug;

use super::PassiveId;
use crate::engine::{CombatSession, DefeatStage};
use crate::state::{EffectKind, EffectSpec, Side};

const EXTRA_LIFE_HP: f64 = 0.15;
const UNBROKEN_THREADS_HP: f64 = 0.20;
const UNBROKEN_THREADS_CHANCE: f64 = 0.25;
const ENCORE_FRACTION: f64 = 0.25;
const VENGEANCE_MULTIPLIER: f64 = 1.2;

pub(super) fn defeat(session: &mut CombatSession, owner: Side, passive: PassiveId, stage: DefeatStage) {
    match stage {
        DefeatStage::Lethal => revive(session, owner, passive),
        DefeatStage::Finalize => retaliate(session, owner, passive),
    }
}

fn revive(session: &mut CombatSession, owner: Side, passive: PassiveId) {
    if !session.participant(owner).is_down() {
        return;
    }
    match passive {
        PassiveId::RagingPhoenix => {
            if session.participant(owner).passive.phoenix_used {
                return;
            }
            let participant = session.participant_mut(owner);
            participant.passive.phoenix_used = true;
            participant.set_hp(1);
            session.apply_effect(
                owner,
                owner,
                EffectSpec::new("Phoenix Invincibility", EffectKind::Invincibility, 2),
            );
            let line = format!("Raging Phoenix! {} refuses death and rises in flames!", session.name(owner));
            session.narrate(line);
        }
        PassiveId::ExtraLife => {
            let participant = session.participant_mut(owner);
            if participant.passive.extra_life_used {
                return;
            }
            participant.passive.extra_life_used = true;
            let hp = participant.max_hp_fraction(EXTRA_LIFE_HP);
            participant.set_hp(hp);
            let line = format!("Extra Life! {} comes back with {hp} HP!", session.name(owner));
            session.narrate(line);
        }
        PassiveId::UnbrokenThreads => {
            if session.participant(owner).passive.unbroken_threads_used
                || !session.dice().chance(UNBROKEN_THREADS_CHANCE)
            {
                return;
            }
            let participant = session.participant_mut(owner);
            participant.passive.unbroken_threads_used = true;
            let hp = participant.max_hp_fraction(UNBROKEN_THREADS_HP);
            participant.set_hp(hp);
            let line = format!("Unbroken Threads! {} rises again with {hp} HP!", session.name(owner));
            session.narrate(line);
        }
        _ => return,
    }
    debug!(target: "combat::passives", side = %owner, passive = %passive, hp = session.participant(owner).hp(), "revival");
}

fn retaliate(session: &mut CombatSession, owner: Side, passive: PassiveId) {
    let winner = owner.opponent();
    let loser = session.participant(owner);
    let damage = match passive {
        PassiveId::EncoreOfShadows => loser.max_hp_fraction(ENCORE_FRACTION),
        PassiveId::FinalVengeance => (loser.stats.atk * VENGEANCE_MULTIPLIER) as i64,
        _ => return,
    };
    let lost = session.participant_mut(winner).lose_hp(damage);
    let line = format!(
        "{}! {} strikes {} one last time for {lost} damage!",
        passive,
        session.name(owner),
        session.name(winner)
    );
    session.narrate(line);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::engine::{DefeatStage, HookEvent, SessionBuilder};
    use crate::env::{FixedRng, SequenceRng};
    use crate::passives::{PassiveId, trigger};
    use crate::state::{EffectKind, Participant, Side};
    use crate::stats::Stats;

    const LETHAL: HookEvent = HookEvent::Defeat(DefeatStage::Lethal);

    fn fighter(name: &str) -> Participant {
        Participant::new(name, Stats::new(200.0, 50.0, 0.0, 0.0))
    }

    #[test]
    fn raging_phoenix_rises_once_with_invincibility() {
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::RagingPhoenix), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.participant_mut(Side::P1).set_hp(0);
        trigger(&mut s, Side::P1, PassiveId::RagingPhoenix, &LETHAL);
        assert_eq!(s.participant(Side::P1).hp(), 1);
        assert!(s.participant(Side::P1).effects.has_kind(EffectKind::Invincibility));

        s.participant_mut(Side::P1).set_hp(0);
        trigger(&mut s, Side::P1, PassiveId::RagingPhoenix, &LETHAL);
        assert!(s.participant(Side::P1).is_down());
    }

    #[test]
    fn unbroken_threads_failed_roll_stays_available() {
        let rng = SequenceRng::from_units(&[0.9, 0.1], 0.9);
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::UnbrokenThreads), fighter("B"))
            .rng(Arc::new(rng), 0)
            .build();
        s.participant_mut(Side::P1).set_hp(0);
        trigger(&mut s, Side::P1, PassiveId::UnbrokenThreads, &LETHAL);
        assert!(s.participant(Side::P1).is_down());
        trigger(&mut s, Side::P1, PassiveId::UnbrokenThreads, &LETHAL);
        assert_eq!(s.participant(Side::P1).hp(), 40);
    }

    #[test]
    fn final_vengeance_hits_the_winner() {
        let mut s = SessionBuilder::new(fighter("A").with_passive(PassiveId::FinalVengeance), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.participant_mut(Side::P1).set_hp(0);
        trigger(&mut s, Side::P1, PassiveId::FinalVengeance, &HookEvent::Defeat(DefeatStage::Finalize));
        assert_eq!(s.participant(Side::P2).hp(), 140);
    }
}
