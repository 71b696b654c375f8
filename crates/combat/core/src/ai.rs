//! Action policy for non-player participants.

use tracing::trace;

use crate::engine::{CombatAction, CombatSession};
use crate::state::{EffectKind, Side};

/// What the AI decided for its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiChoice {
    pub action: CombatAction,
    /// Side the action is aimed at. A taunt cast by the opponent pins it.
    pub target: Side,
}

/// Picks the action of `actor`.
///
/// Silenced actors, or actors without a ready skill, attack. Otherwise a
/// roll against the configured skill chance decides between a uniformly
/// random ready skill and a basic attack. No roll is spent when the skill
/// branch is impossible.
pub fn choose_action(session: &mut CombatSession, actor: Side) -> AiChoice {
    let owner = session.participant(actor);
    let target = owner
        .effects
        .iter()
        .find(|e| e.kind == EffectKind::Taunt && e.caster != actor)
        .map_or(actor.opponent(), |e| e.caster);

    let silenced = owner.effects.has_kind(EffectKind::Silence);
    let ready: Vec<String> = owner.ready_skills().map(|slot| slot.name.clone()).collect();

    let chance = session.config().ai_skill_chance;
    let action = if !silenced && !ready.is_empty() && session.dice().chance(chance) {
        let pick = session.dice().pick(ready.len());
        CombatAction::Skill(ready[pick].clone())
    } else {
        CombatAction::Attack
    };
    trace!(
        target: "combat::ai",
        side = %actor,
        ready = ready.len(),
        silenced,
        ?action,
        "ai decision"
    );
    AiChoice { action, target }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine::SessionBuilder;
    use crate::env::{FixedRng, SequenceRng};
    use crate::state::{EffectSpec, Participant};
    use crate::stats::Stats;

    fn monster() -> Participant {
        Participant::new("Slime", Stats::default())
            .with_skill("Heavy Blow", 3)
            .with_skill("Swift Strike", 3)
    }

    #[test]
    fn always_skill_when_the_roll_succeeds() {
        let mut s = SessionBuilder::new(Participant::new("Hero", Stats::default()), monster())
            .rng(Arc::new(FixedRng::ALWAYS), 0)
            .build();
        let choice = choose_action(&mut s, Side::P2);
        assert!(matches!(choice.action, CombatAction::Skill(_)));
        assert_eq!(choice.target, Side::P1);
    }

    #[test]
    fn attacks_when_the_roll_fails() {
        let mut s = SessionBuilder::new(Participant::new("Hero", Stats::default()), monster())
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        assert_eq!(choose_action(&mut s, Side::P2).action, CombatAction::Attack);
    }

    #[test]
    fn silence_forces_an_attack() {
        let mut s = SessionBuilder::new(Participant::new("Hero", Stats::default()), monster())
            .rng(Arc::new(FixedRng::ALWAYS), 0)
            .build();
        s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Hush", EffectKind::Silence, 2));
        assert_eq!(choose_action(&mut s, Side::P2).action, CombatAction::Attack);
    }

    #[test]
    fn cooling_skills_are_not_candidates() {
        let rng = SequenceRng::from_units(&[0.1, 0.0], 0.0);
        let mut s = SessionBuilder::new(Participant::new("Hero", Stats::default()), monster())
            .rng(Arc::new(rng), 0)
            .build();
        s.participant_mut(Side::P2).skills[0].remaining = 2;
        let choice = choose_action(&mut s, Side::P2);
        assert_eq!(choice.action, CombatAction::Skill("Swift Strike".into()));
    }
}
