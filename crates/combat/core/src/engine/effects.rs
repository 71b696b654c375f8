//! Status effect engine: application, countdown, removal and healing.

use tracing::{debug, trace};

use super::{CombatSession, DebuffRole, HookEvent};
use crate::passives::PassiveId;
use crate::state::{EffectKind, EffectPayload, EffectSpec, StatDelta, StatusEffect, Side};
use crate::stats::StatKind;

/// Result of [`CombatSession::apply_effect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// A new effect instance was attached.
    Added,
    /// An effect with the same name existed; its duration was extended.
    Refreshed,
    /// Heal block or immunity prevented the effect.
    Blocked,
}

impl Applied {
    pub const fn landed(self) -> bool {
        !matches!(self, Self::Blocked)
    }
}

/// Agency duration rule for beneficial effects on a debuff specialist.
fn dampened_duration(duration: u32) -> u32 {
    ((duration as f64 * 0.9) as u32).max(2)
}

impl CombatSession {
    /// Applies `spec` from `caster` onto `target`.
    ///
    /// # Rules
    ///
    /// - a hot on a heal-blocked target is a no-op; heal block strips all hots
    /// - immunity blocks harmful effects cast by the opponent
    /// - a debuff-specialist caster extends debuff, dot, stun, silence,
    ///   paralyze and heal block effects by one turn
    /// - a debuff-specialist target gets beneficial effects shortened to
    ///   `max(2, trunc(d × 0.9))` and percentage magnitudes scaled by 0.9
    /// - shields, hots and dots stack; everything else refreshes by name to
    ///   `max(existing, new)` duration
    /// - percentage stat deltas resolve once against the target's base stats
    pub fn apply_effect(&mut self, caster: Side, target: Side, spec: EffectSpec) -> Applied {
        let EffectSpec {
            name,
            kind,
            mut duration,
            stat,
            payload,
        } = spec;

        let caster_specialist = self.participant(caster).is_debuff_specialist();
        let owner = self.participant(target);

        if kind == EffectKind::Hot && owner.effects.is_heal_blocked() {
            debug!(target: "combat::effects", side = %target, effect = %name, "hot blocked by heal block");
            return Applied::Blocked;
        }
        if kind.is_harmful() && caster != target && owner.effects.has_kind(EffectKind::Immunity) {
            let line = format!("{} is immune to {}!", owner.name, name);
            self.narrate(line);
            return Applied::Blocked;
        }

        if caster_specialist && kind.extended_by_specialist() {
            duration += 1;
        }
        let dampen = owner.is_debuff_specialist() && kind.is_beneficial();
        if dampen {
            duration = dampened_duration(duration);
        }

        let owner = self.participant_mut(target);
        if kind == EffectKind::HealBlock {
            let stripped = owner.effects.extract(|e| e.kind == EffectKind::Hot);
            if !stripped.is_empty() {
                trace!(target: "combat::effects", side = %target, count = stripped.len(), "heal block stripped hots");
            }
        }

        let applied = if let Some(existing) = owner
            .effects
            .find_named_mut(&name)
            .filter(|e| !e.kind.stacks())
        {
            existing.duration = existing.duration.max(duration);
            Applied::Refreshed
        } else {
            let payload = match stat {
                Some((stat, delta)) => {
                    let raw = match delta {
                        StatDelta::Percent(pct) => {
                            let scale = if dampen { 0.9 } else { 1.0 };
                            owner.base_stats().get(stat) * pct * scale
                        }
                        StatDelta::Flat(amount) => amount,
                    };
                    let applied = shift_stat(owner, stat, stat.normalize(raw));
                    EffectPayload::Stat {
                        stat,
                        delta: applied,
                    }
                }
                None => {
                    if let EffectPayload::Swap { atk, def } = payload {
                        let atk = shift_stat(owner, StatKind::Atk, atk);
                        let def = shift_stat(owner, StatKind::Def, def);
                        EffectPayload::Swap { atk, def }
                    } else {
                        payload
                    }
                }
            };
            owner.effects.push(StatusEffect {
                name: name.clone(),
                kind,
                duration,
                caster,
                payload,
            });
            Applied::Added
        };

        debug!(
            target: "combat::effects",
            caster = %caster,
            side = %target,
            effect = %name,
            kind = %kind,
            duration,
            ?applied,
            "effect applied"
        );

        if kind.is_harmful() && caster != target {
            self.fire(
                target,
                HookEvent::DebuffApplied {
                    role: DebuffRole::Target,
                    effect: name.clone(),
                    kind,
                },
            );
            self.fire(
                caster,
                HookEvent::DebuffApplied {
                    role: DebuffRole::Caster,
                    effect: name,
                    kind,
                },
            );
        }
        applied
    }

    /// Decrements every effect on `side` once and removes expired ones.
    pub(crate) fn countdown_effects(&mut self, side: Side) {
        let owner = self.participant_mut(side);
        for effect in owner.effects.iter_mut() {
            effect.duration = effect.duration.saturating_sub(1);
        }
        let expired = owner.effects.extract(|e| e.duration == 0);
        for effect in expired {
            let line = format!("{} on {} wore off.", effect.name, self.name(side));
            self.narrate(line);
            self.revert_effect(side, &effect);
        }
    }

    /// Undoes the stat changes of an effect that left `side`.
    fn revert_effect(&mut self, side: Side, effect: &StatusEffect) {
        match effect.payload {
            EffectPayload::Stat { stat, delta } => {
                self.participant_mut(side).stats.add_clamped(stat, -delta);
            }
            EffectPayload::Swap { atk, def } => {
                // Both halves of a swap leave together.
                let partner = self
                    .participant_mut(side.opponent())
                    .effects
                    .take_first(|e| e.kind == EffectKind::StatSwap);
                let owner = self.participant_mut(side);
                owner.stats.add_clamped(StatKind::Atk, -atk);
                owner.stats.add_clamped(StatKind::Def, -def);
                if let Some(StatusEffect {
                    payload: EffectPayload::Swap { atk, def },
                    ..
                }) = partner
                {
                    let other = self.participant_mut(side.opponent());
                    other.stats.add_clamped(StatKind::Atk, -atk);
                    other.stats.add_clamped(StatKind::Def, -def);
                }
            }
            _ => {}
        }
    }

    /// Removes every effect on `side` matching `pred`, reverting stat changes.
    ///
    /// Returns the names of the removed effects.
    pub fn remove_effects(
        &mut self,
        side: Side,
        pred: impl FnMut(&StatusEffect) -> bool,
    ) -> Vec<String> {
        let removed = self.participant_mut(side).effects.extract(pred);
        let names = removed.iter().map(|e| e.name.clone()).collect();
        for effect in &removed {
            self.revert_effect(side, effect);
        }
        names
    }

    /// Removes the first effect on `side` matching `pred`, reverting it.
    pub fn remove_first_effect(
        &mut self,
        side: Side,
        pred: impl FnMut(&StatusEffect) -> bool,
    ) -> Option<StatusEffect> {
        let effect = self.participant_mut(side).effects.take_first(pred)?;
        self.revert_effect(side, &effect);
        Some(effect)
    }

    /// Strips buff-kind effects. Returns how many were removed.
    pub fn purge_buffs(&mut self, side: Side) -> usize {
        self.remove_effects(side, |e| e.kind == EffectKind::Buff).len()
    }

    /// Strips debuffs and damage-over-time effects.
    pub fn cleanse(&mut self, side: Side) -> usize {
        self.remove_effects(side, |e| {
            matches!(e.kind, EffectKind::Debuff | EffectKind::Dot)
        })
        .len()
    }

    /// Strips every harmful effect, control included.
    pub fn cleanse_harmful(&mut self, side: Side) -> usize {
        self.remove_effects(side, |e| e.kind.is_harmful()).len()
    }

    /// Replaces any effect named like `spec` with `spec`, reverting the old one.
    pub(crate) fn replace_effect(&mut self, caster: Side, target: Side, spec: EffectSpec) -> Applied {
        let name = spec.name.clone();
        self.remove_effects(target, |e| e.name == name);
        self.apply_effect(caster, target, spec)
    }

    /// Heals `side` by `amount`, honoring heal block and Steadfast Faith.
    ///
    /// Returns the hp actually restored.
    pub fn heal(&mut self, side: Side, amount: i64) -> i64 {
        let target = self.participant_mut(side);
        if target.effects.is_heal_blocked() {
            return 0;
        }
        let amount = if target.has_passive(PassiveId::SteadfastFaith) {
            (amount as f64 * 1.05) as i64
        } else {
            amount
        };
        target.gain_hp(amount)
    }
}

/// Adds `delta` to a stat with the zero floor, returning the change actually made.
fn shift_stat(owner: &mut crate::state::Participant, stat: StatKind, delta: f64) -> f64 {
    let before = owner.stats.get(stat);
    owner.stats.add_clamped(stat, delta);
    owner.stats.get(stat) - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{AgencyDefinition, FixedRng};
    use crate::engine::SessionBuilder;
    use crate::state::Participant;
    use crate::stats::Stats;
    use std::sync::Arc;

    fn session(p1: Participant, p2: Participant) -> CombatSession {
        SessionBuilder::new(p1, p2)
            .rng(Arc::new(FixedRng::NEVER), 1)
            .build()
    }

    fn fighter(name: &str) -> Participant {
        Participant::new(name, Stats::new(200.0, 100.0, 20.0, 10.0))
    }

    #[test]
    fn percent_buff_reverts_exactly_on_expiry() {
        let mut s = session(fighter("A"), fighter("B"));
        let spec = EffectSpec::buff("Might", 2, StatKind::Atk, StatDelta::Percent(0.30));
        assert_eq!(s.apply_effect(Side::P1, Side::P1, spec), Applied::Added);
        assert_eq!(s.participant(Side::P1).stats.atk, 130.0);

        s.countdown_effects(Side::P1);
        assert_eq!(s.participant(Side::P1).effects.len(), 1);
        s.countdown_effects(Side::P1);
        assert!(s.participant(Side::P1).effects.is_empty());
        assert_eq!(s.participant(Side::P1).stats.atk, 100.0);
    }

    #[test]
    fn clamped_debuff_reverts_to_original() {
        let mut s = session(fighter("A"), fighter("B"));
        let spec = EffectSpec::debuff("Shatter", 1, StatKind::Def, StatDelta::Flat(-50.0));
        s.apply_effect(Side::P1, Side::P2, spec);
        assert_eq!(s.participant(Side::P2).stats.def, 0.0);
        s.countdown_effects(Side::P2);
        assert_eq!(s.participant(Side::P2).stats.def, 20.0);
    }

    #[test]
    fn heal_block_and_hot_interplay() {
        let mut s = session(fighter("A"), fighter("B"));
        s.apply_effect(Side::P2, Side::P2, EffectSpec::hot("Regen", 3, 10));
        s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Heal Block", EffectKind::HealBlock, 3));
        assert!(!s.participant(Side::P2).effects.has_kind(EffectKind::Hot));

        let again = s.apply_effect(Side::P2, Side::P2, EffectSpec::hot("Regen", 3, 10));
        assert_eq!(again, Applied::Blocked);
        assert!(!s.participant(Side::P2).effects.has_kind(EffectKind::Hot));
    }

    #[test]
    fn non_stacking_effects_refresh_to_longest() {
        let mut s = session(fighter("A"), fighter("B"));
        s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Stun", EffectKind::Stun, 3));
        let again = s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Stun", EffectKind::Stun, 1));
        assert_eq!(again, Applied::Refreshed);
        let effects = &s.participant(Side::P2).effects;
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.iter().next().map(|e| e.duration), Some(3));
    }

    #[test]
    fn dots_stack() {
        let mut s = session(fighter("A"), fighter("B"));
        s.apply_effect(Side::P1, Side::P2, EffectSpec::dot("Burn", 3, 5));
        s.apply_effect(Side::P1, Side::P2, EffectSpec::dot("Burn", 3, 5));
        assert_eq!(s.participant(Side::P2).effects.len(), 2);
    }

    #[test]
    fn immunity_blocks_opponent_debuffs() {
        let mut s = session(fighter("A"), fighter("B"));
        s.apply_effect(Side::P2, Side::P2, EffectSpec::new("Immunity", EffectKind::Immunity, 3));
        let result = s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Stun", EffectKind::Stun, 2));
        assert_eq!(result, Applied::Blocked);
        assert!(!s.participant(Side::P2).effects.has_kind(EffectKind::Stun));
    }

    #[test]
    fn debuff_specialist_agency_rules() {
        let mut agency = AgencyDefinition::new("projectabyssal", "Project Abyssal");
        agency.debuff_specialist = true;
        let mut s = session(fighter("A").with_agency(agency.clone()), fighter("B").with_agency(agency));

        s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Silence", EffectKind::Silence, 2));
        let silence = s.participant(Side::P2).effects.iter().next().map(|e| e.duration);
        assert_eq!(silence, Some(3));

        let spec = EffectSpec::buff("Might", 4, StatKind::Atk, StatDelta::Percent(0.30));
        s.apply_effect(Side::P1, Side::P1, spec);
        let p1 = s.participant(Side::P1);
        assert_eq!(p1.stats.atk, 127.0);
        assert_eq!(p1.effects.iter().next().map(|e| e.duration), Some(3));
    }

    #[test]
    fn debuff_specialist_does_not_extend_freeze() {
        let mut agency = AgencyDefinition::new("projectabyssal", "Project Abyssal");
        agency.debuff_specialist = true;
        let mut s = session(fighter("A").with_agency(agency), fighter("B"));

        s.apply_effect(Side::P1, Side::P2, EffectSpec::new("Frostbite", EffectKind::Freeze, 2));
        s.apply_effect(Side::P1, Side::P2, EffectSpec::dot("Venom", 2, 5));
        let durations: Vec<(EffectKind, u32)> = s
            .participant(Side::P2)
            .effects
            .iter()
            .map(|e| (e.kind, e.duration))
            .collect();
        assert_eq!(durations, vec![(EffectKind::Freeze, 2), (EffectKind::Dot, 3)]);
    }

    #[test]
    fn heal_respects_block_and_cap() {
        let mut s = session(fighter("A"), fighter("B"));
        s.participant_mut(Side::P1).set_hp(150);
        assert_eq!(s.heal(Side::P1, 100), 50);
        s.participant_mut(Side::P1).set_hp(150);
        s.apply_effect(Side::P2, Side::P1, EffectSpec::new("Heal Block", EffectKind::HealBlock, 2));
        assert_eq!(s.heal(Side::P1, 10), 0);
    }
}
