//! Turn state machine: turn start, action resolution and turn switching.

use tracing::{debug, warn};

use super::{ActionError, CombatAction, CombatSession, ConfigurationGap, HookEvent, Phase};
use crate::combat::{DamageOutcome, DamageRequest, HitKind};
use crate::error::CombatError;
use crate::outcome::TelemetryEvent;
use crate::passives::PassiveId;
use crate::skills::{self, SkillId};
use crate::state::{EffectKind, EffectPayload, EffectSpec, Marker, Side, SkillRef};

const BLOSSOM_STRIKE_MULTIPLIER: f64 = 1.0;
const LINGERING_MALICE_MULTIPLIER: f64 = 1.25;
const SPECIALIST_HEAL_FACTOR: f64 = 0.9;

/// Result of [`CombatSession::begin_turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnStart {
    /// The side may act; call `submit_action`.
    Ready(Side),
    /// The side lost its action; the turn already passed to the opponent.
    Skipped(Side),
    /// Turn-start damage ended the battle.
    Finished,
}

/// What an action did.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Attacked(DamageOutcome),
    /// Disarmed actors cannot attack; the turn is consumed.
    Disarmed,
    /// The defender could not be targeted; the turn is consumed.
    TargetUntargetable,
    SkillResolved(SkillId),
    /// The skill is declared but has no resolver; the turn is consumed.
    NotImplemented(ConfigurationGap),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionReport {
    pub actor: Side,
    pub outcome: ActionOutcome,
    /// True if the action ended the battle.
    pub finished: bool,
}

impl CombatSession {
    /// Runs turn-start processing for the current side.
    ///
    /// Cooldowns tick, turn-start passives fire, marker and summon strikes
    /// land, damage and healing over time apply, then control effects may
    /// cost the side its action. The side's effects count down exactly once
    /// whether or not the action is skipped.
    pub fn begin_turn(&mut self) -> Result<TurnStart, ActionError> {
        match self.phase {
            Phase::TurnStart => {}
            Phase::Finished => return Err(ActionError::Finished),
            phase => {
                return Err(ActionError::WrongPhase {
                    phase,
                    attempted: "begin a turn",
                });
            }
        }

        let side = self.turn.current;
        let opponent = side.opponent();
        self.turn.turn_count += 1;
        debug!(
            target: "combat::turns",
            side = %side,
            round = self.turn.round,
            turn = self.turn.turn_count,
            "turn start"
        );

        self.participant_mut(side).tick_cooldowns(1);
        self.fire(side, HookEvent::TurnStart);
        self.turn_start_strikes(side, opponent);
        self.tick_periodic(side);

        if self.check_game_over() {
            return Ok(TurnStart::Finished);
        }

        let actor = self.participant(side);
        let stunned = actor.effects.iter().any(|e| e.kind.is_hard_control());
        let paralyzed = actor.effects.has_kind(EffectKind::Paralyze);
        let paralyze_skip = self.config.paralyze_skip_chance;
        let skipped = if stunned {
            let line = format!("{} is stunned and cannot move!", self.name(side));
            self.narrate(line);
            true
        } else if paralyzed && self.dice().chance(paralyze_skip) {
            let line = format!("{} is paralyzed and fails to move!", self.name(side));
            self.narrate(line);
            true
        } else {
            false
        };

        self.countdown_effects(side);

        if skipped {
            self.switch_turn();
            return Ok(TurnStart::Skipped(side));
        }
        self.phase = Phase::Action(side);
        Ok(TurnStart::Ready(side))
    }

    /// Resolves `action` for `actor`.
    ///
    /// Rejected without mutation when `actor` is not the side whose action
    /// is awaited, when the session is finished, or when a skill cannot be
    /// used right now.
    pub fn submit_action(
        &mut self,
        actor: Side,
        action: CombatAction,
    ) -> Result<ActionReport, ActionError> {
        match self.phase {
            Phase::Action(current) if current == actor => {}
            Phase::Action(current) => return Err(ActionError::NotYourTurn { actor, current }),
            Phase::Finished => return Err(ActionError::Finished),
            phase => {
                return Err(ActionError::WrongPhase {
                    phase,
                    attempted: "act",
                });
            }
        }
        if let CombatAction::Skill(name) = &action {
            self.validate_skill(actor, name)?;
        }

        let defender = actor.opponent();
        let outcome = if self
            .participant(defender)
            .effects
            .has_marker(Marker::Untargetable)
        {
            let line = format!(
                "{}'s action fails because {} cannot be targeted!",
                self.name(actor),
                self.name(defender)
            );
            self.narrate(line);
            ActionOutcome::TargetUntargetable
        } else {
            match action {
                CombatAction::Attack => self.basic_attack(actor, defender),
                CombatAction::Skill(name) => self.use_skill(actor, defender, &name),
            }
        };

        let finished = self.check_game_over();
        if !finished {
            self.switch_turn();
        }
        Ok(ActionReport {
            actor,
            outcome,
            finished,
        })
    }

    fn validate_skill(&self, actor: Side, name: &str) -> Result<(), ActionError> {
        let caster = self.participant(actor);
        let Some(slot) = caster.skill(name) else {
            return Err(ActionError::NotLearned {
                actor,
                skill: name.to_owned(),
            });
        };
        if caster.effects.has_kind(EffectKind::Silence) {
            return Err(ActionError::Silenced { actor });
        }
        if !slot.is_ready() {
            return Err(ActionError::OnCooldown {
                skill: name.to_owned(),
                remaining: slot.remaining,
            });
        }
        Ok(())
    }

    fn basic_attack(&mut self, actor: Side, defender: Side) -> ActionOutcome {
        if self.participant(actor).effects.has_named("Disarmed")
            || self.participant(actor).effects.has_kind(EffectKind::Disarm)
        {
            let line = format!("{} is disarmed and cannot attack!", self.name(actor));
            self.narrate(line);
            return ActionOutcome::Disarmed;
        }

        let guaranteed_stun = self
            .remove_first_effect(actor, |e| e.is_marker(Marker::GuaranteedStun))
            .is_some();
        let hit = self.apply_damage(actor, defender, DamageRequest::hit(1.0));

        let line = match hit.kind {
            HitKind::Landed => {
                let crit = if hit.crit { "Critical! " } else { "" };
                format!(
                    "{}{} attacks for {} damage!",
                    crit,
                    self.name(actor),
                    hit.amount
                )
            }
            _ => format!("{} attacks but deals no damage.", self.name(actor)),
        };
        self.narrate(line);

        if guaranteed_stun {
            self.apply_effect(actor, defender, EffectSpec::new("Glacial Stun", EffectKind::Stun, 2));
            let line = format!("{} is frozen solid by the follow-up!", self.name(defender));
            self.narrate(line);
        }
        if hit.landed() {
            self.fire(actor, HookEvent::AttackLanded { target: defender });
        }
        ActionOutcome::Attacked(hit)
    }

    fn use_skill(&mut self, actor: Side, defender: Side, name: &str) -> ActionOutcome {
        let Some((skill_ref, cooldown)) = self
            .participant(actor)
            .skill(name)
            .map(|slot| (slot.skill, slot.cooldown))
        else {
            return ActionOutcome::NotImplemented(ConfigurationGap {
                skill: name.to_owned(),
            });
        };
        let skill = match skill_ref {
            SkillRef::Active(skill) => skill,
            SkillRef::Unknown => {
                let gap = ConfigurationGap {
                    skill: name.to_owned(),
                };
                warn!(
                    target: "combat::skills",
                    side = %actor,
                    skill = %name,
                    code = gap.error_code(),
                    "declared skill has no resolver"
                );
                self.narrate(format!("Error: skill '{name}' is not implemented yet."));
                return ActionOutcome::NotImplemented(gap);
            }
        };

        if let Some(slot) = self.participant_mut(actor).skill_mut(name) {
            slot.remaining = cooldown;
        }
        if let Some(player) = self.participant(actor).player_id {
            self.emit(TelemetryEvent::SkillUsed {
                player,
                skill: name.to_owned(),
            });
        }

        debug!(target: "combat::skills", side = %actor, skill = %skill, "resolving skill");
        let narration = skills::resolve(self, actor, defender, skill);
        if !narration.is_empty() {
            self.narrate(narration);
        }

        self.fire(actor, HookEvent::SkillUsed { caster: actor });
        self.fire(defender, HookEvent::SkillUsed { caster: actor });
        ActionOutcome::SkillResolved(skill)
    }

    /// Marker and summon strikes at the owner's turn start.
    fn turn_start_strikes(&mut self, side: Side, opponent: Side) {
        if self.participant(side).effects.has_marker(Marker::BlossomStrike) {
            let hit = self.apply_damage(side, opponent, DamageRequest::hit(BLOSSOM_STRIKE_MULTIPLIER));
            let line = format!(
                "{} bursts from the petals for {} damage!",
                self.name(side),
                hit.amount
            );
            self.narrate(line);
        }

        let summons: Vec<(String, f64)> = self
            .participant(side)
            .effects
            .iter()
            .filter(|e| e.kind == EffectKind::Summon)
            .map(|e| match e.payload {
                EffectPayload::Strike(multiplier) => (e.name.clone(), multiplier),
                _ => (e.name.clone(), 0.0),
            })
            .filter(|(_, multiplier)| *multiplier > 0.0)
            .collect();
        for (name, multiplier) in summons {
            let hit = self.apply_damage(side, opponent, DamageRequest::hit(multiplier));
            let line = format!("{name} strikes for {} damage!", hit.amount);
            self.narrate(line);
        }
    }

    /// Damage over time, then healing over time.
    fn tick_periodic(&mut self, side: Side) {
        let ticks: Vec<(String, EffectKind, Side, i64)> = self
            .participant(side)
            .effects
            .iter()
            .filter_map(|e| match (e.kind, e.payload) {
                (EffectKind::Dot | EffectKind::Hot, EffectPayload::Periodic { amount }) => {
                    Some((e.name.clone(), e.kind, e.caster, amount))
                }
                _ => None,
            })
            .collect();
        let (dots, hots): (Vec<_>, Vec<_>) =
            ticks.into_iter().partition(|(_, kind, _, _)| *kind == EffectKind::Dot);

        for (name, _, caster, amount) in dots {
            let amount = if self.participant(caster).has_passive(PassiveId::LingeringMalice) {
                (amount as f64 * LINGERING_MALICE_MULTIPLIER) as i64
            } else {
                amount
            };
            let lost = self.participant_mut(side).lose_hp(amount);
            let line = format!("{} takes {} damage from {}!", self.name(side), lost, name);
            self.narrate(line);
        }

        for (name, _, _, amount) in hots {
            let owner = self.participant(side);
            if owner.effects.is_heal_blocked() {
                continue;
            }
            let amount = if owner.is_debuff_specialist() {
                (amount as f64 * SPECIALIST_HEAL_FACTOR) as i64
            } else {
                amount
            };
            let healed = self.participant_mut(side).gain_hp(amount);
            let line = format!("{} recovers {} HP from {}!", self.name(side), healed, name);
            self.narrate(line);
        }
    }

    /// Turn-end passives, then hand the turn to the opponent.
    fn switch_turn(&mut self) {
        if self.phase == Phase::Finished {
            return;
        }
        let side = self.turn.current;
        self.fire(side, HookEvent::TurnEnd);
        if self.turn.advance() {
            let line = format!("--- Round {} ---", self.turn.round);
            self.narrate(line);
        }
        self.phase = Phase::TurnStart;
    }
}
