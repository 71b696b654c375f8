//! Damage resolution pipeline.

use tracing::debug;

use super::{CombatSession, HookEvent};
use crate::combat::{
    DamageOutcome, DamageRequest, HitKind, MitigationInput, evasion_chance, mitigated_damage,
};
use crate::outcome::TelemetryEvent;
use crate::passives::PassiveId;
use crate::state::{EffectKind, Marker, Side};

const KEEN_SENSES_EVASION: f64 = 0.10;
const CORNERED_FURY_THRESHOLD: f64 = 0.30;
const CORNERED_FURY_MULTIPLIER: f64 = 1.15;
const GHOSTLY_RAGE_MULTIPLIER: f64 = 1.5;

impl CombatSession {
    /// Resolves one hit from `attacker` onto `defender`.
    ///
    /// # Pipeline
    ///
    /// 1. blindness on the attacker may make it miss
    /// 2. invincibility on the defender negates the hit
    /// 3. evasion roll unless bypassed
    /// 4. an empowered-strike marker is consumed for bonus crit damage
    /// 5. magnitude: fixed, or the mitigation formula with a crit roll
    /// 6. shields absorb first
    /// 7. attacker lifesteal on the full amount unless heal-blocked
    /// 8. the remainder reduces defender hp
    /// 9. counter (depth 1) and reflect strike back
    /// 10. crit, dealt and taken hooks fire
    pub fn apply_damage(
        &mut self,
        attacker: Side,
        defender: Side,
        request: DamageRequest,
    ) -> DamageOutcome {
        if let Some(miss) = self.participant(attacker).effects.miss_chance()
            && self.dice().chance(miss)
        {
            let line = format!("{}'s attack misses!", self.name(attacker));
            self.narrate(line);
            return DamageOutcome::avoided(HitKind::Missed);
        }

        if self
            .participant(defender)
            .effects
            .has_kind(EffectKind::Invincibility)
        {
            let line = format!("{} is invincible and takes no damage!", self.name(defender));
            self.narrate(line);
            return DamageOutcome::avoided(HitKind::Negated);
        }

        if !request.bypass_evasion {
            let target = self.participant(defender);
            let passive_bonus = if target.has_passive(PassiveId::KeenSenses) {
                KEEN_SENSES_EVASION
            } else {
                0.0
            };
            let chance = evasion_chance(
                target.stats.spd,
                passive_bonus,
                target.effects.evasion_bonus(),
                &self.config,
            );
            if self.dice().chance(chance) {
                let line = format!("{} evaded the attack!", self.name(defender));
                self.narrate(line);
                return DamageOutcome::avoided(HitKind::Evaded);
            }
        }

        let mut bonus_crit_damage = request.bonus_crit_damage;
        if self
            .remove_first_effect(attacker, |e| e.is_marker(Marker::EmpoweredStrike))
            .is_some()
        {
            bonus_crit_damage += self.config.empowered_crit_bonus;
        }

        let (amount, crit) = match request.fixed {
            Some(fixed) => (fixed.max(0), false),
            None => {
                let source = self.participant(attacker);
                let crit_rate = source.stats.crit_rate + request.bonus_crit_rate;
                let crit = request.force_crit || self.dice().chance(crit_rate);
                let multiplier = request.multiplier * self.rage_multiplier(attacker, &request);
                let source = self.participant(attacker);
                let target = self.participant(defender);
                let input = MitigationInput {
                    atk: self.effective_atk(attacker),
                    multiplier,
                    crit,
                    crit_damage: source.stats.crit_damage + bonus_crit_damage,
                    vulnerability: target.effects.vulnerability().unwrap_or(0.0),
                    def: target.stats.def,
                    ignore_def: request.ignore_def,
                };
                (mitigated_damage(&input), crit)
            }
        };

        let remaining = self.participant_mut(defender).effects.absorb(amount);

        let source = self.participant(attacker);
        if amount > 0 && source.stats.lifesteal > 0.0 && !source.effects.is_heal_blocked() {
            let stolen = (amount as f64 * source.stats.lifesteal) as i64;
            self.participant_mut(attacker).gain_hp(stolen);
        }

        self.participant_mut(defender).lose_hp(remaining);

        debug!(
            target: "combat::damage",
            attacker = %attacker,
            defender = %defender,
            amount,
            absorbed = amount - remaining,
            crit,
            counter = request.is_counter,
            "hit resolved"
        );

        // Counter and reflect answer the mitigated hit, shields included.
        if amount > 0 && !request.is_counter {
            if self
                .participant(defender)
                .effects
                .has_kind(EffectKind::Counter)
            {
                let multiplier = self.config.counter_multiplier;
                let counter =
                    self.apply_damage(defender, attacker, DamageRequest::hit(multiplier).counter());
                let line = format!(
                    "{} counters for {} damage!",
                    self.name(defender),
                    counter.amount
                );
                self.narrate(line);
            }
            if let Some(pct) = self.participant(defender).effects.reflect() {
                let reflected = (amount as f64 * pct) as i64;
                if reflected > 0 {
                    self.participant_mut(attacker).lose_hp(reflected);
                    let line = format!(
                        "{} reflects {} damage back to {}!",
                        self.name(defender),
                        reflected,
                        self.name(attacker)
                    );
                    self.narrate(line);
                }
            }
        }

        if crit {
            if let Some(player) = self.participant(attacker).player_id {
                self.emit(TelemetryEvent::CritLanded { player });
            }
            self.fire(attacker, HookEvent::CritLanded { target: defender });
        }
        self.fire(
            attacker,
            HookEvent::DamageDealt {
                target: defender,
                amount,
            },
        );
        self.fire(
            defender,
            HookEvent::DamageTaken {
                attacker,
                amount: remaining,
            },
        );

        DamageOutcome {
            amount,
            crit,
            kind: HitKind::Landed,
        }
    }

    /// Attack used by the formula, including Cornered Fury.
    fn effective_atk(&self, side: Side) -> f64 {
        let source = self.participant(side);
        if source.has_passive(PassiveId::CorneredFury) && source.hp_ratio() < CORNERED_FURY_THRESHOLD
        {
            (source.stats.atk * CORNERED_FURY_MULTIPLIER).trunc()
        } else {
            source.stats.atk
        }
    }

    /// Ghostly Rage: the owner's own hits on every fourth global turn.
    fn rage_multiplier(&mut self, attacker: Side, request: &DamageRequest) -> f64 {
        let turn_count = self.turn.turn_count;
        let source = self.participant(attacker);
        if source.has_passive(PassiveId::GhostlyRage)
            && !request.is_counter
            && self.turn.current == attacker
            && turn_count > 0
            && (turn_count - 1) % 4 == 0
        {
            let line = format!("{}'s Ghostly Rage flares!", source.name);
            self.narrate(line);
            GHOSTLY_RAGE_MULTIPLIER
        } else {
            1.0
        }
    }
}
