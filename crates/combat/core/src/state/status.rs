//! Timed status effects attached to a participant.

use strum::{Display, IntoStaticStr};

use super::Side;
use crate::stats::StatKind;

/// Effect kind. Decides how the engine treats the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKind {
    Buff,
    Debuff,
    Dot,
    Hot,
    Shield,
    Stun,
    Freeze,
    Paralyze,
    Silence,
    HealBlock,
    Counter,
    Reflect,
    Invincibility,
    Immunity,
    Taunt,
    Disarm,
    Summon,
    StatSwap,
    #[strum(to_string = "marker")]
    Marker(Marker),
}

/// Engine-internal markers consumed by specific pipeline steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Marker {
    /// Next damaging hit gains bonus crit damage, then the marker is consumed.
    EmpoweredStrike,
    /// Next basic attack stuns the target, then the marker is consumed.
    GuaranteedStun,
    /// Strikes the opponent at turn start.
    BlossomStrike,
    /// Actions targeting the owner fail.
    Untargetable,
}

/// Coarse grouping used by immunity, agency duration rules and debuff hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectCategory {
    Beneficial,
    Harmful,
    Neutral,
}

impl EffectKind {
    pub const fn category(self) -> EffectCategory {
        match self {
            Self::Buff
            | Self::Shield
            | Self::Hot
            | Self::Counter
            | Self::Reflect
            | Self::Invincibility
            | Self::Immunity => EffectCategory::Beneficial,
            Self::Debuff
            | Self::Dot
            | Self::Stun
            | Self::Freeze
            | Self::Paralyze
            | Self::Silence
            | Self::HealBlock => EffectCategory::Harmful,
            _ => EffectCategory::Neutral,
        }
    }

    pub const fn is_harmful(self) -> bool {
        matches!(self.category(), EffectCategory::Harmful)
    }

    pub const fn is_beneficial(self) -> bool {
        matches!(self.category(), EffectCategory::Beneficial)
    }

    /// Kinds a debuff-specialist caster lengthens by one turn. Freeze is not one.
    pub const fn extended_by_specialist(self) -> bool {
        matches!(
            self,
            Self::Debuff | Self::Stun | Self::Silence | Self::Paralyze | Self::HealBlock | Self::Dot
        )
    }

    /// Kinds that accumulate instances instead of refreshing by name.
    pub const fn stacks(self) -> bool {
        matches!(self, Self::Shield | Self::Hot | Self::Dot)
    }

    /// Kinds that cost the owner its action.
    pub const fn is_hard_control(self) -> bool {
        matches!(self, Self::Stun | Self::Freeze)
    }
}

/// Magnitude of a stat effect before resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatDelta {
    /// Fraction of the target's base stat (`0.30` = +30%).
    Percent(f64),
    /// Absolute amount.
    Flat(f64),
}

/// Kind-specific data carried by an effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectPayload {
    None,
    /// Resolved absolute delta already added to the owner's stats.
    Stat { stat: StatKind, delta: f64 },
    /// Damage (dot) or healing (hot) per owner turn.
    Periodic { amount: i64 },
    Shield { remaining: i64 },
    /// Probability that the owner's hits miss.
    MissChance(f64),
    /// Flat evasion added on top of speed-derived evasion.
    Evasion(f64),
    /// Extra damage fraction taken by the owner.
    Vulnerability(f64),
    /// Fraction of received damage returned to the attacker.
    Reflect(f64),
    /// Multiplier of a turn-start strike (summons, markers).
    Strike(f64),
    /// Attack and defense deltas applied by a stat swap.
    Swap { atk: f64, def: f64 },
}

/// A timed modifier on a participant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub name: String,
    pub kind: EffectKind,
    /// Remaining owner turns.
    pub duration: u32,
    pub caster: Side,
    pub payload: EffectPayload,
}

impl StatusEffect {
    /// Stat delta to revert when the effect leaves, if any.
    pub fn stat_delta(&self) -> Option<(StatKind, f64)> {
        match self.payload {
            EffectPayload::Stat { stat, delta } => Some((stat, delta)),
            _ => None,
        }
    }

    pub fn is_marker(&self, marker: Marker) -> bool {
        self.kind == EffectKind::Marker(marker)
    }
}

/// Request to apply an effect, before agency rules and stat resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectSpec {
    pub name: String,
    pub kind: EffectKind,
    pub duration: u32,
    pub stat: Option<(StatKind, StatDelta)>,
    pub payload: EffectPayload,
}

impl EffectSpec {
    pub fn new(name: impl Into<String>, kind: EffectKind, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            duration,
            stat: None,
            payload: EffectPayload::None,
        }
    }

    pub fn buff(name: impl Into<String>, duration: u32, stat: StatKind, delta: StatDelta) -> Self {
        Self::new(name, EffectKind::Buff, duration).stat(stat, delta)
    }

    pub fn debuff(name: impl Into<String>, duration: u32, stat: StatKind, delta: StatDelta) -> Self {
        Self::new(name, EffectKind::Debuff, duration).stat(stat, delta)
    }

    pub fn dot(name: impl Into<String>, duration: u32, amount: i64) -> Self {
        Self::new(name, EffectKind::Dot, duration).payload(EffectPayload::Periodic { amount })
    }

    pub fn hot(name: impl Into<String>, duration: u32, amount: i64) -> Self {
        Self::new(name, EffectKind::Hot, duration).payload(EffectPayload::Periodic { amount })
    }

    pub fn shield(name: impl Into<String>, duration: u32, amount: i64) -> Self {
        Self::new(name, EffectKind::Shield, duration)
            .payload(EffectPayload::Shield { remaining: amount })
    }

    pub fn marker(name: impl Into<String>, marker: Marker, duration: u32) -> Self {
        Self::new(name, EffectKind::Marker(marker), duration)
    }

    #[must_use]
    pub fn stat(mut self, stat: StatKind, delta: StatDelta) -> Self {
        self.stat = Some((stat, delta));
        self
    }

    #[must_use]
    pub fn payload(mut self, payload: EffectPayload) -> Self {
        self.payload = payload;
        self
    }
}

/// Ordered collection of a participant's effects.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.iter_mut()
    }

    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn has_kind(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn has_marker(&self, marker: Marker) -> bool {
        self.has_kind(EffectKind::Marker(marker))
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    pub fn find_named_mut(&mut self, name: &str) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.name == name)
    }

    pub fn is_heal_blocked(&self) -> bool {
        self.has_kind(EffectKind::HealBlock)
    }

    pub fn has_shield(&self) -> bool {
        self.has_kind(EffectKind::Shield)
    }

    pub fn miss_chance(&self) -> Option<f64> {
        self.effects.iter().find_map(|e| match e.payload {
            EffectPayload::MissChance(p) => Some(p),
            _ => None,
        })
    }

    pub fn evasion_bonus(&self) -> f64 {
        self.effects
            .iter()
            .find_map(|e| match e.payload {
                EffectPayload::Evasion(p) => Some(p),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    pub fn vulnerability(&self) -> Option<f64> {
        self.effects.iter().find_map(|e| match e.payload {
            EffectPayload::Vulnerability(p) => Some(p),
            _ => None,
        })
    }

    pub fn reflect(&self) -> Option<f64> {
        self.effects.iter().find_map(|e| match e.payload {
            EffectPayload::Reflect(p) => Some(p),
            _ => None,
        })
    }

    /// True if some stat effect lowers `stat`.
    pub fn lowers(&self, stat: StatKind) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e.payload, EffectPayload::Stat { stat: s, delta } if s == stat && delta < 0.0))
    }

    /// Removes and returns every effect matching `pred`, preserving order.
    pub fn extract(&mut self, mut pred: impl FnMut(&StatusEffect) -> bool) -> Vec<StatusEffect> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.effects.len());
        for effect in self.effects.drain(..) {
            if pred(&effect) {
                removed.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;
        removed
    }

    /// Removes and returns the first effect matching `pred`.
    pub fn take_first(&mut self, pred: impl FnMut(&StatusEffect) -> bool) -> Option<StatusEffect> {
        let index = self.effects.iter().position(pred)?;
        Some(self.effects.remove(index))
    }

    /// Absorbs `amount` with shields in order, dropping exhausted shields.
    ///
    /// Returns the damage left after absorption.
    pub fn absorb(&mut self, mut amount: i64) -> i64 {
        for effect in self.effects.iter_mut() {
            if amount <= 0 {
                break;
            }
            if let EffectPayload::Shield { remaining } = &mut effect.payload {
                let absorbed = (*remaining).min(amount);
                *remaining -= absorbed;
                amount -= absorbed;
            }
        }
        self.effects
            .retain(|e| !matches!(e.payload, EffectPayload::Shield { remaining } if remaining <= 0));
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shield(amount: i64) -> StatusEffect {
        StatusEffect {
            name: "Shield".into(),
            kind: EffectKind::Shield,
            duration: 3,
            caster: Side::P1,
            payload: EffectPayload::Shield { remaining: amount },
        }
    }

    #[test]
    fn shields_absorb_in_order_and_drop_when_empty() {
        let mut effects = StatusEffects::new();
        effects.push(shield(10));
        effects.push(shield(30));
        let left = effects.absorb(25);
        assert_eq!(left, 0);
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            effects.iter().next().map(|e| e.payload),
            Some(EffectPayload::Shield { remaining: 15 })
        ));
        assert_eq!(effects.absorb(40), 25);
        assert!(effects.is_empty());
    }

    #[test]
    fn categories() {
        assert!(EffectKind::Freeze.is_harmful());
        assert!(!EffectKind::Freeze.extended_by_specialist());
        assert!(EffectKind::HealBlock.extended_by_specialist());
        assert!(!EffectKind::Buff.extended_by_specialist());
        assert!(EffectKind::Immunity.is_beneficial());
        assert_eq!(EffectKind::Taunt.category(), EffectCategory::Neutral);
        assert!(EffectKind::Dot.stacks());
        assert!(!EffectKind::Buff.stacks());
    }
}
