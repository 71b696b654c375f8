//! Aggregation rules for building a participant's base stat line.
//!
//! The builder layers contributions in a fixed order:
//! persisted base → agency modifiers → title boost → upgraded equipment → sub-stats.

use tracing::debug;

use super::{StatKind, Stats};
use crate::env::{ModifierOp, StatBoost, StatModifier};

/// Scales one equipment stat by the slot's upgrade level.
///
/// # Formula
///
/// ```text
/// crit stat,  v > 0:  v × (1 + 0.05·lvl)
/// other stat, v > 0:  trunc(v × (1 + 0.10·lvl))
/// other stat, v < 0:  min(0, v + trunc(lvl / 3))
/// crit stat,  v ≤ 0:  v
/// ```
pub fn scale_upgrade_value(kind: StatKind, value: f64, level: u32) -> f64 {
    let lvl = level as f64;
    match (kind.is_crit(), value > 0.0) {
        (true, true) => value * (1.0 + 0.05 * lvl),
        (false, true) => (value * (1.0 + 0.10 * lvl)).trunc(),
        (false, false) if value < 0.0 => (value + (level / 3) as f64).min(0.0),
        _ => value,
    }
}

/// Adds every recognised key of `boost` to `stats`, optionally scaled.
///
/// Unknown keys are skipped with a debug log.
pub fn apply_boost(stats: &mut Stats, boost: &StatBoost, upgrade_level: Option<u32>) {
    for (key, &value) in boost {
        let Ok(kind) = key.parse::<StatKind>() else {
            debug!(target: "combat::builder", stat = %key, "ignoring unknown stat key");
            continue;
        };
        let value = match upgrade_level {
            Some(level) => scale_upgrade_value(kind, value, level),
            None => value,
        };
        stats.add_raw(kind, value);
    }
}

/// Applies agency modifiers in declaration order.
pub fn apply_agency_modifiers(stats: &mut Stats, modifiers: &[StatModifier]) {
    for modifier in modifiers {
        let Ok(kind) = modifier.stat.parse::<StatKind>() else {
            debug!(target: "combat::builder", stat = %modifier.stat, "ignoring unknown agency stat");
            continue;
        };
        let current = stats.get(kind);
        let next = match modifier.op {
            ModifierOp::Add => current + modifier.value,
            ModifierOp::Multiply => current * modifier.value,
        };
        stats.set(kind, kind.normalize(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_scaling_rules() {
        assert_eq!(scale_upgrade_value(StatKind::Atk, 10.0, 3), 13.0);
        assert_eq!(scale_upgrade_value(StatKind::Atk, 7.0, 1), 7.0);
        assert_eq!(scale_upgrade_value(StatKind::Spd, -5.0, 6), -3.0);
        assert_eq!(scale_upgrade_value(StatKind::Spd, -1.0, 9), 0.0);
        assert!((scale_upgrade_value(StatKind::CritRate, 0.10, 2) - 0.11).abs() < 1e-9);
        assert_eq!(scale_upgrade_value(StatKind::CritDamage, -0.2, 5), -0.2);
    }

    #[test]
    fn agency_modifiers_apply_in_order() {
        let mut stats = Stats::new(100.0, 10.0, 5.0, 10.0);
        let mods = vec![
            StatModifier { stat: "hp".into(), op: ModifierOp::Add, value: 20.0 },
            StatModifier { stat: "hp".into(), op: ModifierOp::Multiply, value: 0.9 },
        ];
        apply_agency_modifiers(&mut stats, &mods);
        assert_eq!(stats.hp, 108.0);
    }

    #[test]
    fn boost_ignores_unknown_keys() {
        let mut stats = Stats::default();
        let mut boost = StatBoost::new();
        boost.insert("crit_dmg".into(), 0.25);
        boost.insert("charisma".into(), 99.0);
        apply_boost(&mut stats, &boost, None);
        assert!((stats.crit_damage - 1.75).abs() < 1e-9);
    }
}
