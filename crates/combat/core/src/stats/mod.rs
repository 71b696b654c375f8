//! Battle-time stat lines.
//!
//! All stats are stored as `f64`. The integral stats (hp, atk, def, spd)
//! only ever receive truncated deltas, so they stay whole numbers for the
//! whole battle; crit stats and lifesteal are fractional.

pub mod bonus;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use bonus::{apply_agency_modifiers, apply_boost, scale_upgrade_value};

/// Identifier of a single stat.
///
/// Parses the catalog keys, including the `crit_dmg` alias.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKind {
    Hp,
    Atk,
    Def,
    Spd,
    CritRate,
    #[strum(serialize = "crit_damage", serialize = "crit_dmg")]
    CritDamage,
    Lifesteal,
}

impl StatKind {
    /// Stats whose deltas truncate toward zero.
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Hp | Self::Atk | Self::Def | Self::Spd)
    }

    /// Crit stats scale gently with equipment upgrades.
    pub const fn is_crit(self) -> bool {
        matches!(self, Self::CritRate | Self::CritDamage)
    }

    /// Rounds a raw delta the way effects store it.
    pub fn normalize(self, delta: f64) -> f64 {
        if self.is_integral() { delta.trunc() } else { delta }
    }
}

/// A full stat line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub lifesteal: f64,
}

impl Stats {
    pub const fn new(hp: f64, atk: f64, def: f64, spd: f64) -> Self {
        Self {
            hp,
            atk,
            def,
            spd,
            crit_rate: 0.05,
            crit_damage: 1.5,
            lifesteal: 0.0,
        }
    }

    pub fn get(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::Hp => self.hp,
            StatKind::Atk => self.atk,
            StatKind::Def => self.def,
            StatKind::Spd => self.spd,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
            StatKind::Lifesteal => self.lifesteal,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut f64 {
        match kind {
            StatKind::Hp => &mut self.hp,
            StatKind::Atk => &mut self.atk,
            StatKind::Def => &mut self.def,
            StatKind::Spd => &mut self.spd,
            StatKind::CritRate => &mut self.crit_rate,
            StatKind::CritDamage => &mut self.crit_damage,
            StatKind::Lifesteal => &mut self.lifesteal,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: f64) {
        *self.get_mut(kind) = value;
    }

    /// Adds `delta` without clamping. Used while aggregating base stats.
    pub fn add_raw(&mut self, kind: StatKind, delta: f64) {
        *self.get_mut(kind) += delta;
    }

    /// Adds `delta` and clamps the result at zero. Used by battle-time effects.
    pub fn add_clamped(&mut self, kind: StatKind, delta: f64) {
        let slot = self.get_mut(kind);
        *slot = (*slot + delta).max(0.0);
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new(100.0, 10.0, 5.0, 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_keys_and_alias() {
        assert_eq!("atk".parse::<StatKind>(), Ok(StatKind::Atk));
        assert_eq!("crit_dmg".parse::<StatKind>(), Ok(StatKind::CritDamage));
        assert_eq!("crit_damage".parse::<StatKind>(), Ok(StatKind::CritDamage));
        assert!("luck".parse::<StatKind>().is_err());
    }

    #[test]
    fn clamped_add_never_goes_negative() {
        let mut stats = Stats::default();
        stats.add_clamped(StatKind::Def, -50.0);
        assert_eq!(stats.def, 0.0);
    }

    #[test]
    fn integral_stats_truncate() {
        assert_eq!(StatKind::Atk.normalize(12.9), 12.0);
        assert_eq!(StatKind::Atk.normalize(-12.9), -12.0);
        assert!((StatKind::CritRate.normalize(0.25) - 0.25).abs() < f64::EPSILON);
    }
}
