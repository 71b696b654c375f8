//! Damage requests and the pure magnitude formula.

// ============================================================================
// Damage Request
// ============================================================================

/// Parameters of one hit, built by skills and the basic attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRequest {
    /// Scales the attacker's atk. Ignored when `fixed` is set.
    pub multiplier: f64,
    /// Pre-computed damage that skips the formula (still mitigated by shields).
    pub fixed: Option<i64>,
    pub bonus_crit_rate: f64,
    pub bonus_crit_damage: f64,
    /// Fraction of the defender's def ignored.
    pub ignore_def: f64,
    pub force_crit: bool,
    pub bypass_evasion: bool,
    /// Retaliation hits never trigger another counter.
    pub is_counter: bool,
}

impl DamageRequest {
    pub const fn hit(multiplier: f64) -> Self {
        Self {
            multiplier,
            fixed: None,
            bonus_crit_rate: 0.0,
            bonus_crit_damage: 0.0,
            ignore_def: 0.0,
            force_crit: false,
            bypass_evasion: false,
            is_counter: false,
        }
    }

    pub const fn fixed(amount: i64) -> Self {
        let mut request = Self::hit(1.0);
        request.fixed = Some(amount);
        request
    }

    #[must_use]
    pub const fn ignore_def(mut self, fraction: f64) -> Self {
        self.ignore_def = fraction;
        self
    }

    #[must_use]
    pub const fn force_crit(mut self, force: bool) -> Self {
        self.force_crit = force;
        self
    }

    #[must_use]
    pub const fn bypass_evasion(mut self) -> Self {
        self.bypass_evasion = true;
        self
    }

    #[must_use]
    pub const fn bonus_crit_rate(mut self, bonus: f64) -> Self {
        self.bonus_crit_rate = bonus;
        self
    }

    #[must_use]
    pub const fn bonus_crit_damage(mut self, bonus: f64) -> Self {
        self.bonus_crit_damage = bonus;
        self
    }

    #[must_use]
    pub const fn counter(mut self) -> Self {
        self.is_counter = true;
        self
    }
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Inputs of the magnitude formula once all rolls are known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MitigationInput {
    pub atk: f64,
    pub multiplier: f64,
    pub crit: bool,
    pub crit_damage: f64,
    pub vulnerability: f64,
    pub def: f64,
    pub ignore_def: f64,
}

/// Calculate the damage of a non-fixed hit.
///
/// # Formula
///
/// ```text
/// raw   = atk × multiplier
/// raw  ×= crit_damage          (on crit)
/// raw  ×= 1 + vulnerability
/// dmg   = raw - def × (1 - ignore_def)
/// final = max(1, trunc(dmg))
/// ```
pub fn mitigated_damage(input: &MitigationInput) -> i64 {
    let mut raw = input.atk * input.multiplier;
    if input.crit {
        raw *= input.crit_damage;
    }
    raw *= 1.0 + input.vulnerability;
    let reduced = raw - input.def * (1.0 - input.ignore_def);
    (reduced.trunc() as i64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(atk: f64, def: f64) -> MitigationInput {
        MitigationInput {
            atk,
            multiplier: 1.0,
            crit: false,
            crit_damage: 1.5,
            vulnerability: 0.0,
            def,
            ignore_def: 0.0,
        }
    }

    #[test]
    fn flat_mitigation() {
        assert_eq!(mitigated_damage(&input(100.0, 20.0)), 80);
    }

    #[test]
    fn damage_floors_at_one() {
        assert_eq!(mitigated_damage(&input(10.0, 500.0)), 1);
    }

    #[test]
    fn crit_vulnerability_and_ignore_def() {
        let mut hit = input(100.0, 40.0);
        hit.crit = true;
        hit.vulnerability = 0.25;
        hit.ignore_def = 0.5;
        // 100 × 1.5 × 1.25 - 20
        assert_eq!(mitigated_damage(&hit), 167);
    }
}
