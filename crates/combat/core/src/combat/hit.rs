//! Evasion calculations.

use crate::config::CombatConfig;

/// Calculate a defender's evasion chance.
///
/// # Formula
///
/// ```text
/// from_speed = spd / (spd + scaling) × from_speed_max
/// evasion    = min(from_speed + passive_bonus + buff_bonus, cap)
/// ```
///
/// # Returns
///
/// Probability in `[0, cap]` that an incoming hit is evaded.
pub fn evasion_chance(spd: f64, passive_bonus: f64, buff_bonus: f64, config: &CombatConfig) -> f64 {
    let spd = spd.max(0.0);
    let from_speed = if spd + config.evasion_scaling > 0.0 {
        spd / (spd + config.evasion_scaling) * config.evasion_from_speed
    } else {
        0.0
    };
    (from_speed + passive_bonus + buff_bonus).clamp(0.0, config.evasion_cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_two_hundred_gives_thirty_five_percent() {
        let chance = evasion_chance(200.0, 0.0, 0.0, &CombatConfig::default());
        assert!((chance - 0.35).abs() < 1e-9);
    }

    #[test]
    fn evasion_is_monotonic_and_capped() {
        let config = CombatConfig::default();
        let mut last = 0.0;
        for spd in (0..5000).step_by(50) {
            let chance = evasion_chance(spd as f64, 0.10, 0.35, &config);
            assert!(chance >= last);
            assert!(chance <= 0.80);
            last = chance;
        }
        assert!((last - 0.80).abs() < 1e-9);
    }
}
