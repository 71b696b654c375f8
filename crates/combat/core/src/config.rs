/// Combat tuning constants and runtime-tunable parameters.
///
/// Defaults reproduce the live balance. Hosts may override them from TOML
/// through `combat-content`'s `ConfigLoader`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Upper bound for the total evasion chance.
    pub evasion_cap: f64,
    /// Speed at which speed-derived evasion reaches half of its maximum.
    pub evasion_scaling: f64,
    /// Asymptotic evasion granted by speed alone.
    pub evasion_from_speed: f64,
    /// Multiplier of the single retaliation hit granted by a counter effect.
    pub counter_multiplier: f64,
    /// Cooldown applied when a skill declaration omits one.
    pub default_cooldown: u32,
    /// Probability that the AI uses a ready skill instead of a basic attack.
    pub ai_skill_chance: f64,
    /// Probability that a paralyzed participant loses its action.
    pub paralyze_skip_chance: f64,
    /// Bonus crit damage granted by an empowered-strike marker.
    pub empowered_crit_bonus: f64,
}

impl CombatConfig {
    // ===== compile-time constants =====
    /// Maximum participants in one encounter.
    pub const MAX_PARTICIPANTS: usize = 2;
    /// Duration used for "permanent" effects (stacking passives, auras).
    pub const PERSISTENT_DURATION: u32 = 99;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_EVASION_CAP: f64 = 0.80;
    pub const DEFAULT_EVASION_SCALING: f64 = 200.0;
    pub const DEFAULT_EVASION_FROM_SPEED: f64 = 0.70;
    pub const DEFAULT_COUNTER_MULTIPLIER: f64 = 0.75;
    pub const DEFAULT_COOLDOWN: u32 = 3;
    pub const DEFAULT_AI_SKILL_CHANCE: f64 = 0.70;
    pub const DEFAULT_PARALYZE_SKIP_CHANCE: f64 = 0.50;
    pub const DEFAULT_EMPOWERED_CRIT_BONUS: f64 = 0.50;

    pub const fn new() -> Self {
        Self {
            evasion_cap: Self::DEFAULT_EVASION_CAP,
            evasion_scaling: Self::DEFAULT_EVASION_SCALING,
            evasion_from_speed: Self::DEFAULT_EVASION_FROM_SPEED,
            counter_multiplier: Self::DEFAULT_COUNTER_MULTIPLIER,
            default_cooldown: Self::DEFAULT_COOLDOWN,
            ai_skill_chance: Self::DEFAULT_AI_SKILL_CHANCE,
            paralyze_skip_chance: Self::DEFAULT_PARALYZE_SKIP_CHANCE,
            empowered_crit_bonus: Self::DEFAULT_EMPOWERED_CRIT_BONUS,
        }
    }

    pub const fn with_ai_skill_chance(mut self, chance: f64) -> Self {
        self.ai_skill_chance = chance;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
