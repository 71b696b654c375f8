/// Per-battle bookkeeping for passives.
///
/// One-shot flags guard effects that may fire at most once per battle;
/// counters drive stacking and every-Nth-trigger passives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassiveState {
    // ===== one-shot revivals =====
    pub phoenix_used: bool,
    pub extra_life_used: bool,
    pub unbroken_threads_used: bool,

    // ===== one-shot recoveries =====
    pub archipelago_used: bool,
    pub unyielding_heart_used: bool,
    pub final_prayer_used: bool,

    /// Set while Sanguine Pact is spent; cleared once hp recovers.
    pub sanguine_latched: bool,
    /// Next support skill is enhanced by a preceding damage skill.
    pub enhance_support: bool,

    // ===== counters =====
    pub sonnet_stacks: u32,
    pub pack_stacks: u32,
    pub eternal_stacks: u32,
    pub confection_turns: u32,
    pub twins_attacks: u32,
    pub cuts_landed: u32,
}

impl PassiveState {
    pub const MAX_SONNET_STACKS: u32 = 5;
    pub const MAX_ETERNAL_STACKS: u32 = 10;
}
