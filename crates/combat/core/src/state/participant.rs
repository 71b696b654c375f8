use crate::env::{AgencyDefinition, PlayerId, RewardTable};
use crate::passives::PassiveId;
use crate::skills::SkillId;
use crate::stats::Stats;

use super::{PassiveState, StatusEffects};

/// Position of a participant in the encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    pub const fn opponent(self) -> Self {
        match self {
            Self::P1 => Self::P2,
            Self::P2 => Self::P1,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::P1 => "p1",
            Self::P2 => "p2",
        })
    }
}

/// Resolution target of a declared active skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillRef {
    Active(SkillId),
    /// Declared by content but without a resolver.
    Unknown,
}

/// One active skill with its cooldown state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSlot {
    pub name: String,
    pub skill: SkillRef,
    /// Turns the skill stays unavailable after use.
    pub cooldown: u32,
    /// Turns left before the skill is ready.
    pub remaining: u32,
}

impl SkillSlot {
    pub fn new(name: impl Into<String>, cooldown: u32) -> Self {
        let name = name.into();
        let skill = name
            .parse::<SkillId>()
            .map(SkillRef::Active)
            .unwrap_or(SkillRef::Unknown);
        Self {
            name,
            skill,
            cooldown,
            remaining: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }
}

/// One side of an encounter with its battle-time state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub player_id: Option<PlayerId>,
    pub name: String,
    pub is_player: bool,
    pub agency: Option<AgencyDefinition>,
    /// Current stats, mutated by effects.
    pub stats: Stats,
    /// Aggregate frozen at battle start. Percentage effects resolve against it.
    base_stats: Stats,
    hp: i64,
    max_hp: i64,
    pub effects: StatusEffects,
    pub skills: Vec<SkillSlot>,
    pub passives: Vec<PassiveId>,
    pub passive: PassiveState,
    /// Monster reward ranges, absent for players.
    pub rewards: Option<RewardTable>,
}

impl Participant {
    /// Creates a participant whose base stats and hp derive from `stats`.
    pub fn new(name: impl Into<String>, stats: Stats) -> Self {
        let max_hp = (stats.hp.trunc() as i64).max(1);
        Self {
            player_id: None,
            name: name.into(),
            is_player: false,
            agency: None,
            stats,
            base_stats: stats,
            hp: max_hp,
            max_hp,
            effects: StatusEffects::new(),
            skills: Vec::new(),
            passives: Vec::new(),
            passive: PassiveState::default(),
            rewards: None,
        }
    }

    #[must_use]
    pub fn with_player(mut self, id: PlayerId) -> Self {
        self.player_id = Some(id);
        self.is_player = true;
        self
    }

    #[must_use]
    pub fn with_agency(mut self, agency: AgencyDefinition) -> Self {
        self.agency = Some(agency);
        self
    }

    #[must_use]
    pub fn with_skill(mut self, name: impl Into<String>, cooldown: u32) -> Self {
        self.skills.push(SkillSlot::new(name, cooldown));
        self
    }

    #[must_use]
    pub fn with_passive(mut self, passive: PassiveId) -> Self {
        self.passives.push(passive);
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = Some(rewards);
        self
    }

    pub fn base_stats(&self) -> &Stats {
        &self.base_stats
    }

    pub fn hp(&self) -> i64 {
        self.hp
    }

    pub fn max_hp(&self) -> i64 {
        self.max_hp
    }

    pub fn hp_ratio(&self) -> f64 {
        self.hp as f64 / self.max_hp as f64
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }

    /// Sets hp, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: i64) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Removes up to `amount` hp. Returns the hp actually lost.
    pub fn lose_hp(&mut self, amount: i64) -> i64 {
        let before = self.hp;
        self.set_hp(self.hp - amount.max(0));
        before - self.hp
    }

    /// Restores up to `amount` hp. Returns the hp actually gained.
    pub fn gain_hp(&mut self, amount: i64) -> i64 {
        let before = self.hp;
        self.set_hp(self.hp + amount.max(0));
        self.hp - before
    }

    /// `trunc(max_hp × fraction)`.
    pub fn max_hp_fraction(&self, fraction: f64) -> i64 {
        (self.max_hp as f64 * fraction) as i64
    }

    pub fn has_passive(&self, passive: PassiveId) -> bool {
        self.passives.contains(&passive)
    }

    pub fn is_debuff_specialist(&self) -> bool {
        self.agency.as_ref().is_some_and(|a| a.debuff_specialist)
    }

    pub fn skill(&self, name: &str) -> Option<&SkillSlot> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn skill_mut(&mut self, name: &str) -> Option<&mut SkillSlot> {
        self.skills.iter_mut().find(|s| s.name == name)
    }

    pub fn ready_skills(&self) -> impl Iterator<Item = &SkillSlot> {
        self.skills.iter().filter(|s| s.is_ready())
    }

    /// Decrements every cooldown by `turns`, flooring at zero.
    pub fn tick_cooldowns(&mut self, turns: u32) {
        for slot in &mut self.skills {
            slot.remaining = slot.remaining.saturating_sub(turns);
        }
    }

    /// Adds `turns` to every cooldown, including ready skills.
    pub fn delay_cooldowns(&mut self, turns: u32) {
        for slot in &mut self.skills {
            slot.remaining += turns;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hp_stays_within_bounds() {
        let mut p = Participant::new("Tester", Stats::new(50.0, 10.0, 5.0, 10.0));
        assert_eq!(p.lose_hp(80), 50);
        assert_eq!(p.hp(), 0);
        assert_eq!(p.gain_hp(500), 50);
        assert_eq!(p.hp(), 50);
        p.set_hp(-3);
        assert_eq!(p.hp(), 0);
    }

    #[test]
    fn unknown_skill_names_are_kept_as_gaps() {
        let slot = SkillSlot::new("Forbidden Technique", 3);
        assert_eq!(slot.skill, SkillRef::Unknown);
        let slot = SkillSlot::new("Heavy Blow", 3);
        assert_eq!(slot.skill, SkillRef::Active(SkillId::HeavyBlow));
    }

    #[test]
    fn cooldowns_floor_at_zero() {
        let mut p = Participant::new("Tester", Stats::default()).with_skill("Heavy Blow", 3);
        p.skills[0].remaining = 1;
        p.tick_cooldowns(2);
        assert!(p.skills[0].is_ready());
    }
}
