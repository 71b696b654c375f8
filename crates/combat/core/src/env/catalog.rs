//! Static content consulted when building participants.
//!
//! The engine never loads content itself. Hosts implement [`CatalogOracle`]
//! (see `combat-content`'s `Catalog`) and hand it to the participant builder.

use std::collections::BTreeMap;

/// Raw stat contributions keyed by stat name (`"atk"`, `"crit_dmg"`, ...).
///
/// Keys are parsed with [`StatKind`](crate::stats::StatKind); unknown keys
/// are ignored by the builder.
pub type StatBoost = BTreeMap<String, f64>;

/// Oracle providing read-only catalog lookups.
///
/// Every lookup returns `None` for unknown ids; callers treat that as a
/// data gap and fall back to neutral values.
pub trait CatalogOracle: Send + Sync {
    fn title(&self, id: &str) -> Option<&TitleDefinition>;

    fn monster_title(&self, id: &str) -> Option<&TitleDefinition>;

    fn item(&self, id: &str) -> Option<&ItemDefinition>;

    fn agency(&self, id: &str) -> Option<&AgencyDefinition>;

    fn monster(&self, id: &str) -> Option<&MonsterDefinition>;
}

/// Empty catalog: every lookup is a data gap.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyCatalog;

impl CatalogOracle for EmptyCatalog {
    fn title(&self, _id: &str) -> Option<&TitleDefinition> {
        None
    }

    fn monster_title(&self, _id: &str) -> Option<&TitleDefinition> {
        None
    }

    fn item(&self, _id: &str) -> Option<&ItemDefinition> {
        None
    }

    fn agency(&self, _id: &str) -> Option<&AgencyDefinition> {
        None
    }

    fn monster(&self, _id: &str) -> Option<&MonsterDefinition> {
        None
    }
}

// ============================================================================
// Titles and skills
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillKind {
    Active,
    Passive,
}

/// A skill as declared by a title.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDecl {
    pub name: String,
    pub kind: SkillKind,
    /// Turns before the skill is ready again. `None` uses the configured default.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: Option<u32>,
}

impl SkillDecl {
    pub fn active(name: impl Into<String>, cooldown: u32) -> Self {
        Self {
            name: name.into(),
            kind: SkillKind::Active,
            cooldown: Some(cooldown),
        }
    }

    pub fn passive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SkillKind::Passive,
            cooldown: None,
        }
    }
}

/// An equippable title (players) or monster title.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TitleDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_boost: StatBoost,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillDecl>,
}

// ============================================================================
// Items
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_boost: StatBoost,
}

// ============================================================================
// Agencies
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModifierOp {
    Add,
    Multiply,
}

/// One agency stat adjustment, applied to base stats in declaration order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: String,
    pub op: ModifierOp,
    pub value: f64,
}

/// Affiliation profile carried by players.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgencyDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat_modifiers: Vec<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default = "unit_multiplier"))]
    pub exp_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default = "unit_multiplier"))]
    pub prisma_multiplier: f64,
    /// Lengthens harmful effects it casts, shortens and dampens beneficial
    /// effects it receives, and weakens its own heals.
    #[cfg_attr(feature = "serde", serde(default))]
    pub debuff_specialist: bool,
}

#[cfg(feature = "serde")]
fn unit_multiplier() -> f64 {
    1.0
}

impl AgencyDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stat_modifiers: Vec::new(),
            exp_multiplier: 1.0,
            prisma_multiplier: 1.0,
            debuff_specialist: false,
        }
    }
}

// ============================================================================
// Monsters
// ============================================================================

/// Inclusive `[min, max]` range rolled on victory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRange {
    pub min: u32,
    pub max: u32,
}

impl RewardRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTable {
    pub exp: RewardRange,
    pub prisma: RewardRange,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterDefinition {
    pub id: String,
    pub name: String,
    pub stats: BaseStatLine,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: RewardTable,
}

// ============================================================================
// Player persistence
// ============================================================================

/// Persisted base stats before any battle-time aggregation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseStatLine {
    pub hp: f64,
    pub atk: f64,
    pub def: f64,
    pub spd: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
}

impl BaseStatLine {
    pub const DEFAULT_CRIT_RATE: f64 = 0.05;
    pub const DEFAULT_CRIT_DAMAGE: f64 = 1.5;

    pub const fn new(hp: f64, atk: f64, def: f64, spd: f64) -> Self {
        Self {
            hp,
            atk,
            def,
            spd,
            crit_rate: Self::DEFAULT_CRIT_RATE,
            crit_damage: Self::DEFAULT_CRIT_DAMAGE,
        }
    }
}

impl Default for BaseStatLine {
    fn default() -> Self {
        Self::new(100.0, 10.0, 5.0, 10.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upgrade state of one equipment slot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotUpgrade {
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    /// Rolled sub-stats, added without upgrade scaling.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonus_stats: StatBoost,
}

/// Read-only view of a persisted player, supplied by the host.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub player_id: PlayerId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: BaseStatLine,
    /// Slot name to item id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: BTreeMap<String, String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upgrades: BTreeMap<String, SlotUpgrade>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub title_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub agency_id: Option<String>,
}

impl PlayerSnapshot {
    pub fn new(player_id: u64, name: impl Into<String>) -> Self {
        Self {
            player_id: PlayerId(player_id),
            name: name.into(),
            level: 1,
            base: BaseStatLine::default(),
            equipment: BTreeMap::new(),
            upgrades: BTreeMap::new(),
            title_id: None,
            agency_id: None,
        }
    }
}
