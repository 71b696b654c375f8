//! Passive skill library.
//!
//! Passives are never invoked directly. Each [`PassiveId`] declares the
//! hook points it listens on; the session's [`HookBus`](crate::engine::HookBus)
//! registers them at build time and [`trigger`] dispatches every fired
//! event to the handler group of its hook point.
//!
//! A few passives only modify a pipeline step (evasion, attack, healing,
//! dot ticks). They declare no hook points and the pipeline checks for them
//! by id.

mod defeat;
mod lifecycle;
mod offensive;
mod reactive;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::trace;

use crate::engine::{CombatSession, HookEvent, HookPoints};
use crate::state::Side;

/// Every passive the engine can resolve, keyed by its catalog name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "title_case")]
pub enum PassiveId {
    // ===== battle start =====
    AncestorsSight,
    HauntingPresence,
    FirewallProtocol,
    MasterTactician,

    // ===== turn start =====
    OceansLullaby,
    PerfectConfection,
    SanguinePact,
    #[strum(to_string = "Whims of Fortune")]
    WhimsOfFortune,
    GravePact,
    ForestsBreath,
    DarkHonor,
    ImmortalBlade,
    EternalPower,
    WrittenFate,

    // ===== turn end =====
    PerfectSymmetry,

    // ===== damage =====
    SoulSiphon,
    ArchipelagosBlessing,
    StonewillResilience,
    UnyieldingHeart,
    VolatileEncryption,
    RimefrostAura,
    ToxicBody,
    ThornyGarden,
    RetributionAura,
    #[strum(to_string = "Body of Fire")]
    BodyOfFire,
    FinalPrayer,

    // ===== critical hits =====
    StaticResonance,
    #[strum(to_string = "Spirit of the Pack")]
    SpiritOfThePack,
    BloodFrenzy,

    // ===== debuffs =====
    ResoluteGuardian,
    WardensGrace,
    BoundSoul,
    #[strum(to_string = "Master of Puppets")]
    MasterOfPuppets,

    // ===== skills and attacks =====
    ArcaneEcho,
    FeatheredSonnet,
    SpellthiefsGleam,
    #[strum(to_string = "Dance of a Thousand Cuts")]
    DanceOfAThousandCuts,
    TwinsHarmony,
    EagerHeart,
    WintersEmbrace,

    // ===== defeat =====
    RagingPhoenix,
    ExtraLife,
    UnbrokenThreads,
    #[strum(to_string = "Encore of Shadows")]
    EncoreOfShadows,
    FinalVengeance,

    // ===== pipeline modifiers =====
    KeenSenses,
    CorneredFury,
    SteadfastFaith,
    LingeringMalice,
    GhostlyRage,
    /// Driven by Blazing Finale and Solar Overture.
    HarmoniousResonance,
}

impl PassiveId {
    /// Hook points this passive listens on.
    pub const fn hooks(self) -> HookPoints {
        use PassiveId::*;
        match self {
            AncestorsSight | HauntingPresence | FirewallProtocol | MasterTactician => {
                HookPoints::BATTLE_START
            }
            OceansLullaby | PerfectConfection | SanguinePact | WhimsOfFortune | GravePact
            | ForestsBreath | DarkHonor | ImmortalBlade | EternalPower | WrittenFate => {
                HookPoints::TURN_START
            }
            PerfectSymmetry => HookPoints::TURN_END,
            SoulSiphon => HookPoints::DAMAGE_DEALT,
            ArchipelagosBlessing | StonewillResilience | UnyieldingHeart | VolatileEncryption
            | RimefrostAura | ToxicBody | ThornyGarden | RetributionAura | BodyOfFire
            | FinalPrayer => HookPoints::DAMAGE_TAKEN,
            StaticResonance | SpiritOfThePack | BloodFrenzy => HookPoints::CRIT_LANDED,
            ResoluteGuardian | WardensGrace | BoundSoul | MasterOfPuppets => {
                HookPoints::DEBUFF_APPLIED
            }
            ArcaneEcho | FeatheredSonnet | SpellthiefsGleam => HookPoints::SKILL_USED,
            DanceOfAThousandCuts => HookPoints::SKILL_USED.union(HookPoints::ATTACK_LANDED),
            TwinsHarmony | EagerHeart | WintersEmbrace => HookPoints::ATTACK_LANDED,
            RagingPhoenix | ExtraLife | UnbrokenThreads | EncoreOfShadows | FinalVengeance => {
                HookPoints::DEFEAT
            }
            KeenSenses | CorneredFury | SteadfastFaith | LingeringMalice | GhostlyRage
            | HarmoniousResonance => HookPoints::empty(),
        }
    }

    /// Order in which revival passives are tried; `None` for everything else.
    pub const fn revival_priority(self) -> Option<u8> {
        match self {
            Self::RagingPhoenix => Some(0),
            Self::ExtraLife => Some(1),
            Self::UnbrokenThreads => Some(2),
            _ => None,
        }
    }
}

/// Runs `passive` of `owner` for `event`.
///
/// A downed owner only reacts to defeat events.
pub(crate) fn trigger(session: &mut CombatSession, owner: Side, passive: PassiveId, event: &HookEvent) {
    if session.participant(owner).is_down() && !matches!(event, HookEvent::Defeat(_)) {
        trace!(target: "combat::passives", side = %owner, passive = %passive, "owner is down");
        return;
    }
    trace!(target: "combat::passives", side = %owner, passive = %passive, point = %event.point(), "trigger");

    match *event {
        HookEvent::BattleStart(stage) => lifecycle::battle_start(session, owner, passive, stage),
        HookEvent::TurnStart => lifecycle::turn_start(session, owner, passive),
        HookEvent::TurnEnd => lifecycle::turn_end(session, owner, passive),
        HookEvent::DamageDealt { amount, .. } => reactive::damage_dealt(session, owner, passive, amount),
        HookEvent::DamageTaken { attacker, amount } => {
            reactive::damage_taken(session, owner, passive, attacker, amount)
        }
        HookEvent::DebuffApplied {
            role,
            ref effect,
            kind,
        } => reactive::debuff_applied(session, owner, passive, role, effect, kind),
        HookEvent::CritLanded { .. } => offensive::crit_landed(session, owner, passive),
        HookEvent::AttackLanded { target } => offensive::attack_landed(session, owner, passive, target),
        HookEvent::SkillUsed { caster } => offensive::skill_used(session, owner, passive, caster),
        HookEvent::Defeat(stage) => defeat::defeat(session, owner, passive, stage),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn catalog_names_round_trip() {
        assert_eq!("Whims of Fortune".parse::<PassiveId>(), Ok(PassiveId::WhimsOfFortune));
        assert_eq!("Spellthiefs Gleam".parse::<PassiveId>(), Ok(PassiveId::SpellthiefsGleam));
        assert_eq!(PassiveId::DanceOfAThousandCuts.to_string(), "Dance of a Thousand Cuts");
        for passive in PassiveId::iter() {
            assert_eq!(passive.to_string().parse::<PassiveId>(), Ok(passive));
        }
    }

    #[test]
    fn unknown_names_do_not_parse() {
        assert!("Moons Scorn".parse::<PassiveId>().is_err());
    }

    #[test]
    fn only_revivals_have_priority() {
        let mut revivals: Vec<_> = PassiveId::iter()
            .filter_map(|p| p.revival_priority().map(|rank| (rank, p)))
            .collect();
        revivals.sort();
        assert_eq!(
            revivals.into_iter().map(|(_, p)| p).collect::<Vec<_>>(),
            vec![PassiveId::RagingPhoenix, PassiveId::ExtraLife, PassiveId::UnbrokenThreads]
        );
    }
}
