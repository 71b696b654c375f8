//! Active skill library.
//!
//! Every castable skill is a [`SkillId`] keyed by its catalog name. The turn
//! scheduler has already validated the cast and consumed the cooldown when
//! [`resolve`] runs; resolvers only mutate the session through its damage
//! and effect pipelines and return the narration of the cast.
//!
//! Resolvers are grouped by role: player offense, player control, player
//! support and monster skills.

mod control;
mod enemy;
mod offense;
mod support;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::trace;

use crate::combat::{DamageOutcome, DamageRequest};
use crate::engine::CombatSession;
use crate::state::{EffectKind, EffectPayload, EffectSpec, Side};

/// Resolver of one active skill: `(session, caster, target) -> narration`.
type Resolver = fn(&mut CombatSession, Side, Side) -> String;

/// Every active skill the engine can resolve, keyed by its catalog name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "title_case")]
pub enum SkillId {
    // ===== player titles =====
    TidalBulwark,
    DuskfallStrike,
    SorrowfulAria,
    PhantomCrescendo,
    SolarOverture,
    BlazingFinale,
    InfernoBrand,
    SoulCombustion,
    HundredSpiritsPalm,
    FlowingMantra,
    AbsoluteZero,
    SnowflakeDance,
    RealitysBlueprint,
    HarmonicConvergence,
    CrystallizeMana,
    AmethystPurge,
    SummonLeviathansMirage,
    Dreamtide,
    #[strum(to_string = "Verse of the Griffin")]
    VerseOfTheGriffin,
    #[strum(to_string = "Rhyme of the Roc")]
    RhymeOfTheRoc,
    PuppetsVow,
    #[strum(to_string = "Strings of Fate")]
    StringsOfFate,
    ThunderclapSonata,
    LightningEtude,
    GlacialPrison,
    WintersHeart,
    DataLeak,
    SystemCrash,
    SakuraFlash,
    FallingBlossom,
    SunderingQuake,
    IroncladResolve,
    #[strum(to_string = "Barricade of Thorns")]
    BarricadeOfThorns,
    RetributionBash,
    LancersCometfall,
    #[strum(to_string = "Ride the Wind")]
    RideTheWind,
    ForesightsGambit,
    OrchestratedAssault,
    HallowedGround,
    SacredIntervention,
    CascadingLogicBomb,
    ProtocolOverride,
    NeurotoxinBloom,
    ParalyzingVenom,
    CaramelizedShot,
    #[strum(to_string = "Flourish and Fire")]
    FlourishAndFire,
    #[strum(to_string = "Whispers of Decay")]
    WhispersOfDecay,
    BloodPriceOffering,
    ChaoticRoll,
    AllIn,
    #[strum(to_string = "Blade of Ephemeral Grace")]
    BladeOfEphemeralGrace,
    ArcaneSilence,
    GoldenShackle,
    GildedPrison,
    RaiseDead,
    SoulDrain,
    CrescentWeep,
    LunarCurse,
    VineLash,
    NaturesBlessing,
    ShadowBolt,
    #[strum(to_string = "Whispers of Fear")]
    WhispersOfFear,
    CrossSlash,
    BladeDance,
    FelFlame,
    DemonicPact,
    ButtonMash,
    RageQuit,
    SpicyDish,
    HeartyMeal,
    FirstCut,
    SteadyGuard,
    MendingLight,
    HallowedWard,
    SwiftStrike,
    WindStep,
    EmberCast,
    FadingCurse,
    HeavyBlow,
    IronResolve,

    // ===== monsters =====
    SilentStrike,
    FlowingBlade,
    MechanicalSlash,
    CoreOverload,
    VengefulFist,
    SavageRampage,
    RootBind,
    ConcentratedVenom,
    ArenasCleave,
    FinishingBlow,
    ShadowSlash,
    SplittingShadow,
    CrimsonEdge,
    BladeFury,
    PoisonVial,
    AcidSplash,
    BindingThorns,
    WiltedRose,
    PrisonChain,
    #[strum(to_string = "Drag to the Abyss")]
    DragToTheAbyss,
    BurningLight,
    SolarSpear,
    CursedCannonball,
    DeepSeaCurse,
    LifesMirror,
    DualFace,
    LavaBurst,
    Incinerate,
    DrainingNote,
    #[strum(to_string = "Lullaby of Nightmares")]
    LullabyOfNightmares,
    BlindingMist,
    #[strum(to_string = "Hand of Fog")]
    HandOfFog,
    DarkClaw,
    ShadowBreath,
    ImperialSword,
    #[strum(to_string = "Decree of Ruin")]
    DecreeOfRuin,
    BloodOffering,
    IvoryCurse,
    #[strum(to_string = "Thread of Life")]
    ThreadOfLife,
    SelfMending,
    AbyssStrike,
    HellfireChains,
    SpiritFireball,
    RedMoonCharm,
}

impl SkillId {
    fn resolver(self) -> Resolver {
        use SkillId::*;
        match self {
            TidalBulwark => support::tidal_bulwark,
            DuskfallStrike => offense::duskfall_strike,
            SorrowfulAria => control::sorrowful_aria,
            PhantomCrescendo => offense::phantom_crescendo,
            SolarOverture => support::solar_overture,
            BlazingFinale => offense::blazing_finale,
            InfernoBrand => offense::inferno_brand,
            SoulCombustion => offense::soul_combustion,
            HundredSpiritsPalm => offense::hundred_spirits_palm,
            FlowingMantra => support::flowing_mantra,
            AbsoluteZero => offense::absolute_zero,
            SnowflakeDance => offense::snowflake_dance,
            RealitysBlueprint => control::realitys_blueprint,
            HarmonicConvergence => support::harmonic_convergence,
            CrystallizeMana => offense::crystallize_mana,
            AmethystPurge => offense::amethyst_purge,
            SummonLeviathansMirage => offense::leviathans_mirage,
            Dreamtide => control::dreamtide,
            VerseOfTheGriffin => offense::verse_of_the_griffin,
            RhymeOfTheRoc => support::rhyme_of_the_roc,
            PuppetsVow => control::puppets_vow,
            StringsOfFate => support::strings_of_fate,
            ThunderclapSonata => offense::thunderclap_sonata,
            LightningEtude => offense::lightning_etude,
            GlacialPrison => offense::glacial_prison,
            WintersHeart => support::winters_heart,
            DataLeak => control::data_leak,
            SystemCrash => offense::system_crash,
            SakuraFlash => offense::sakura_flash,
            FallingBlossom => support::falling_blossom,
            SunderingQuake => offense::sundering_quake,
            IroncladResolve => support::ironclad_resolve,
            BarricadeOfThorns => support::barricade_of_thorns,
            RetributionBash => offense::retribution_bash,
            LancersCometfall => offense::lancers_cometfall,
            RideTheWind => support::ride_the_wind,
            ForesightsGambit => control::foresights_gambit,
            OrchestratedAssault => support::orchestrated_assault,
            HallowedGround => support::hallowed_ground,
            SacredIntervention => support::sacred_intervention,
            CascadingLogicBomb => offense::cascading_logic_bomb,
            ProtocolOverride => control::protocol_override,
            NeurotoxinBloom => offense::neurotoxin_bloom,
            ParalyzingVenom => offense::paralyzing_venom,
            CaramelizedShot => offense::caramelized_shot,
            FlourishAndFire => offense::flourish_and_fire,
            WhispersOfDecay => control::whispers_of_decay,
            BloodPriceOffering => offense::blood_price_offering,
            ChaoticRoll => offense::chaotic_roll,
            AllIn => offense::all_in,
            BladeOfEphemeralGrace => offense::blade_of_ephemeral_grace,
            ArcaneSilence => offense::arcane_silence,
            GoldenShackle => offense::golden_shackle,
            GildedPrison => control::gilded_prison,
            RaiseDead => support::raise_dead,
            SoulDrain => offense::soul_drain,
            CrescentWeep => offense::crescent_weep,
            LunarCurse => control::lunar_curse,
            VineLash => offense::vine_lash,
            NaturesBlessing => support::natures_blessing,
            ShadowBolt => offense::shadow_bolt,
            WhispersOfFear => control::whispers_of_fear,
            CrossSlash => offense::cross_slash,
            BladeDance => support::blade_dance,
            FelFlame => offense::fel_flame,
            DemonicPact => support::demonic_pact,
            ButtonMash => offense::button_mash,
            RageQuit => offense::rage_quit,
            SpicyDish => offense::spicy_dish,
            HeartyMeal => support::hearty_meal,
            FirstCut => offense::first_cut,
            SteadyGuard => support::steady_guard,
            MendingLight => support::mending_light,
            HallowedWard => support::hallowed_ward,
            SwiftStrike => offense::swift_strike,
            WindStep => support::wind_step,
            EmberCast => offense::ember_cast,
            FadingCurse => control::fading_curse,
            HeavyBlow => offense::heavy_blow,
            IronResolve => support::iron_resolve,

            SilentStrike => enemy::silent_strike,
            FlowingBlade => enemy::flowing_blade,
            MechanicalSlash => enemy::mechanical_slash,
            CoreOverload => enemy::core_overload,
            VengefulFist => enemy::vengeful_fist,
            SavageRampage => enemy::savage_rampage,
            RootBind => enemy::root_bind,
            ConcentratedVenom => enemy::concentrated_venom,
            ArenasCleave => enemy::arenas_cleave,
            FinishingBlow => enemy::finishing_blow,
            ShadowSlash => enemy::shadow_slash,
            SplittingShadow => enemy::splitting_shadow,
            CrimsonEdge => enemy::crimson_edge,
            BladeFury => enemy::blade_fury,
            PoisonVial => enemy::poison_vial,
            AcidSplash => enemy::acid_splash,
            BindingThorns => enemy::binding_thorns,
            WiltedRose => enemy::wilted_rose,
            PrisonChain => enemy::prison_chain,
            DragToTheAbyss => enemy::drag_to_the_abyss,
            BurningLight => enemy::burning_light,
            SolarSpear => enemy::solar_spear,
            CursedCannonball => enemy::cursed_cannonball,
            DeepSeaCurse => enemy::deep_sea_curse,
            LifesMirror => enemy::lifes_mirror,
            DualFace => enemy::dual_face,
            LavaBurst => enemy::lava_burst,
            Incinerate => enemy::incinerate,
            DrainingNote => enemy::draining_note,
            LullabyOfNightmares => enemy::lullaby_of_nightmares,
            BlindingMist => enemy::blinding_mist,
            HandOfFog => enemy::hand_of_fog,
            DarkClaw => enemy::dark_claw,
            ShadowBreath => enemy::shadow_breath,
            ImperialSword => enemy::imperial_sword,
            DecreeOfRuin => enemy::decree_of_ruin,
            BloodOffering => enemy::blood_offering,
            IvoryCurse => enemy::ivory_curse,
            ThreadOfLife => enemy::thread_of_life,
            SelfMending => enemy::self_mending,
            AbyssStrike => enemy::abyss_strike,
            HellfireChains => enemy::hellfire_chains,
            SpiritFireball => enemy::spirit_fireball,
            RedMoonCharm => enemy::red_moon_charm,
        }
    }
}

/// Resolves `skill` cast by `caster` on `target` and returns its narration.
pub fn resolve(session: &mut CombatSession, caster: Side, target: Side, skill: SkillId) -> String {
    trace!(target: "combat::skills", side = %caster, skill = %skill, "resolve");
    (skill.resolver())(session, caster, target)
}

// ============================================================================
// Shared resolver helpers
// ============================================================================

fn crit_tag(crit: bool) -> &'static str {
    if crit { "Critical! " } else { "" }
}

/// One hit of `skill` and its narration line.
fn strike(
    session: &mut CombatSession,
    caster: Side,
    target: Side,
    skill: SkillId,
    request: DamageRequest,
) -> (DamageOutcome, String) {
    let hit = session.apply_damage(caster, target, request);
    let line = if hit.landed() {
        format!(
            "{}{} uses {skill} for {} damage!",
            crit_tag(hit.crit),
            session.name(caster),
            hit.amount
        )
    } else {
        format!("{} uses {skill} but it does not connect.", session.name(caster))
    };
    (hit, line)
}

/// Totals of a multi-hit skill.
#[derive(Clone, Copy, Debug, Default)]
struct Volley {
    pub total: i64,
    pub crits: usize,
}

impl Volley {
    pub fn record(&mut self, hit: &DamageOutcome) {
        self.total += hit.amount;
        if hit.crit {
            self.crits += 1;
        }
    }
}

/// `hits` identical hits of `skill`, with the summary line.
fn volley(
    session: &mut CombatSession,
    caster: Side,
    target: Side,
    skill: SkillId,
    hits: usize,
    request: DamageRequest,
) -> (Volley, String) {
    let mut volley = Volley::default();
    for _ in 0..hits {
        let hit = session.apply_damage(caster, target, request);
        volley.record(&hit);
    }
    let line = volley_line(session, caster, skill, hits, volley);
    (volley, line)
}

fn volley_line(
    session: &CombatSession,
    caster: Side,
    skill: SkillId,
    hits: usize,
    volley: Volley,
) -> String {
    format!(
        "{} uses {skill}, landing {hits} hits for {} total damage ({} critical)!",
        session.name(caster),
        volley.total,
        volley.crits
    )
}

/// Blindness-type debuff: the owner's hits may miss.
fn blind(name: &str, duration: u32, chance: f64) -> EffectSpec {
    EffectSpec::new(name, EffectKind::Debuff, duration).payload(EffectPayload::MissChance(chance))
}

/// Heals `side` by `amount` and describes the result for a skill line.
fn drain_text(session: &mut CombatSession, side: Side, amount: i64) -> String {
    if session.participant(side).effects.is_heal_blocked() {
        " Heal block prevents the recovery!".to_owned()
    } else {
        let healed = session.heal(side, amount);
        format!(" {} recovers {healed} HP.", session.name(side))
    }
}

/// `"{caster} tries {skill} but heal block stops it!"`.
fn heal_blocked_line(session: &CombatSession, caster: Side, skill: SkillId) -> String {
    format!(
        "{} tries to use {skill}, but heal block stops it!",
        session.name(caster)
    )
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn catalog_names_round_trip() {
        assert_eq!("Verse of the Griffin".parse::<SkillId>(), Ok(SkillId::VerseOfTheGriffin));
        assert_eq!("Summon Leviathans Mirage".parse::<SkillId>(), Ok(SkillId::SummonLeviathansMirage));
        assert_eq!("All In".parse::<SkillId>(), Ok(SkillId::AllIn));
        assert_eq!(SkillId::DragToTheAbyss.to_string(), "Drag to the Abyss");
        assert_eq!(SkillId::HundredSpiritsPalm.to_string(), "Hundred Spirits Palm");
        for skill in SkillId::iter() {
            assert_eq!(skill.to_string().parse::<SkillId>(), Ok(skill));
        }
    }

    #[test]
    fn unknown_names_do_not_parse() {
        assert!("Forbidden Technique".parse::<SkillId>().is_err());
    }
}
