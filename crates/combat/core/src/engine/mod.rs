//! Turn scheduling and action resolution.
//!
//! The [`CombatSession`] is the authoritative aggregate for one encounter.
//! It owns both participants, the dice, the hook bus and the narration log,
//! and exposes the phase operations a driver calls in order:
//!
//! ```text
//! start → begin_turn → submit_action → begin_turn → ... → Finished
//!              └─ Skipped ──────────────┘
//! ```
//!
//! Every operation either completes synchronously or is rejected with an
//! [`ActionError`] without touching the session.

mod damage;
mod effects;
mod errors;
mod hook;
mod outcome;
mod turns;

use std::sync::Arc;

use tracing::info;

pub use effects::Applied;
pub use errors::{ActionError, ConfigurationGap};
pub use hook::{
    DebuffRole, DefeatStage, HookBus, HookEvent, HookPoint, HookPoints, Registration, StartStage,
};
pub use turns::{ActionOutcome, ActionReport, TurnStart};

use crate::config::CombatConfig;
use crate::env::{Dice, PcgRng, RngOracle};
use crate::outcome::{CombatOutcome, TelemetryEvent};
use crate::state::{Participant, Side, TurnState};

/// Kind of encounter. Decides reward and telemetry handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MatchKind {
    Pvp,
    Pve,
    /// Bracket match: no rewards, the bracket reads the outcome.
    Tournament,
}

/// Where the session stands in its state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Built but not started.
    Setup,
    /// Waiting for `begin_turn` of the current side.
    TurnStart,
    /// Waiting for the given side's action.
    Action(Side),
    Finished,
}

impl core::fmt::Display for Phase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Setup => f.write_str("setup"),
            Self::TurnStart => f.write_str("turn start"),
            Self::Action(side) => write!(f, "action ({side})"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

/// An action chosen by a player or the AI.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    Attack,
    Skill(String),
}

/// Invoked exactly once when the session finishes.
pub type OutcomeCallback = Box<dyn FnOnce(&CombatOutcome) + Send>;

// ============================================================================
// Builder
// ============================================================================

/// Assembles a [`CombatSession`].
pub struct SessionBuilder {
    participants: [Participant; 2],
    kind: MatchKind,
    config: CombatConfig,
    oracle: Arc<dyn RngOracle>,
    seed: u64,
    on_finish: Option<OutcomeCallback>,
}

impl SessionBuilder {
    pub fn new(p1: Participant, p2: Participant) -> Self {
        Self {
            participants: [p1, p2],
            kind: MatchKind::Pvp,
            config: CombatConfig::default(),
            oracle: Arc::new(PcgRng),
            seed: 0,
            on_finish: None,
        }
    }

    pub fn kind(mut self, kind: MatchKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rng(mut self, oracle: Arc<dyn RngOracle>, seed: u64) -> Self {
        self.oracle = oracle;
        self.seed = seed;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn on_finish(mut self, callback: impl FnOnce(&CombatOutcome) + Send + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> CombatSession {
        let hooks = HookBus::new(&self.participants);
        CombatSession {
            turn: TurnState::new(Side::P1),
            participants: self.participants,
            phase: Phase::Setup,
            kind: self.kind,
            config: self.config,
            dice: Dice::new(self.oracle, self.seed),
            hooks,
            log: Vec::new(),
            log_cursor: 0,
            telemetry: Vec::new(),
            outcome: None,
            on_finish: self.on_finish,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// One encounter between two participants.
pub struct CombatSession {
    participants: [Participant; 2],
    turn: TurnState,
    phase: Phase,
    kind: MatchKind,
    config: CombatConfig,
    dice: Dice,
    hooks: HookBus,
    log: Vec<String>,
    log_cursor: usize,
    telemetry: Vec<TelemetryEvent>,
    outcome: Option<CombatOutcome>,
    on_finish: Option<OutcomeCallback>,
}

impl CombatSession {
    pub fn builder(p1: Participant, p2: Participant) -> SessionBuilder {
        SessionBuilder::new(p1, p2)
    }

    /// Runs battle-start passives and fixes the turn order.
    ///
    /// The faster participant moves first; ties favor P1.
    pub fn start(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::Setup {
            return Err(ActionError::WrongPhase {
                phase: self.phase,
                attempted: "start the battle",
            });
        }

        for side in Side::BOTH {
            self.fire(side, HookEvent::BattleStart(StartStage::Opening));
        }

        let p1 = &self.participants[0];
        let p2 = &self.participants[1];
        let first = if p1.stats.spd >= p2.stats.spd {
            Side::P1
        } else {
            Side::P2
        };
        self.turn = TurnState::new(first);

        let matchup = format!("{} vs {}!", p1.name, p2.name);
        self.narrate(matchup);
        self.narrate(format!(
            "{} is faster and takes the first turn!",
            self.name(first)
        ));
        self.narrate(format!("--- Round {} ---", self.turn.round));

        for side in Side::BOTH {
            self.fire(side, HookEvent::BattleStart(StartStage::Ordered));
        }

        info!(
            target: "combat::session",
            kind = %self.kind,
            first = %first,
            hooks = self.hooks.len(),
            "battle started"
        );
        self.phase = Phase::TurnStart;
        Ok(())
    }

    // ===== accessors =====

    pub fn participant(&self, side: Side) -> &Participant {
        &self.participants[side.index()]
    }

    /// Direct access for hosts that seed battle state (scripted encounters, tests).
    pub fn participant_mut(&mut self, side: Side) -> &mut Participant {
        &mut self.participants[side.index()]
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn round(&self) -> u32 {
        self.turn.round
    }

    pub fn current(&self) -> Side {
        self.turn.current
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn outcome(&self) -> Option<&CombatOutcome> {
        self.outcome.as_ref()
    }

    pub fn hooks(&self) -> &HookBus {
        &self.hooks
    }

    /// Full narration log.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Narration appended since the previous call.
    pub fn take_new_log(&mut self) -> Vec<String> {
        let lines = self.log[self.log_cursor..].to_vec();
        self.log_cursor = self.log.len();
        lines
    }

    pub fn drain_telemetry(&mut self) -> Vec<TelemetryEvent> {
        std::mem::take(&mut self.telemetry)
    }

    // ===== crate helpers =====

    pub(crate) fn name(&self, side: Side) -> &str {
        &self.participants[side.index()].name
    }

    pub(crate) fn narrate(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    pub(crate) fn dice(&mut self) -> &mut Dice {
        &mut self.dice
    }

    pub(crate) fn emit(&mut self, event: TelemetryEvent) {
        self.telemetry.push(event);
    }

    /// Fires `event` for every passive `owner` registered on its hook point.
    pub(crate) fn fire(&mut self, owner: Side, event: HookEvent) {
        for passive in self.hooks.listeners(owner, event.point()) {
            crate::passives::trigger(self, owner, passive, &event);
        }
    }
}

impl core::fmt::Debug for CombatSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatSession")
            .field("kind", &self.kind)
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("p1", &self.participants[0].name)
            .field("p2", &self.participants[1].name)
            .field("dice", &self.dice)
            .finish_non_exhaustive()
    }
}
