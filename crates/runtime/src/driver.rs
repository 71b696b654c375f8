//! Turn loop that advances a session phase by phase.
//!
//! The driver owns the [`CombatSession`] and is the only place that awaits.
//! Engine calls stay synchronous; the loop suspends only at phase
//! boundaries, after publishing what the previous phase produced:
//!
//! ```text
//! start → [TurnStart → (await action) → ActionResolution]* → Finished
//! ```
//!
//! Each turn's wait is bounded by [`RuntimeConfig::action_timeout`]; expiry
//! ends the battle with a `timeout` outcome. Surrender requests arrive
//! through the [`DriverHandle`] and are applied at the next boundary.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use combat_core::{
    ActionError, CombatConfig, CombatError, CombatOutcome, CombatSession, Phase, Side, TurnStart,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{ActionProvider, DriverHandle, Result, RuntimeError};
use crate::events::{CombatEvent, EventBus, PhaseEvent};
use crate::registry::SessionGuard;

/// Runtime configuration.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Pause before the AI acts.
    pub ai_delay: Duration,
    /// Inactivity bound for one turn's action.
    pub action_timeout: Duration,
    /// Turns after which the battle is ended as a timeout. `None` is unbounded.
    pub max_turns: Option<u32>,
    pub event_buffer_size: usize,
    pub control_buffer_size: usize,
    /// Session seed. `None` draws a fresh one per encounter.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            ai_delay: Duration::from_millis(1500),
            action_timeout: Duration::from_secs(300),
            max_turns: None,
            event_buffer_size: 100,
            control_buffer_size: 8,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_AI_DELAY_MS` - Pause before AI actions (default: 1500)
    /// - `COMBAT_ACTION_TIMEOUT_SECS` - Inactivity timeout per turn (default: 300)
    /// - `COMBAT_MAX_TURNS` - Turn cap before a timeout outcome (default: unbounded)
    /// - `COMBAT_EVENT_BUFFER` - Event channel capacity per topic (default: 100)
    /// - `COMBAT_SEED` - Fixed session seed (default: random)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("COMBAT_AI_DELAY_MS") {
            config.ai_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = read_env::<u64>("COMBAT_ACTION_TIMEOUT_SECS") {
            config.action_timeout = Duration::from_secs(secs.max(1));
        }
        config.max_turns = read_env::<u32>("COMBAT_MAX_TURNS");
        if let Some(capacity) = read_env::<usize>("COMBAT_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        config.seed = read_env::<u64>("COMBAT_SEED");

        config
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Requests accepted from a [`DriverHandle`].
#[derive(Debug, Clone, Copy)]
pub(crate) enum Control {
    Surrender(Side),
}

/// Drives one encounter to completion.
pub struct CombatDriver {
    session: CombatSession,
    providers: [Arc<dyn ActionProvider>; 2],
    bus: EventBus,
    config: RuntimeConfig,
    control_tx: mpsc::Sender<Control>,
    control_rx: mpsc::Receiver<Control>,
    _guard: Option<SessionGuard>,
    turns: u32,
}

impl CombatDriver {
    pub fn new(
        session: CombatSession,
        p1: Arc<dyn ActionProvider>,
        p2: Arc<dyn ActionProvider>,
        config: RuntimeConfig,
    ) -> Self {
        let (control_tx, control_rx) = mpsc::channel(config.control_buffer_size.max(1));
        Self {
            session,
            providers: [p1, p2],
            bus: EventBus::with_capacity(config.event_buffer_size),
            config,
            control_tx,
            control_rx,
            _guard: None,
            turns: 0,
        }
    }

    /// Keeps the registry claim alive until the battle ends.
    pub fn with_guard(mut self, guard: SessionGuard) -> Self {
        self._guard = Some(guard);
        self
    }

    pub fn handle(&self) -> DriverHandle {
        DriverHandle::new(self.control_tx.clone(), self.bus.clone())
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    /// Runs the driver on its own task.
    pub fn spawn(self) -> (DriverHandle, JoinHandle<Result<CombatOutcome>>) {
        let handle = self.handle();
        let task = tokio::spawn(self.run());
        (handle, task)
    }

    /// Runs the battle to its end and returns the outcome.
    ///
    /// The registry guard, if any, is released when this returns.
    pub async fn run(mut self) -> Result<CombatOutcome> {
        if self.session.phase() == Phase::Setup {
            self.session.start()?;
            self.bus.publish(CombatEvent::Phase(PhaseEvent::Started {
                kind: self.session.kind(),
                first: self.session.current(),
            }));
            self.flush();
        }

        while !self.session.is_finished() {
            if self.poll_control()? {
                break;
            }
            if let Some(limit) = self.config.max_turns
                && self.turns >= limit
            {
                warn!(target: "runtime::driver", limit, "turn cap reached");
                self.session.timeout()?;
                break;
            }

            let round = self.session.round();
            match self.session.begin_turn()? {
                TurnStart::Ready(side) => {
                    self.bus.publish(CombatEvent::Phase(PhaseEvent::AwaitingAction { side, round }));
                    self.flush();
                    self.await_action(side).await?;
                }
                TurnStart::Skipped(side) => {
                    self.bus.publish(CombatEvent::Phase(PhaseEvent::TurnSkipped { side, round }));
                }
                TurnStart::Finished => {}
            }
            self.turns += 1;
            self.flush();
        }

        self.flush();
        let outcome = self
            .session
            .outcome()
            .cloned()
            .ok_or(RuntimeError::NoOutcome)?;
        info!(
            target: "runtime::driver",
            reason = %outcome.reason,
            winner = ?outcome.winner,
            rounds = outcome.rounds,
            turns = self.turns,
            "battle finished"
        );
        self.bus
            .publish(CombatEvent::Phase(PhaseEvent::Finished(outcome.clone())));
        Ok(outcome)
    }

    /// Applies a pending surrender. Returns true if the battle ended.
    fn poll_control(&mut self) -> Result<bool> {
        match self.control_rx.try_recv() {
            Ok(Control::Surrender(side)) => {
                self.surrender(side)?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    fn surrender(&mut self, side: Side) -> Result<()> {
        info!(target: "runtime::driver", side = %side, "surrender");
        self.session.surrender(side)?;
        Ok(())
    }

    /// Waits for a valid action from `side` and resolves it.
    ///
    /// Rejected actions are reported and the provider is asked again until
    /// the turn deadline passes.
    async fn await_action(&mut self, side: Side) -> Result<()> {
        let deadline = Instant::now() + self.config.action_timeout;
        let provider = Arc::clone(&self.providers[side.index()]);

        loop {
            let requested = tokio::select! {
                biased;
                Some(Control::Surrender(loser)) = self.control_rx.recv() => {
                    return self.surrender(loser);
                }
                result = tokio::time::timeout_at(
                    deadline,
                    provider.provide_action(side, &mut self.session),
                ) => result,
            };

            let action = match requested {
                Ok(action) => action?,
                Err(_) => {
                    warn!(
                        target: "runtime::driver",
                        side = %side,
                        provider = %provider.kind(),
                        "no action before the deadline"
                    );
                    self.session.timeout()?;
                    return Ok(());
                }
            };

            match self.session.submit_action(side, action) {
                Ok(report) => {
                    debug!(
                        target: "runtime::driver",
                        side = %side,
                        outcome = ?report.outcome,
                        finished = report.finished,
                        "action resolved"
                    );
                    return Ok(());
                }
                Err(
                    err @ (ActionError::Silenced { .. }
                    | ActionError::OnCooldown { .. }
                    | ActionError::NotLearned { .. }),
                ) => {
                    debug!(
                        target: "runtime::driver",
                        side = %side,
                        code = err.error_code(),
                        severity = err.severity().as_str(),
                        "action rejected"
                    );
                    self.bus.publish(CombatEvent::Phase(PhaseEvent::ActionRejected {
                        side,
                        reason: err.to_string(),
                    }));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Publishes narration and telemetry produced since the last flush.
    fn flush(&mut self) {
        let lines = self.session.take_new_log();
        if !lines.is_empty() {
            self.bus.publish(CombatEvent::Narration { lines });
        }
        for event in self.session.drain_telemetry() {
            self.bus.publish(CombatEvent::Telemetry(event));
        }
    }
}
