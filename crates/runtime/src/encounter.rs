//! Encounter setup: registry claim, participant building, session seeding.

use combat_core::{
    CatalogOracle, CombatOutcome, CombatSession, MatchKind, PlayerSnapshot, SessionBuilder,
    build_monster, build_player,
};
use tracing::info;

use crate::api::{Result, RuntimeError};
use crate::driver::RuntimeConfig;
use crate::registry::{SessionGuard, SessionRegistry};

/// A session ready to be driven, with its players claimed.
#[derive(Debug)]
pub struct Encounter {
    pub session: CombatSession,
    pub guard: SessionGuard,
    pub seed: u64,
}

type FinishCallback = Box<dyn FnOnce(&CombatOutcome) + Send>;

/// Builds encounters against one catalog and registry.
pub struct EncounterBuilder<'a> {
    catalog: &'a dyn CatalogOracle,
    registry: SessionRegistry,
    config: RuntimeConfig,
    on_finish: Option<FinishCallback>,
}

impl<'a> EncounterBuilder<'a> {
    pub fn new(catalog: &'a dyn CatalogOracle, registry: SessionRegistry, config: RuntimeConfig) -> Self {
        Self {
            catalog,
            registry,
            config,
            on_finish: None,
        }
    }

    /// Result callback, invoked exactly once when the session finishes.
    pub fn on_finish(mut self, callback: impl FnOnce(&CombatOutcome) + Send + 'static) -> Self {
        self.on_finish = Some(Box::new(callback));
        self
    }

    /// A player against a catalog monster.
    ///
    /// # Errors
    ///
    /// `AlreadyInCombat` if the player is fighting elsewhere,
    /// `UnknownMonster` if the catalog lacks `monster_id`.
    pub fn pve(self, player: &PlayerSnapshot, monster_id: &str) -> Result<Encounter> {
        let definition = self
            .catalog
            .monster(monster_id)
            .ok_or_else(|| RuntimeError::UnknownMonster(monster_id.to_owned()))?;
        let guard = self.registry.enter(&[player.player_id])?;
        let p1 = build_player(player, self.catalog);
        let p2 = build_monster(definition, self.catalog);
        Ok(self.finish(SessionBuilder::new(p1, p2).kind(MatchKind::Pve), guard))
    }

    /// Two players against each other.
    pub fn pvp(self, challenger: &PlayerSnapshot, opponent: &PlayerSnapshot) -> Result<Encounter> {
        self.versus(challenger, opponent, MatchKind::Pvp)
    }

    /// A bracket match: no rewards, the bracket reads the outcome.
    pub fn tournament(self, a: &PlayerSnapshot, b: &PlayerSnapshot) -> Result<Encounter> {
        self.versus(a, b, MatchKind::Tournament)
    }

    fn versus(self, a: &PlayerSnapshot, b: &PlayerSnapshot, kind: MatchKind) -> Result<Encounter> {
        let guard = self.registry.enter(&[a.player_id, b.player_id])?;
        let p1 = build_player(a, self.catalog);
        let p2 = build_player(b, self.catalog);
        Ok(self.finish(SessionBuilder::new(p1, p2).kind(kind), guard))
    }

    fn finish(self, builder: SessionBuilder, guard: SessionGuard) -> Encounter {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut builder = builder.config(self.config.combat).seed(seed);
        if let Some(callback) = self.on_finish {
            builder = builder.on_finish(callback);
        }
        info!(target: "runtime::encounter", seed, players = ?guard.players(), "encounter ready");
        Encounter {
            session: builder.build(),
            guard,
            seed,
        }
    }
}
