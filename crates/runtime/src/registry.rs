//! Process-wide record of which players are currently fighting.
//!
//! A player may be part of at most one encounter. [`SessionRegistry::enter`]
//! claims every player of an encounter atomically and returns a
//! [`SessionGuard`]; dropping the guard releases them, whether the battle
//! finished, timed out, or its task was cancelled.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use combat_core::PlayerId;
use tracing::debug;

use crate::api::{Result, RuntimeError};

/// Cloneable registry handle. Clones share the same set.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    active: Arc<Mutex<HashSet<PlayerId>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<PlayerId>> {
        // The set stays consistent even if a holder panicked.
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `players` for a new encounter.
    ///
    /// Fails without claiming anything if one of them is already fighting
    /// or appears twice.
    pub fn enter(&self, players: &[PlayerId]) -> Result<SessionGuard> {
        let mut active = self.lock();
        for (i, player) in players.iter().enumerate() {
            if active.contains(player) || players[..i].contains(player) {
                return Err(RuntimeError::AlreadyInCombat { player: *player });
            }
        }
        active.extend(players.iter().copied());
        debug!(target: "runtime::registry", ?players, active = active.len(), "players entered combat");

        Ok(SessionGuard {
            registry: self.clone(),
            players: players.to_vec(),
        })
    }

    pub fn is_in_combat(&self, player: PlayerId) -> bool {
        self.lock().contains(&player)
    }

    /// Number of players currently fighting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Releases its players from the registry on drop.
pub struct SessionGuard {
    registry: SessionRegistry,
    players: Vec<PlayerId>,
}

impl SessionGuard {
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut active = self.registry.lock();
        for player in &self.players {
            active.remove(player);
        }
        debug!(target: "runtime::registry", players = ?self.players, "players left combat");
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("players", &self.players)
            .finish()
    }
}
