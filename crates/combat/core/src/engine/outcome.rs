//! Game-over resolution: revival, defeat retaliation and finalization.

use tracing::{debug, info};

use super::{ActionError, CombatSession, DefeatStage, HookEvent, HookPoint, MatchKind, Phase};
use crate::outcome::{CombatOutcome, OutcomeReason, RewardGrant, TelemetryEvent};
use crate::state::Side;

impl CombatSession {
    /// Checks for lethal hp and resolves the battle if it is over.
    ///
    /// Revival passives get the first word: any participant that comes back
    /// keeps the battle going. A participant still down afterwards loses;
    /// the loser's retaliation may then take the winner down too, which
    /// turns the result into a draw.
    pub(crate) fn check_game_over(&mut self) -> bool {
        if self.phase == Phase::Finished {
            return true;
        }
        let down: Vec<Side> = Side::BOTH
            .into_iter()
            .filter(|&side| self.participant(side).is_down())
            .collect();
        if down.is_empty() {
            return false;
        }

        let mut revived = false;
        for &side in &down {
            revived |= self.attempt_revival(side);
        }

        let p1_down = self.participant(Side::P1).is_down();
        let p2_down = self.participant(Side::P2).is_down();
        let rounds = self.turn.round;
        let outcome = match (p1_down, p2_down) {
            (false, false) => {
                debug!(target: "combat::outcome", revived, "lethal damage undone by revival");
                return false;
            }
            (true, true) => CombatOutcome::undecided(OutcomeReason::Draw, rounds),
            (loser_down, _) => {
                let loser = if loser_down { Side::P1 } else { Side::P2 };
                let winner = loser.opponent();
                self.fire(loser, HookEvent::Defeat(DefeatStage::Finalize));
                if self.participant(winner).is_down() {
                    let mut outcome = CombatOutcome::undecided(OutcomeReason::Draw, rounds);
                    outcome.draw_after_passive = true;
                    outcome
                } else {
                    CombatOutcome::decided(winner, OutcomeReason::Knockout, rounds)
                }
            }
        };
        self.finalize(outcome);
        true
    }

    /// Runs `side`'s revival passives in priority order until one succeeds.
    fn attempt_revival(&mut self, side: Side) -> bool {
        let mut candidates: Vec<_> = self
            .hooks
            .listeners(side, HookPoint::Defeat)
            .into_iter()
            .filter_map(|passive| passive.revival_priority().map(|rank| (rank, passive)))
            .collect();
        candidates.sort_by_key(|(rank, _)| *rank);

        for (_, passive) in candidates {
            crate::passives::trigger(self, side, passive, &HookEvent::Defeat(DefeatStage::Lethal));
            if !self.participant(side).is_down() {
                debug!(target: "combat::outcome", side = %side, passive = %passive, "revived");
                return true;
            }
        }
        false
    }

    /// `side` gives up. The opponent wins.
    pub fn surrender(&mut self, side: Side) -> Result<&CombatOutcome, ActionError> {
        self.ensure_running("surrender")?;
        let line = format!("{} surrendered!", self.name(side));
        self.narrate(line);
        let outcome = CombatOutcome::decided(side.opponent(), OutcomeReason::Surrender, self.turn.round);
        Ok(self.finalize(outcome))
    }

    /// Ends the battle without a winner after inactivity.
    pub fn timeout(&mut self) -> Result<&CombatOutcome, ActionError> {
        self.ensure_running("time out")?;
        self.narrate("The battle timed out.");
        let outcome = CombatOutcome::undecided(OutcomeReason::Timeout, self.turn.round);
        Ok(self.finalize(outcome))
    }

    fn ensure_running(&self, attempted: &'static str) -> Result<(), ActionError> {
        match self.phase {
            Phase::Finished => Err(ActionError::Finished),
            Phase::Setup => Err(ActionError::WrongPhase {
                phase: self.phase,
                attempted,
            }),
            _ => Ok(()),
        }
    }

    /// Freezes the session, grants rewards, emits telemetry and fires the callback once.
    fn finalize(&mut self, mut outcome: CombatOutcome) -> &CombatOutcome {
        self.phase = Phase::Finished;

        if let (Some(winner), Some(loser)) = (outcome.winner, outcome.loser) {
            if self.kind == MatchKind::Pve {
                outcome.rewards = self.roll_rewards(winner, loser);
            }
            let line = match outcome.reason {
                OutcomeReason::Surrender => format!(
                    "{} gave up. {} is the winner!",
                    self.name(loser),
                    self.name(winner)
                ),
                _ => format!("{} is the winner!", self.name(winner)),
            };
            self.narrate(line);
        } else {
            let line = match outcome.reason {
                OutcomeReason::Timeout => "The battle ends without a winner.",
                _ => "The battle ends in a DRAW! Both fighters fell together.",
            };
            self.narrate(line);
        }

        self.emit_result_telemetry(&outcome);

        info!(
            target: "combat::session",
            kind = %self.kind,
            reason = %outcome.reason,
            winner = ?outcome.winner,
            rounds = outcome.rounds,
            draw_after_passive = outcome.draw_after_passive,
            "battle finished"
        );

        if let Some(callback) = self.on_finish.take() {
            callback(&outcome);
        }
        self.outcome.insert(outcome)
    }

    /// PvE payout when a player beats a participant that carries rewards.
    fn roll_rewards(&mut self, winner: Side, loser: Side) -> Option<RewardGrant> {
        let player_id = self.participant(winner).player_id?;
        let table = self.participant(loser).rewards?;
        let (exp_mult, prisma_mult) = self
            .participant(winner)
            .agency
            .as_ref()
            .map_or((1.0, 1.0), |a| (a.exp_multiplier, a.prisma_multiplier));

        let exp = self.dice().range(table.exp.min, table.exp.max);
        let prisma = self.dice().range(table.prisma.min, table.prisma.max);
        let grant = RewardGrant {
            player_id,
            exp: (exp as f64 * exp_mult) as u64,
            prisma: (prisma as f64 * prisma_mult) as u64,
        };
        if grant.exp > 0 || grant.prisma > 0 {
            let line = format!("Rewards: {} EXP and {} Prisma.", grant.exp, grant.prisma);
            self.narrate(line);
        }
        Some(grant)
    }

    fn emit_result_telemetry(&mut self, outcome: &CombatOutcome) {
        let winner_player = outcome.winner.and_then(|w| self.participant(w).player_id);
        match self.kind {
            MatchKind::Pve => {
                if let Some(player) = winner_player {
                    self.emit(TelemetryEvent::PveWin { player });
                }
                if let Some(grant) = outcome.rewards {
                    if grant.exp > 0 {
                        self.emit(TelemetryEvent::ExpEarned {
                            player: grant.player_id,
                            amount: grant.exp,
                        });
                    }
                    if grant.prisma > 0 {
                        self.emit(TelemetryEvent::PrismaEarned {
                            player: grant.player_id,
                            amount: grant.prisma,
                        });
                    }
                }
            }
            MatchKind::Pvp => {
                if let Some(player) = winner_player {
                    self.emit(TelemetryEvent::PvpWin { player });
                }
                if let (Some(winner), Some(loser)) = (outcome.winner, outcome.loser) {
                    for side in [winner, loser] {
                        if let Some(player) = self.participant(side).player_id {
                            self.emit(TelemetryEvent::PvpParticipate { player });
                        }
                    }
                }
            }
            MatchKind::Tournament => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::engine::SessionBuilder;
    use crate::env::{AgencyDefinition, FixedRng, PlayerId, RewardRange, RewardTable};
    use crate::passives::PassiveId;
    use crate::state::Participant;
    use crate::stats::Stats;

    fn fighter(name: &str) -> Participant {
        Participant::new(name, Stats::new(100.0, 10.0, 0.0, 10.0))
    }

    #[test]
    fn simultaneous_knockout_is_a_draw_reported_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let mut s = SessionBuilder::new(fighter("A"), fighter("B"))
            .rng(Arc::new(FixedRng::NEVER), 0)
            .on_finish(move |o| sink.lock().unwrap().push(o.clone()))
            .build();
        s.start().unwrap();
        s.participant_mut(Side::P1).set_hp(0);
        s.participant_mut(Side::P2).set_hp(0);

        assert!(s.check_game_over());
        assert!(s.check_game_over());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].winner, None);
        assert_eq!(calls[0].loser, None);
        assert_eq!(calls[0].reason, OutcomeReason::Draw);
    }

    #[test]
    fn revival_keeps_the_battle_going_once() {
        let p2 = fighter("B").with_passive(PassiveId::ExtraLife);
        let mut s = SessionBuilder::new(fighter("A"), p2)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.start().unwrap();

        s.participant_mut(Side::P2).set_hp(0);
        assert!(!s.check_game_over());
        assert_eq!(s.participant(Side::P2).hp(), 15);

        s.participant_mut(Side::P2).set_hp(0);
        assert!(s.check_game_over());
        assert_eq!(s.outcome().map(|o| o.winner), Some(Some(Side::P1)));
    }

    #[test]
    fn retaliation_that_kills_the_winner_is_a_draw() {
        let p2 = fighter("B").with_passive(PassiveId::EncoreOfShadows);
        let mut s = SessionBuilder::new(fighter("A"), p2)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.start().unwrap();
        s.participant_mut(Side::P1).set_hp(20);
        s.participant_mut(Side::P2).set_hp(0);

        assert!(s.check_game_over());
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.reason, OutcomeReason::Draw);
        assert!(outcome.draw_after_passive);
    }

    #[test]
    fn surrender_hands_the_win_to_the_opponent() {
        let mut s = SessionBuilder::new(fighter("A"), fighter("B")).build();
        s.start().unwrap();
        let outcome = s.surrender(Side::P1).unwrap().clone();
        assert_eq!(outcome.winner, Some(Side::P2));
        assert_eq!(outcome.reason, OutcomeReason::Surrender);
        assert_eq!(s.surrender(Side::P2), Err(ActionError::Finished));
    }

    #[test]
    fn pve_rewards_apply_agency_multipliers() {
        let mut agency = AgencyDefinition::new("mahavirtual", "MahaVirtual");
        agency.exp_multiplier = 1.15;
        agency.prisma_multiplier = 0.85;
        let player = fighter("Hero").with_player(PlayerId(7)).with_agency(agency);
        let monster = fighter("Slime").with_rewards(RewardTable {
            exp: RewardRange::new(100, 100),
            prisma: RewardRange::new(40, 40),
        });
        let mut s = SessionBuilder::new(player, monster)
            .kind(MatchKind::Pve)
            .rng(Arc::new(FixedRng::NEVER), 0)
            .build();
        s.start().unwrap();
        s.participant_mut(Side::P2).set_hp(0);
        assert!(s.check_game_over());

        let grant = s.outcome().and_then(|o| o.rewards).unwrap();
        assert_eq!((grant.exp, grant.prisma), (114, 34));
        let telemetry = s.drain_telemetry();
        assert!(telemetry.contains(&TelemetryEvent::PveWin { player: PlayerId(7) }));
        assert!(telemetry.contains(&TelemetryEvent::ExpEarned {
            player: PlayerId(7),
            amount: 114
        }));
    }
}
