use arrayvec::ArrayVec;

use super::Side;
use crate::config::CombatConfig;

/// Turn bookkeeping for one encounter.
///
/// A round ends once every participant in `turn_order` has moved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Fixed at battle start by speed, first mover first.
    pub turn_order: ArrayVec<Side, { CombatConfig::MAX_PARTICIPANTS }>,
    /// The side currently acting.
    pub current: Side,
    /// Starts at 1.
    pub round: u32,
    /// Sides that already moved this round.
    pub moved: ArrayVec<Side, { CombatConfig::MAX_PARTICIPANTS }>,
    /// Turns started across the whole battle, both sides.
    pub turn_count: u32,
}

impl TurnState {
    pub fn new(first: Side) -> Self {
        let mut turn_order = ArrayVec::new();
        turn_order.push(first);
        turn_order.push(first.opponent());
        Self {
            turn_order,
            current: first,
            round: 1,
            moved: ArrayVec::new(),
            turn_count: 0,
        }
    }

    pub fn first_mover(&self) -> Side {
        self.turn_order.first().copied().unwrap_or(Side::P1)
    }

    /// Marks the current side as moved and hands the turn over.
    ///
    /// Returns true when this completed a round.
    pub fn advance(&mut self) -> bool {
        if !self.moved.contains(&self.current) {
            self.moved.push(self.current);
        }
        self.current = self.current.opponent();
        if self.moved.len() == self.turn_order.len() {
            self.round += 1;
            self.moved.clear();
            self.current = self.first_mover();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_increments_once_per_full_cycle() {
        let mut turn = TurnState::new(Side::P2);
        assert!(!turn.advance());
        assert_eq!(turn.current, Side::P1);
        assert_eq!(turn.round, 1);
        assert!(turn.advance());
        assert_eq!(turn.round, 2);
        assert_eq!(turn.current, Side::P2);
        assert!(turn.moved.is_empty());
    }
}
