//! In-flight games keyed by id, plus the game id counter.

use std::collections::BTreeMap;

use dicematch_types::{Commitment, DicematchError, Game, GameId, Result, Stake};
use rust_decimal::Decimal;

/// Stores every unsettled game.
#[derive(Debug, Clone, Default)]
pub struct GameTable {
    games: BTreeMap<GameId, Game>,
    /// Last id issued. Only ever incremented.
    last_id: GameId,
}

impl GameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a game between the queued offer (`first`) and the arriving one
    /// (`second`). The counter is incremented before use, so the first game
    /// is `game:1`.
    pub fn create(&mut self, stake: Stake, first: Commitment, second: Commitment) -> GameId {
        let id = self.last_id.next();
        self.last_id = id;
        self.games.insert(id, Game::new(id, stake, first, second));
        id
    }

    #[must_use]
    pub fn get(&self, id: GameId) -> Option<&Game> {
        self.games.get(&id)
    }

    /// # Errors
    /// `GameNotFound`.
    pub fn get_mut(&mut self, id: GameId) -> Result<&mut Game> {
        self.games
            .get_mut(&id)
            .ok_or(DicematchError::GameNotFound(id))
    }

    /// # Errors
    /// `GameNotFound`.
    pub fn remove(&mut self, id: GameId) -> Result<Game> {
        self.games
            .remove(&id)
            .ok_or(DicematchError::GameNotFound(id))
    }

    /// Games in id order.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    /// Both stakes of every stored game.
    #[must_use]
    pub fn staked_total(&self) -> Decimal {
        self.games
            .values()
            .map(|g| g.stake.amount * Decimal::TWO)
            .sum()
    }

    #[must_use]
    pub fn last_id(&self) -> GameId {
        self.last_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stake(n: i64) -> Stake {
        Stake::new("SYS", Decimal::new(n, 0))
    }

    #[test]
    fn first_game_is_one() {
        let mut table = GameTable::new();
        assert_eq!(table.last_id(), GameId(0));
        let id = table.create(stake(5), Commitment([1; 32]), Commitment([2; 32]));
        assert_eq!(id, GameId(1));
        assert_eq!(table.get(id).unwrap().deadline, None);
    }

    #[test]
    fn ids_survive_removal() {
        let mut table = GameTable::new();
        let a = table.create(stake(5), Commitment([1; 32]), Commitment([2; 32]));
        table.remove(a).unwrap();
        let b = table.create(stake(5), Commitment([3; 32]), Commitment([4; 32]));
        assert_eq!(b, GameId(2));
        assert!(matches!(
            table.remove(a),
            Err(DicematchError::GameNotFound(id)) if id == a
        ));
    }

    #[test]
    fn staked_total_counts_both_sides() {
        let mut table = GameTable::new();
        table.create(stake(5), Commitment([1; 32]), Commitment([2; 32]));
        table.create(stake(7), Commitment([3; 32]), Commitment([4; 32]));
        assert_eq!(table.staked_total(), Decimal::new(24, 0));
        assert_eq!(table.len(), 2);
    }
}
