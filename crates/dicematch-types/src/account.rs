//! Player account records.
//!
//! An account is created by the first deposit and removed once it holds
//! nothing: zero balance, no queued offers, no games in flight.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Balance and activity counters for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub owner: PlayerId,
    /// Spendable balance. Stakes held by offers and games are not included.
    pub balance: Decimal,
    /// Offers queued in the book and not yet matched.
    pub open_offers: u32,
    /// Games this player is part of that have not settled.
    pub open_games: u32,
}

impl Account {
    #[must_use]
    pub fn new(owner: PlayerId) -> Self {
        Self {
            owner,
            balance: Decimal::ZERO,
            open_offers: 0,
            open_games: 0,
        }
    }

    /// Whether the record can be deleted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.open_offers == 0 && self.open_games == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_is_empty() {
        assert!(Account::new(PlayerId::new()).is_empty());
    }

    #[test]
    fn any_counter_keeps_account() {
        let mut acct = Account::new(PlayerId::new());
        acct.open_games = 1;
        assert!(!acct.is_empty());
        acct.open_games = 0;
        acct.open_offers = 2;
        assert!(!acct.is_empty());
        acct.open_offers = 0;
        acct.balance = Decimal::new(1, 4);
        assert!(!acct.is_empty());
    }
}
