//! Wager offers.
//!
//! An offer is either queued in the book (`Open`) or paired into a game
//! (`Matched`). Only open offers take part in amount-based matching; both
//! kinds stay reachable through their commitment.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Commitment, GameId, OfferId, PlayerId, Stake};

/// Lifecycle state of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferState {
    /// Waiting for a counter-offer of exactly `amount`.
    Open { amount: Decimal },
    /// Paired into a game. No longer visible to matching.
    Matched { game_id: GameId },
}

impl fmt::Display for OfferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { amount } => write!(f, "OPEN({amount})"),
            Self::Matched { game_id } => write!(f, "MATCHED({game_id})"),
        }
    }
}

/// A single principal's stake and commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub owner: PlayerId,
    pub stake: Stake,
    pub commitment: Commitment,
    pub state: OfferState,
}

impl Offer {
    /// A freshly queued offer.
    #[must_use]
    pub fn open(id: OfferId, owner: PlayerId, stake: Stake, commitment: Commitment) -> Self {
        let amount = stake.amount;
        Self {
            id,
            owner,
            stake,
            commitment,
            state: OfferState::Open { amount },
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, OfferState::Open { .. })
    }

    /// Amount this offer is waiting to be matched at, if still open.
    #[must_use]
    pub fn open_amount(&self) -> Option<Decimal> {
        match self.state {
            OfferState::Open { amount } => Some(amount),
            OfferState::Matched { .. } => None,
        }
    }

    /// Game this offer was paired into, if any.
    #[must_use]
    pub fn game_id(&self) -> Option<GameId> {
        match self.state {
            OfferState::Open { .. } => None,
            OfferState::Matched { game_id } => Some(game_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Offer {
        Offer::open(
            OfferId(1),
            PlayerId::new(),
            Stake::new("SYS", Decimal::new(10, 0)),
            Commitment([3; 32]),
        )
    }

    #[test]
    fn open_offer_exposes_amount() {
        let offer = sample();
        assert!(offer.is_open());
        assert_eq!(offer.open_amount(), Some(Decimal::new(10, 0)));
        assert_eq!(offer.game_id(), None);
    }

    #[test]
    fn matched_offer_exposes_game() {
        let mut offer = sample();
        offer.state = OfferState::Matched { game_id: GameId(4) };
        assert!(!offer.is_open());
        assert_eq!(offer.open_amount(), None);
        assert_eq!(offer.game_id(), Some(GameId(4)));
        assert_eq!(offer.state.to_string(), "MATCHED(game:4)");
    }
}
