//! What a successful call did.

use chrono::{DateTime, Utc};
use dicematch_types::{GameId, OfferId, SettlementReceipt};
use serde::{Deserialize, Serialize};

/// Result of `offerbet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferOutcome {
    /// No counter-offer; the stake is held in the book.
    Queued { offer_id: OfferId },
    /// Paired with a queued offer into a new game.
    Matched { offer_id: OfferId, game_id: GameId },
}

impl OfferOutcome {
    #[must_use]
    pub fn offer_id(&self) -> OfferId {
        match self {
            Self::Queued { offer_id } | Self::Matched { offer_id, .. } => *offer_id,
        }
    }

    #[must_use]
    pub fn game_id(&self) -> Option<GameId> {
        match self {
            Self::Queued { .. } => None,
            Self::Matched { game_id, .. } => Some(*game_id),
        }
    }
}

/// Result of `reveal`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    /// First reveal; the opponent must reveal by `deadline`.
    Recorded {
        game_id: GameId,
        deadline: DateTime<Utc>,
    },
    /// Second reveal; the game was settled.
    Settled(SettlementReceipt),
}
