//! Settlement receipts.
//!
//! Every resolved game produces a [`SettlementReceipt`] describing who won,
//! how the game ended and the digest the winner was drawn from, so the
//! outcome can be re-derived by anyone holding both secrets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Digest256, GameId, PlayerId, Slot, Stake};

/// How a game reached settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Both players revealed; the fairness rule picked the winner.
    Revealed,
    /// One player revealed and the other let the deadline pass.
    Forfeit,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revealed => write!(f, "REVEALED"),
            Self::Forfeit => write!(f, "FORFEIT"),
        }
    }
}

/// Record of a completed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub game_id: GameId,
    pub resolution: Resolution,
    pub winner: PlayerId,
    pub winning_slot: Slot,
    pub loser: PlayerId,
    /// Amount credited to the winner (both stakes).
    pub payout: Stake,
    /// Digest over both revealed slots. `None` for forfeits.
    pub outcome_digest: Option<Digest256>,
    pub settled_at: DateTime<Utc>,
}
