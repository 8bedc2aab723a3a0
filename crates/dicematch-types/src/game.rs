//! # Game — the two-player commit-reveal record
//!
//! A game is created when two offers of equal stake are paired. Slot one
//! holds the offer that was waiting in the book, slot two the offer that
//! arrived and matched it.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  first reveal   ┌──────────────┐  second reveal  ┌─────────┐
//!   │ MATCHED ├────────────────▶│ ONE_REVEALED ├────────────────▶│ SETTLED │
//!   └─────────┘  deadline set   └──────┬───────┘                 └─────────┘
//!                                      │ deadline passed + claim      ▲
//!                                      └──────────────────────────────┘
//! ```
//!
//! `SETTLED` is never stored: settlement deletes the record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Commitment, GameId, Secret, Stake};

/// Position of a player inside a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Slot {
    /// The offer that was queued first.
    First,
    /// The offer whose arrival created the game.
    Second,
}

impl Slot {
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "PLAYER1"),
            Self::Second => write!(f, "PLAYER2"),
        }
    }
}

/// One player's side of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub commitment: Commitment,
    pub reveal: Option<Secret>,
}

impl PlayerSlot {
    #[must_use]
    pub fn new(commitment: Commitment) -> Self {
        Self {
            commitment,
            reveal: None,
        }
    }

    #[must_use]
    pub fn has_revealed(&self) -> bool {
        self.reveal.is_some()
    }
}

/// Observable phase of a stored game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Paired; neither player has revealed.
    Matched,
    /// Exactly one player has revealed and the deadline is running.
    OneRevealed(Slot),
    /// Both reveals present. Only transiently observable during settlement.
    BothRevealed,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched => write!(f, "MATCHED"),
            Self::OneRevealed(slot) => write!(f, "ONE_REVEALED({slot})"),
            Self::BothRevealed => write!(f, "BOTH_REVEALED"),
        }
    }
}

/// An in-flight two-player game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Each player's stake. Both sides are equal by construction.
    pub stake: Stake,
    /// Set by the first reveal. `None` while nobody has revealed.
    pub deadline: Option<DateTime<Utc>>,
    pub players: [PlayerSlot; 2],
}

impl Game {
    #[must_use]
    pub fn new(id: GameId, stake: Stake, first: Commitment, second: Commitment) -> Self {
        Self {
            id,
            stake,
            deadline: None,
            players: [PlayerSlot::new(first), PlayerSlot::new(second)],
        }
    }

    #[must_use]
    pub fn slot(&self, slot: Slot) -> &PlayerSlot {
        &self.players[slot.index()]
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut PlayerSlot {
        &mut self.players[slot.index()]
    }

    /// Which slot a commitment belongs to.
    #[must_use]
    pub fn slot_of(&self, commitment: &Commitment) -> Option<Slot> {
        [Slot::First, Slot::Second]
            .into_iter()
            .find(|s| self.slot(*s).commitment == *commitment)
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        match (
            self.slot(Slot::First).has_revealed(),
            self.slot(Slot::Second).has_revealed(),
        ) {
            (false, false) => GamePhase::Matched,
            (true, false) => GamePhase::OneRevealed(Slot::First),
            (false, true) => GamePhase::OneRevealed(Slot::Second),
            (true, true) => GamePhase::BothRevealed,
        }
    }

    /// Whether a claim made at `now` finds the deadline passed.
    ///
    /// The boundary itself is not expired: `now` must be strictly later.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }
}
