//! Identifiers used throughout DiceMatch.
//!
//! Players are identified by a UUID supplied by the host. Offers and games
//! get monotonically increasing integer ids that are never reused.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// Unique identifier for a principal holding an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OfferId
// ---------------------------------------------------------------------------

/// Identifier of a wager offer, assigned by the offer book on insertion.
/// The first offer is `offer:1`; `offer:0` is never issued.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct OfferId(pub u64);

impl OfferId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// GameId
// ---------------------------------------------------------------------------

/// Identifier of a two-player game. The first game created is `game:1`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct GameId(pub u64);

impl GameId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_uniqueness() {
        let a = PlayerId::new();
        let b = PlayerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn player_id_from_bytes_is_stable() {
        let a = PlayerId::from_bytes([9; 16]);
        let b = PlayerId::from_bytes([9; 16]);
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[9; 16]);
    }

    #[test]
    fn offer_and_game_ids_advance() {
        assert_eq!(OfferId(5).next(), OfferId(6));
        assert_eq!(GameId(0).next(), GameId(1));
    }

    #[test]
    fn display_prefixes() {
        assert_eq!(OfferId(3).to_string(), "offer:3");
        assert_eq!(GameId(12).to_string(), "game:12");
    }
}
