//! Winner selection for a fully revealed game.
//!
//! ```text
//! digest = H(slot1.commitment || slot1.reveal || slot2.commitment || slot2.reveal)
//! w0     = u64::from_le_bytes(digest[0..8])
//! w1     = u64::from_le_bytes(digest[8..16])
//! winner = if w1 < w0 { slot 1 } else { slot 2 }
//! ```
//!
//! Neither player can bias the digest without knowing the other's secret
//! before committing.

use dicematch_types::{Digest256, DicematchError, Game, Hasher256, Result, Slot};

/// Hash both revealed slots in slot order.
///
/// # Errors
/// `GameStateError` if either slot is unrevealed.
pub fn outcome_digest(hasher: &dyn Hasher256, game: &Game) -> Result<Digest256> {
    let mut preimage = Vec::with_capacity(128);
    for slot in [Slot::First, Slot::Second] {
        let player = game.slot(slot);
        let reveal = player.reveal.ok_or_else(|| DicematchError::GameStateError {
            game_id: game.id,
            reason: format!("{slot} has not revealed"),
        })?;
        preimage.extend_from_slice(player.commitment.as_bytes());
        preimage.extend_from_slice(reveal.as_bytes());
    }
    Ok(hasher.hash(&preimage))
}

/// Apply the word comparison to a digest.
#[must_use]
pub fn winning_slot(digest: &Digest256) -> Slot {
    let mut w0 = [0u8; 8];
    let mut w1 = [0u8; 8];
    w0.copy_from_slice(&digest[0..8]);
    w1.copy_from_slice(&digest[8..16]);
    if u64::from_le_bytes(w1) < u64::from_le_bytes(w0) {
        Slot::First
    } else {
        Slot::Second
    }
}
