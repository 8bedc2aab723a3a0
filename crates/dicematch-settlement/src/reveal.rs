//! Commit-reveal transitions on a stored game.
//!
//! Both functions are pure with respect to the ledger and the book: they
//! only touch the [`Game`] they are handed, so the caller decides when to
//! settle.

use chrono::{DateTime, Duration, Utc};
use dicematch_types::{DicematchError, Game, GamePhase, Result, Secret, Slot};

/// Result of recording one reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// First reveal in the game. The other player must reveal by `deadline`.
    Recorded { deadline: DateTime<Utc> },
    /// Both players have now revealed; the game is ready to settle.
    Complete,
}

/// Store `secret` in `slot`. The caller has already verified it against
/// the slot's commitment.
///
/// The deadline is only set by the first reveal. A second reveal arriving
/// after it still completes the game as long as nobody claimed the expiry.
///
/// # Errors
/// - `AlreadyRevealed` if `slot` already holds a reveal
/// - `Configuration` if `now + window` is past the representable range
pub fn record_reveal(
    game: &mut Game,
    slot: Slot,
    secret: Secret,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<RevealStep> {
    if game.slot(slot).has_revealed() {
        return Err(DicematchError::AlreadyRevealed(game.id));
    }
    if game.slot(slot.other()).has_revealed() {
        game.slot_mut(slot).reveal = Some(secret);
        return Ok(RevealStep::Complete);
    }

    let deadline = now.checked_add_signed(window).ok_or_else(|| {
        DicematchError::Configuration(format!(
            "reveal deadline {now} + {window} is out of range"
        ))
    })?;
    game.slot_mut(slot).reveal = Some(secret);
    game.deadline = Some(deadline);
    Ok(RevealStep::Recorded { deadline })
}

/// The slot that wins by forfeit if the game can be claimed at `now`.
///
/// # Errors
/// - `NotExpired` unless a deadline is set and `now` is strictly past it
/// - `GameStateError` unless exactly one slot has revealed
pub fn forfeit_winner(game: &Game, now: DateTime<Utc>) -> Result<Slot> {
    if !game.is_expired_at(now) {
        return Err(DicematchError::NotExpired(game.id));
    }
    match game.phase() {
        GamePhase::OneRevealed(revealer) => Ok(revealer),
        phase => Err(DicematchError::GameStateError {
            game_id: game.id,
            reason: format!("expired game in phase {phase}"),
        }),
    }
}
