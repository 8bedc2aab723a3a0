//! Atomic game settlement.
//!
//! Settling a game:
//! 1. Remove the game from the table
//! 2. Resolve both offers through their commitments
//! 3. Credit the winner with both stakes
//! 4. Close the game on both accounts, dropping the loser's if now empty
//! 5. Delete both offers
//! 6. Emit a [`SettlementReceipt`]
//!
//! A failure midway leaves the three stores partially updated. Callers run
//! settlement against staged copies and discard them on error.

use chrono::{DateTime, Utc};
use dicematch_ledger::Ledger;
use dicematch_matchcore::OfferBook;
use dicematch_types::{
    Digest256, DicematchError, Game, GameId, Offer, Resolution, Result, SettlementReceipt, Slot,
    constants,
};
use rust_decimal::Decimal;

use crate::GameTable;

/// Who won a game and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub game_id: GameId,
    pub winning_slot: Slot,
    pub resolution: Resolution,
    /// Present for revealed games, `None` for forfeits.
    pub outcome_digest: Option<Digest256>,
}

/// Pay out and delete a game together with both of its offers.
///
/// # Errors
/// - `GameNotFound` if the game is not stored
/// - `GameStateError` if a slot's offer is missing or points elsewhere
/// - Ledger errors (`UnknownAccount`, `CounterUnderflow`) on corrupted counters
pub fn settle(
    ledger: &mut Ledger,
    book: &mut OfferBook,
    games: &mut GameTable,
    verdict: Verdict,
    now: DateTime<Utc>,
) -> Result<SettlementReceipt> {
    let game = games.remove(verdict.game_id)?;
    let winner = slot_offer(book, &game, verdict.winning_slot)?.clone();
    let loser = slot_offer(book, &game, verdict.winning_slot.other())?.clone();

    let payout = game
        .stake
        .with_amount(game.stake.amount * Decimal::from(constants::PAYOUT_MULTIPLIER));

    ledger.release(winner.owner, payout.amount)?;
    ledger.close_game(winner.owner)?;
    ledger.close_game(loser.owner)?;
    ledger.remove_if_empty(loser.owner);

    book.remove(winner.id)?;
    book.remove(loser.id)?;

    tracing::info!(
        game = %game.id,
        resolution = %verdict.resolution,
        winner = %winner.owner,
        slot = %verdict.winning_slot,
        loser = %loser.owner,
        payout = %payout,
        "Game settled"
    );

    Ok(SettlementReceipt {
        game_id: game.id,
        resolution: verdict.resolution,
        winner: winner.owner,
        winning_slot: verdict.winning_slot,
        loser: loser.owner,
        payout,
        outcome_digest: verdict.outcome_digest,
        settled_at: now,
    })
}

fn slot_offer<'b>(book: &'b OfferBook, game: &Game, slot: Slot) -> Result<&'b Offer> {
    let commitment = &game.slot(slot).commitment;
    let offer = book
        .by_commitment(commitment)
        .ok_or_else(|| DicematchError::GameStateError {
            game_id: game.id,
            reason: format!("{slot} offer {commitment} missing"),
        })?;
    if offer.game_id() != Some(game.id) {
        return Err(DicematchError::GameStateError {
            game_id: game.id,
            reason: format!("{slot} offer {} is {}", offer.id, offer.state),
        });
    }
    Ok(offer)
}
