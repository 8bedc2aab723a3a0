//! Exact-amount FIFO matcher.
//!
//! ```text
//! find_counter_offer(book, amount, player) -> MatchDecision
//! ```
//!
//! The newcomer pairs with the earliest queued open offer at exactly the
//! same amount whose owner is someone else. Offers from the same player
//! are skipped, not treated as a blocker: the scan continues down the
//! level.

use dicematch_types::{OfferId, PlayerId};
use rust_decimal::Decimal;

use crate::OfferBook;

/// What to do with a newly inserted offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// No compatible offer; leave the new offer queued.
    Queue,
    /// Pair with this queued offer.
    Pair { counter: OfferId },
}

/// Pure lookup of the counter-offer for a stake of `amount` from `player`.
///
/// Works whether or not the newcomer is already in the book: its own entry
/// is skipped by the same-owner rule.
#[must_use]
pub fn find_counter_offer(book: &OfferBook, amount: Decimal, player: PlayerId) -> MatchDecision {
    let Some(level) = book.level(amount) else {
        return MatchDecision::Queue;
    };

    for queued in level.iter() {
        if queued.owner == player {
            tracing::debug!(
                player = %player,
                offer = %queued.id,
                %amount,
                "Self-match skipped: same player at this amount"
            );
            continue;
        }
        return MatchDecision::Pair { counter: queued.id };
    }
    MatchDecision::Queue
}
