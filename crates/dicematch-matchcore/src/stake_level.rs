//! A single stake level in the offer book.
//!
//! Open offers at the same amount are stored in FIFO order (time priority)
//! using a [`VecDeque`].

use std::collections::VecDeque;

use dicematch_types::{OfferId, PlayerId};
use rust_decimal::Decimal;

/// A queued offer as seen by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedOffer {
    pub id: OfferId,
    pub owner: PlayerId,
}

/// All open offers at one stake amount.
///
/// The front of the deque is the oldest offer and has the highest priority.
#[derive(Debug, Clone)]
pub struct StakeLevel {
    /// The amount at this level.
    pub amount: Decimal,
    /// Offers in arrival order (front = oldest = highest priority).
    pub offers: VecDeque<QueuedOffer>,
}

impl StakeLevel {
    /// Create a new empty level.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            offers: VecDeque::new(),
        }
    }

    /// Add an offer to the back of this level (lowest priority).
    pub fn push_back(&mut self, id: OfferId, owner: PlayerId) {
        self.offers.push_back(QueuedOffer { id, owner });
    }

    /// Peek at the oldest offer.
    #[must_use]
    pub fn front(&self) -> Option<&QueuedOffer> {
        self.offers.front()
    }

    /// Remove a specific offer by ID. Returns it, or `None`.
    pub fn remove_offer(&mut self, id: OfferId) -> Option<QueuedOffer> {
        let pos = self.offers.iter().position(|o| o.id == id)?;
        self.offers.remove(pos)
    }

    /// Offers from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedOffer> {
        self.offers.iter()
    }

    /// Returns `true` if there are no offers at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Number of offers at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut level = StakeLevel::new(Decimal::TEN);
        level.push_back(OfferId(1), PlayerId::new());
        level.push_back(OfferId(2), PlayerId::new());

        assert_eq!(level.len(), 2);
        assert_eq!(level.front().unwrap().id, OfferId(1), "oldest first");
        let ids: Vec<OfferId> = level.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OfferId(1), OfferId(2)]);
    }

    #[test]
    fn remove_from_middle_keeps_order() {
        let mut level = StakeLevel::new(Decimal::TEN);
        for id in 1..=3 {
            level.push_back(OfferId(id), PlayerId::new());
        }
        let removed = level.remove_offer(OfferId(2)).unwrap();
        assert_eq!(removed.id, OfferId(2));
        let ids: Vec<OfferId> = level.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![OfferId(1), OfferId(3)]);
    }

    #[test]
    fn remove_nonexistent() {
        let mut level = StakeLevel::new(Decimal::TEN);
        level.push_back(OfferId(1), PlayerId::new());
        assert!(level.remove_offer(OfferId(9)).is_none());
        assert_eq!(level.len(), 1);
    }

    #[test]
    fn empty_level() {
        let level = StakeLevel::new(Decimal::ONE);
        assert!(level.is_empty());
        assert!(level.front().is_none());
    }
}
