//! The offer book.
//!
//! Primary store plus two secondary indices, kept consistent on every
//! insert/update/delete:
//! - **Offers**: `BTreeMap<OfferId, Offer>` -- every open or matched offer
//! - **By amount**: `BTreeMap<Decimal, StakeLevel>` -- open offers only, lowest amount first
//! - **By commitment**: `HashMap<Commitment, OfferId>` -- every offer, for reveal and cancel

use std::collections::{BTreeMap, HashMap};

use dicematch_types::{
    Commitment, DicematchError, GameId, Offer, OfferId, OfferState, PlayerId, Result, Stake,
};
use rust_decimal::Decimal;

use crate::stake_level::StakeLevel;

/// All wager offers, open and matched.
#[derive(Debug, Clone, Default)]
pub struct OfferBook {
    offers: BTreeMap<OfferId, Offer>,
    /// Open offers grouped by amount, FIFO within a level.
    by_amount: BTreeMap<Decimal, StakeLevel>,
    by_commitment: HashMap<Commitment, OfferId>,
    /// Last id handed out. Ids are never reused.
    last_id: OfferId,
}

impl OfferBook {
    /// Create a new empty offer book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Insertion
    // =================================================================

    /// Queue a new open offer and return its id.
    ///
    /// # Errors
    /// `DuplicateCommitment` if any offer already carries `commitment`.
    pub fn insert(
        &mut self,
        owner: PlayerId,
        stake: Stake,
        commitment: Commitment,
    ) -> Result<OfferId> {
        if self.by_commitment.contains_key(&commitment) {
            return Err(DicematchError::DuplicateCommitment(commitment));
        }

        let id = self.last_id.next();
        self.last_id = id;

        let amount = stake.amount;
        self.by_amount
            .entry(amount)
            .or_insert_with(|| StakeLevel::new(amount))
            .push_back(id, owner);
        self.by_commitment.insert(commitment, id);
        self.offers
            .insert(id, Offer::open(id, owner, stake, commitment));

        tracing::debug!(offer = %id, player = %owner, %amount, "Offer indexed");
        Ok(id)
    }

    // =================================================================
    // State changes
    // =================================================================

    /// Move an open offer into a game. It leaves the amount index but stays
    /// reachable by commitment.
    ///
    /// # Errors
    /// `Internal` if the offer is missing or already matched.
    pub fn mark_matched(&mut self, id: OfferId, game_id: GameId) -> Result<()> {
        let offer = self
            .offers
            .get_mut(&id)
            .ok_or_else(|| DicematchError::Internal(format!("{id} missing from book")))?;
        let OfferState::Open { amount } = offer.state else {
            return Err(DicematchError::Internal(format!(
                "{id} is already {}",
                offer.state
            )));
        };

        Self::unlink_level(&mut self.by_amount, amount, id)?;
        offer.state = OfferState::Matched { game_id };
        Ok(())
    }

    /// Delete an offer and all of its index entries.
    ///
    /// # Errors
    /// `Internal` if the offer is missing.
    pub fn remove(&mut self, id: OfferId) -> Result<Offer> {
        let offer = self
            .offers
            .remove(&id)
            .ok_or_else(|| DicematchError::Internal(format!("{id} missing from book")))?;
        self.by_commitment.remove(&offer.commitment);
        if let OfferState::Open { amount } = offer.state {
            Self::unlink_level(&mut self.by_amount, amount, id)?;
        }
        Ok(offer)
    }

    fn unlink_level(
        by_amount: &mut BTreeMap<Decimal, StakeLevel>,
        amount: Decimal,
        id: OfferId,
    ) -> Result<()> {
        let level = by_amount.get_mut(&amount).ok_or_else(|| {
            DicematchError::Internal(format!("no level at {amount} for {id}"))
        })?;
        level.remove_offer(id).ok_or_else(|| {
            DicematchError::Internal(format!("{id} missing from level {amount}"))
        })?;
        if level.is_empty() {
            by_amount.remove(&amount);
        }
        Ok(())
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, id: OfferId) -> Option<&Offer> {
        self.offers.get(&id)
    }

    /// Look up an offer (open or matched) by its commitment.
    #[must_use]
    pub fn by_commitment(&self, commitment: &Commitment) -> Option<&Offer> {
        self.by_commitment
            .get(commitment)
            .and_then(|id| self.offers.get(id))
    }

    #[must_use]
    pub fn contains_commitment(&self, commitment: &Commitment) -> bool {
        self.by_commitment.contains_key(commitment)
    }

    /// Open offers at exactly `amount`, oldest first.
    #[must_use]
    pub fn level(&self, amount: Decimal) -> Option<&StakeLevel> {
        self.by_amount.get(&amount)
    }

    /// Iterate open levels from lowest to highest amount.
    pub fn levels(&self) -> impl Iterator<Item = &StakeLevel> {
        self.by_amount.values()
    }

    /// All offers in id order.
    pub fn offers(&self) -> impl Iterator<Item = &Offer> {
        self.offers.values()
    }

    /// Open offers in id order.
    pub fn open_offers(&self) -> impl Iterator<Item = &Offer> {
        self.offers.values().filter(|o| o.is_open())
    }

    /// Stakes held by open offers.
    #[must_use]
    pub fn open_total(&self) -> Decimal {
        self.open_offers().map(|o| o.stake.amount).sum()
    }

    /// Total number of offers (open and matched).
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Most recently issued offer id, `offer:0` before the first insert.
    #[must_use]
    pub fn last_id(&self) -> OfferId {
        self.last_id
    }
}

#[cfg(test)]
mod tests {
    use dicematch_types::{Hasher256, Secret, Sha256Hasher};

    use super::*;

    fn stake(n: i64) -> Stake {
        Stake::new("SYS", Decimal::new(n, 0))
    }

    fn commitment(seed: u8) -> Commitment {
        Secret::from_seed(seed).commit(&Sha256Hasher as &dyn Hasher256)
    }

    #[test]
    fn insert_indexes_by_amount_and_commitment() {
        let mut book = OfferBook::new();
        let owner = PlayerId::new();
        let id = book.insert(owner, stake(10), commitment(1)).unwrap();

        assert_eq!(book.len(), 1);
        assert_eq!(book.by_commitment(&commitment(1)).unwrap().id, id);
        assert_eq!(book.level(Decimal::TEN).unwrap().len(), 1);
        assert_eq!(book.open_total(), Decimal::TEN);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut book = OfferBook::new();
        let owner = PlayerId::new();
        let a = book.insert(owner, stake(10), commitment(1)).unwrap();
        book.remove(a).unwrap();
        let b = book.insert(owner, stake(10), commitment(1)).unwrap();
        assert_eq!(a, OfferId(1));
        assert_eq!(b, OfferId(2));
        assert_eq!(book.last_id(), b);
    }

    #[test]
    fn duplicate_commitment_rejected() {
        let mut book = OfferBook::new();
        book.insert(PlayerId::new(), stake(10), commitment(1)).unwrap();
        let err = book
            .insert(PlayerId::new(), stake(20), commitment(1))
            .unwrap_err();
        assert!(matches!(err, DicematchError::DuplicateCommitment(_)));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn mark_matched_leaves_amount_index_only() {
        let mut book = OfferBook::new();
        let id = book.insert(PlayerId::new(), stake(10), commitment(1)).unwrap();
        book.mark_matched(id, GameId(1)).unwrap();

        assert!(book.level(Decimal::TEN).is_none(), "empty level dropped");
        let offer = book.by_commitment(&commitment(1)).unwrap();
        assert_eq!(offer.game_id(), Some(GameId(1)));
        assert_eq!(book.open_total(), Decimal::ZERO);
        assert!(book.contains_commitment(&commitment(1)));
    }

    #[test]
    fn mark_matched_twice_is_internal_error() {
        let mut book = OfferBook::new();
        let id = book.insert(PlayerId::new(), stake(10), commitment(1)).unwrap();
        book.mark_matched(id, GameId(1)).unwrap();
        let err = book.mark_matched(id, GameId(2)).unwrap_err();
        assert!(matches!(err, DicematchError::Internal(_)));
    }

    #[test]
    fn remove_clears_every_index() {
        let mut book = OfferBook::new();
        let id = book.insert(PlayerId::new(), stake(10), commitment(1)).unwrap();
        let removed = book.remove(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(book.is_empty());
        assert!(book.level(Decimal::TEN).is_none());
        assert!(!book.contains_commitment(&commitment(1)));
        assert!(book.remove(id).is_err());
    }

    #[test]
    fn levels_iterate_lowest_first() {
        let mut book = OfferBook::new();
        for (seed, amount) in [(1, 30), (2, 10), (3, 20)] {
            book.insert(PlayerId::new(), stake(amount), commitment(seed))
                .unwrap();
        }
        let amounts: Vec<Decimal> = book.levels().map(|l| l.amount).collect();
        assert_eq!(
            amounts,
            vec![Decimal::new(10, 0), Decimal::new(20, 0), Decimal::new(30, 0)]
        );
    }

    #[test]
    fn equal_amounts_with_different_scale_share_a_level() {
        let mut book = OfferBook::new();
        book.insert(PlayerId::new(), stake(10), commitment(1)).unwrap();
        book.insert(
            PlayerId::new(),
            Stake::new("SYS", Decimal::new(10_000, 3)),
            commitment(2),
        )
        .unwrap();
        assert_eq!(book.levels().count(), 1);
        assert_eq!(book.level(Decimal::TEN).unwrap().len(), 2);
    }
}
