//! Engine state and the state transitions behind each call.
//!
//! Every method here mutates `self` freely and may fail halfway. The
//! engine only ever calls them on a staged clone, so a failure never
//! reaches the committed state.

use chrono::{DateTime, Duration, Utc};
use dicematch_ledger::Ledger;
use dicematch_matchcore::{MatchDecision, OfferBook, find_counter_offer};
use dicematch_settlement::{
    Custody, GameTable, RevealStep, SupplyConservation, Verdict, forfeit_winner, outcome_digest,
    record_reveal, settle, winning_slot,
};
use dicematch_types::{
    AssetConfig, Authorizer, Call, Commitment, DicematchError, GameId, Hasher256, Offer, OfferState,
    PlayerId, Resolution, Result, Secret, SettlementReceipt, Stake, TransferEndpoint,
    TransferRecord, require_auth, verify_reveal,
};

use crate::{OfferOutcome, RevealOutcome};

/// The four record stores plus the conservation tracker.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub(crate) ledger: Ledger,
    pub(crate) book: OfferBook,
    pub(crate) games: GameTable,
    pub(crate) supply: SupplyConservation,
}

impl EngineState {
    // =================================================================
    // Offers
    // =================================================================

    pub(crate) fn offer_bet(
        &mut self,
        asset: &AssetConfig,
        auth: &dyn Authorizer,
        stake: Stake,
        player: PlayerId,
        commitment: Commitment,
    ) -> Result<OfferOutcome> {
        asset
            .check(&stake)
            .map_err(|reason| DicematchError::InvalidStake { reason })?;
        if self.book.contains_commitment(&commitment) {
            return Err(DicematchError::DuplicateCommitment(commitment));
        }
        let call = Call::OfferBet {
            stake: stake.clone(),
            player,
            commitment,
        };
        require_auth(auth, &player, &call)?;
        if !self.ledger.contains(&player) {
            return Err(DicematchError::UnknownAccount(player));
        }

        let amount = stake.amount;
        let offer_id = self.book.insert(player, stake.clone(), commitment)?;
        self.ledger.hold(player, amount)?;

        match find_counter_offer(&self.book, amount, player) {
            MatchDecision::Queue => {
                self.ledger.open_offer(player)?;
                tracing::info!(offer = %offer_id, player = %player, %stake, "Offer queued");
                Ok(OfferOutcome::Queued { offer_id })
            }
            MatchDecision::Pair { counter } => {
                let queued = self.book.get(counter).cloned().ok_or_else(|| {
                    DicematchError::Internal(format!("matcher returned unknown {counter}"))
                })?;
                let game_id = self.games.create(stake.clone(), queued.commitment, commitment);
                self.book.mark_matched(counter, game_id)?;
                self.book.mark_matched(offer_id, game_id)?;
                self.ledger.close_offer(queued.owner)?;
                self.ledger.open_game(queued.owner)?;
                self.ledger.open_game(player)?;
                tracing::info!(
                    game = %game_id,
                    player1 = %queued.owner,
                    player2 = %player,
                    %stake,
                    "Game created"
                );
                Ok(OfferOutcome::Matched { offer_id, game_id })
            }
        }
    }

    pub(crate) fn cancel_offer(
        &mut self,
        auth: &dyn Authorizer,
        commitment: Commitment,
    ) -> Result<Offer> {
        let offer = self
            .book
            .by_commitment(&commitment)
            .cloned()
            .ok_or(DicematchError::OfferNotFound(commitment))?;
        if let OfferState::Matched { game_id } = offer.state {
            return Err(DicematchError::NotCancelable {
                offer_id: offer.id,
                game_id,
            });
        }
        require_auth(auth, &offer.owner, &Call::CancelOffer { commitment })?;

        self.ledger.release(offer.owner, offer.stake.amount)?;
        self.ledger.close_offer(offer.owner)?;
        let removed = self.book.remove(offer.id)?;
        tracing::info!(offer = %removed.id, player = %removed.owner, stake = %removed.stake, "Offer cancelled");
        Ok(removed)
    }

    // =================================================================
    // Games
    // =================================================================

    pub(crate) fn reveal(
        &mut self,
        hasher: &dyn Hasher256,
        now: DateTime<Utc>,
        window: Duration,
        commitment: Commitment,
        secret: Secret,
    ) -> Result<RevealOutcome> {
        verify_reveal(hasher, &commitment, &secret)?;
        let offer = self
            .book
            .by_commitment(&commitment)
            .ok_or(DicematchError::OfferNotFound(commitment))?;
        let game_id = offer.game_id().ok_or(DicematchError::NotInGame(offer.id))?;

        let game = self
            .games
            .get_mut(game_id)
            .map_err(|_| DicematchError::GameStateError {
                game_id,
                reason: format!("matched offer {commitment} has no game"),
            })?;
        let slot = game
            .slot_of(&commitment)
            .ok_or_else(|| DicematchError::GameStateError {
                game_id,
                reason: format!("commitment {commitment} not seated"),
            })?;

        match record_reveal(game, slot, secret, now, window)? {
            RevealStep::Recorded { deadline } => {
                tracing::info!(game = %game_id, %slot, %deadline, "Reveal recorded");
                Ok(RevealOutcome::Recorded { game_id, deadline })
            }
            RevealStep::Complete => {
                let digest = outcome_digest(hasher, game)?;
                let verdict = Verdict {
                    game_id,
                    winning_slot: winning_slot(&digest),
                    resolution: Resolution::Revealed,
                    outcome_digest: Some(digest),
                };
                self.settle(verdict, now).map(RevealOutcome::Settled)
            }
        }
    }

    pub(crate) fn claim_expired(
        &mut self,
        now: DateTime<Utc>,
        game_id: GameId,
    ) -> Result<SettlementReceipt> {
        let game = self
            .games
            .get(game_id)
            .ok_or(DicematchError::GameNotFound(game_id))?;
        let winning_slot = forfeit_winner(game, now)?;
        self.settle(
            Verdict {
                game_id,
                winning_slot,
                resolution: Resolution::Forfeit,
                outcome_digest: None,
            },
            now,
        )
    }

    fn settle(&mut self, verdict: Verdict, now: DateTime<Utc>) -> Result<SettlementReceipt> {
        settle(
            &mut self.ledger,
            &mut self.book,
            &mut self.games,
            verdict,
            now,
        )
    }

    // =================================================================
    // Funds
    // =================================================================

    pub(crate) fn deposit(
        &mut self,
        asset: &AssetConfig,
        from: PlayerId,
        amount: &Stake,
    ) -> Result<TransferRecord> {
        asset
            .check(amount)
            .map_err(|reason| DicematchError::InvalidAmount { reason })?;
        self.ledger.deposit(from, amount.amount)?;
        self.supply.record_deposit(amount.amount)?;
        Ok(TransferRecord {
            from: TransferEndpoint::Player(from),
            to: TransferEndpoint::Custody,
            stake: amount.clone(),
        })
    }

    pub(crate) fn withdraw(
        &mut self,
        asset: &AssetConfig,
        auth: &dyn Authorizer,
        to: PlayerId,
        amount: &Stake,
    ) -> Result<TransferRecord> {
        asset
            .check(amount)
            .map_err(|reason| DicematchError::InvalidAmount { reason })?;
        let call = Call::Withdraw {
            to,
            amount: amount.clone(),
        };
        require_auth(auth, &to, &call)?;
        self.ledger.withdraw(to, amount.amount)?;
        self.supply.record_withdrawal(amount.amount);
        Ok(TransferRecord {
            from: TransferEndpoint::Custody,
            to: TransferEndpoint::Player(to),
            stake: amount.clone(),
        })
    }

    // =================================================================
    // Conservation
    // =================================================================

    pub(crate) fn custody(&self) -> Custody {
        Custody {
            balances: self.ledger.total_balance(),
            open_offers: self.book.open_total(),
            games: self.games.staked_total(),
        }
    }

    pub(crate) fn verify_supply(&self) -> Result<()> {
        self.supply.verify(&self.custody())
    }
}

#[cfg(test)]
mod tests {
    use dicematch_types::{Sha256Hasher, SignerSet};
    use rust_decimal::Decimal;

    use super::*;

    fn stake(n: i64) -> Stake {
        Stake::new("SYS", Decimal::new(n, 0))
    }

    #[test]
    fn offer_checks_run_in_order() {
        let mut state = EngineState::default();
        let asset = AssetConfig::default();
        let alice = PlayerId::new();
        let c = Secret::from_seed(1).commit(&Sha256Hasher);

        // Bad stake is reported before authorization.
        let err = state
            .offer_bet(&asset, &SignerSet::none(), stake(0), alice, c)
            .unwrap_err();
        assert!(matches!(err, DicematchError::InvalidStake { .. }));

        let err = state
            .offer_bet(&asset, &SignerSet::none(), stake(1), alice, c)
            .unwrap_err();
        assert!(matches!(err, DicematchError::Unauthorized(_)));

        let err = state
            .offer_bet(&asset, &SignerSet::single(alice), stake(1), alice, c)
            .unwrap_err();
        assert!(matches!(err, DicematchError::UnknownAccount(_)));
    }

    #[test]
    fn custody_tracks_every_bucket() {
        let mut state = EngineState::default();
        let asset = AssetConfig::default();
        let (alice, bob, carol) = (PlayerId::new(), PlayerId::new(), PlayerId::new());
        for p in [alice, bob, carol] {
            state.deposit(&asset, p, &stake(10)).unwrap();
        }
        let seed = |n| Secret::from_seed(n).commit(&Sha256Hasher);
        state
            .offer_bet(&asset, &SignerSet::single(alice), stake(4), alice, seed(1))
            .unwrap();
        state
            .offer_bet(&asset, &SignerSet::single(bob), stake(4), bob, seed(2))
            .unwrap();
        state
            .offer_bet(&asset, &SignerSet::single(carol), stake(3), carol, seed(3))
            .unwrap();

        let custody = state.custody();
        assert_eq!(custody.balances, Decimal::new(19, 0));
        assert_eq!(custody.open_offers, Decimal::new(3, 0));
        assert_eq!(custody.games, Decimal::new(8, 0));
        assert!(state.verify_supply().is_ok());
    }
}
