//! The engine façade.
//!
//! Each public call follows the same path:
//! 1. Clone the committed state
//! 2. Apply the call to the clone
//! 3. Verify supply conservation on the clone (if enabled)
//! 4. Perform the external transfer, if the call has one
//! 5. Swap the clone in
//!
//! Any failure before step 5 drops the clone, leaving the committed state
//! exactly as it was.

use dicematch_settlement::Custody;
use dicematch_types::{
    Account, AssetTransfer, Authorizer, Clock, Commitment, Digest256, EngineConfig, ErrorKind,
    Game, GameId, Hasher256, Offer, PlayerId, Result, Secret, SettlementReceipt, Sha256Hasher,
    Stake, SystemClock, TransferRecord, constants,
};
use rust_decimal::Decimal;

use crate::state::EngineState;
use crate::{OfferOutcome, RevealOutcome, state_root};

/// Capabilities the host lends the engine.
pub struct HostServices {
    pub clock: Box<dyn Clock>,
    pub hasher: Box<dyn Hasher256>,
    pub transfer: Box<dyn AssetTransfer>,
}

impl HostServices {
    #[must_use]
    pub fn new(
        clock: Box<dyn Clock>,
        hasher: Box<dyn Hasher256>,
        transfer: Box<dyn AssetTransfer>,
    ) -> Self {
        Self {
            clock,
            hasher,
            transfer,
        }
    }

    /// Wall clock and SHA-256 around the given transfer service.
    #[must_use]
    pub fn system(transfer: Box<dyn AssetTransfer>) -> Self {
        Self::new(Box::new(SystemClock), Box::new(Sha256Hasher), transfer)
    }
}

/// A single-asset commit-reveal wagering engine.
///
/// Calls take `&mut self`: the host serializes them.
pub struct DiceEngine {
    config: EngineConfig,
    state: EngineState,
    host: HostServices,
}

impl DiceEngine {
    /// # Errors
    /// `Configuration` if `config` fails validation.
    pub fn new(config: EngineConfig, host: HostServices) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            version = constants::VERSION,
            asset = %config.asset.symbol,
            precision = config.asset.precision,
            reveal_window_secs = config.reveal_window_secs,
            "{} engine started", constants::ENGINE_NAME
        );
        Ok(Self {
            config,
            state: EngineState::default(),
            host,
        })
    }

    // =================================================================
    // Calls
    // =================================================================

    /// Queue a wager, or pair it with the oldest open offer of the same
    /// amount from another player.
    pub fn offerbet(
        &mut self,
        auth: &dyn Authorizer,
        stake: Stake,
        player: PlayerId,
        commitment: Commitment,
    ) -> Result<OfferOutcome> {
        let mut staged = self.state.clone();
        let result = staged.offer_bet(&self.config.asset, auth, stake, player, commitment);
        self.commit("offerbet", staged, result.map(|o| (o, None)))
    }

    /// Withdraw an unmatched offer and refund its stake. Returns the
    /// removed offer.
    pub fn canceloffer(&mut self, auth: &dyn Authorizer, commitment: Commitment) -> Result<Offer> {
        let mut staged = self.state.clone();
        let result = staged.cancel_offer(auth, commitment);
        self.commit("canceloffer", staged, result.map(|o| (o, None)))
    }

    /// Disclose the secret behind `commitment`. Settles the game if the
    /// opponent has already revealed.
    pub fn reveal(&mut self, commitment: Commitment, secret: Secret) -> Result<RevealOutcome> {
        let now = self.host.clock.now();
        let mut staged = self.state.clone();
        let result = self.config.reveal_window().and_then(|window| {
            staged.reveal(&*self.host.hasher, now, window, commitment, secret)
        });
        self.commit("reveal", staged, result.map(|o| (o, None)))
    }

    /// Settle a game whose opponent failed to reveal in time. Anyone may
    /// call this; the revealer is paid.
    pub fn claimexpired(&mut self, game_id: GameId) -> Result<SettlementReceipt> {
        let now = self.host.clock.now();
        let mut staged = self.state.clone();
        let result = staged.claim_expired(now, game_id);
        self.commit("claimexpired", staged, result.map(|r| (r, None)))
    }

    /// Credit `from` and pull the funds into custody.
    pub fn deposit(&mut self, from: PlayerId, amount: Stake) -> Result<()> {
        let mut staged = self.state.clone();
        let result = staged.deposit(&self.config.asset, from, &amount);
        self.commit("deposit", staged, result.map(|t| ((), Some(t))))?;
        tracing::info!(player = %from, %amount, "Deposit credited");
        Ok(())
    }

    /// Debit `to` and pay the funds out of custody.
    pub fn withdraw(&mut self, auth: &dyn Authorizer, to: PlayerId, amount: Stake) -> Result<()> {
        let mut staged = self.state.clone();
        let result = staged.withdraw(&self.config.asset, auth, to, &amount);
        self.commit("withdraw", staged, result.map(|t| ((), Some(t))))?;
        tracing::info!(player = %to, %amount, "Withdrawal paid");
        Ok(())
    }

    /// Steps 3 to 5 for a call that produced `result` on `staged`.
    fn commit<T>(
        &mut self,
        call: &'static str,
        staged: EngineState,
        result: Result<(T, Option<TransferRecord>)>,
    ) -> Result<T> {
        let outcome = result
            .and_then(|staged_value| {
                if self.config.verify_supply {
                    staged.verify_supply()?;
                }
                Ok(staged_value)
            })
            .and_then(|(value, transfer)| {
                if let Some(t) = transfer {
                    self.host.transfer.transfer(t.from, t.to, &t.stake)?;
                }
                Ok(value)
            });

        match outcome {
            Ok(value) => {
                self.state = staged;
                Ok(value)
            }
            Err(e) => {
                if e.kind() == ErrorKind::InvariantViolation {
                    tracing::error!(call, error = %e, "Invariant violated; call rolled back");
                } else {
                    tracing::warn!(call, kind = %e.kind(), error = %e, "Call rejected");
                }
                Err(e)
            }
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn account(&self, owner: &PlayerId) -> Option<&Account> {
        self.state.ledger.account(owner)
    }

    /// Spendable balance, zero for unknown players.
    #[must_use]
    pub fn balance(&self, owner: &PlayerId) -> Decimal {
        self.state.ledger.balance(owner)
    }

    #[must_use]
    pub fn offer_by_commitment(&self, commitment: &Commitment) -> Option<&Offer> {
        self.state.book.by_commitment(commitment)
    }

    #[must_use]
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.state.games.get(id)
    }

    /// Unmatched offers in id order.
    pub fn open_offers(&self) -> impl Iterator<Item = &Offer> {
        self.state.book.open_offers()
    }

    /// Unsettled games in id order.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.state.games.games()
    }

    /// Where custodied funds sit right now.
    #[must_use]
    pub fn custody(&self) -> Custody {
        self.state.custody()
    }

    /// Everything the engine holds on behalf of players.
    #[must_use]
    pub fn total_custody(&self) -> Decimal {
        self.state.custody().total()
    }

    /// Deposits minus withdrawals since the engine started.
    #[must_use]
    pub fn expected_supply(&self) -> Decimal {
        self.state.supply.expected_supply()
    }

    /// Deterministic fingerprint of the whole state.
    #[must_use]
    pub fn state_root(&self) -> Digest256 {
        state_root::compute(&self.state)
    }

    #[must_use]
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }

    /// Run the conservation check against committed state.
    ///
    /// # Errors
    /// `SupplyInvariantViolation`.
    pub fn verify_supply(&self) -> Result<()> {
        self.state.verify_supply()
    }
}

impl std::fmt::Debug for DiceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiceEngine")
            .field("config", &self.config)
            .field("accounts", &self.state.ledger.len())
            .field("offers", &self.state.book.len())
            .field("games", &self.state.games.len())
            .finish_non_exhaustive()
    }
}
