//! Per-player balances and activity counters.
//!
//! All mutations are atomic: either the full operation succeeds or the
//! account is unchanged.

use std::collections::BTreeMap;

use dicematch_types::{Account, DicematchError, PlayerId, Result};
use rust_decimal::Decimal;

/// Which activity counter an update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    OpenOffers,
    OpenGames,
}

impl Counter {
    fn name(self) -> &'static str {
        match self {
            Self::OpenOffers => "open_offers",
            Self::OpenGames => "open_games",
        }
    }
}

/// Manages player accounts.
///
/// Accounts are keyed in a `BTreeMap` so iteration order is stable across
/// runs, which the state root depends on.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: BTreeMap<PlayerId, Account>,
}

impl Ledger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    // =================================================================
    // Deposits / withdrawals
    // =================================================================

    /// Credit a deposit, creating the account on first use.
    ///
    /// # Errors
    /// `InvalidAmount` if the balance would overflow. No account is created
    /// in that case.
    pub fn deposit(&mut self, owner: PlayerId, amount: Decimal) -> Result<()> {
        let balance = self.balance(&owner).checked_add(amount).ok_or_else(|| {
            DicematchError::InvalidAmount {
                reason: format!("balance of {owner} overflows when adding {amount}"),
            }
        })?;
        let acct = self
            .accounts
            .entry(owner)
            .or_insert_with(|| Account::new(owner));
        acct.balance = balance;
        tracing::debug!(player = %owner, %amount, %balance, "Deposit credited");
        Ok(())
    }

    /// Debit a withdrawal. Deletes the account if it is now empty.
    ///
    /// Returns `true` if the account record was removed.
    ///
    /// # Errors
    /// `UnknownAccount` or `InsufficientBalance`.
    pub fn withdraw(&mut self, owner: PlayerId, amount: Decimal) -> Result<bool> {
        self.hold(owner, amount)?;
        Ok(self.remove_if_empty(owner))
    }

    // =================================================================
    // Holds
    // =================================================================

    /// Take `amount` out of the spendable balance.
    ///
    /// # Errors
    /// `UnknownAccount` if the player never deposited, `InsufficientBalance`
    /// if the balance would go negative.
    pub fn hold(&mut self, owner: PlayerId, amount: Decimal) -> Result<()> {
        let acct = self.account_mut(owner)?;
        if acct.balance < amount {
            return Err(DicematchError::InsufficientBalance {
                needed: amount,
                available: acct.balance,
            });
        }
        acct.balance -= amount;
        Ok(())
    }

    /// Return `amount` to the spendable balance.
    ///
    /// # Errors
    /// `UnknownAccount`, or `Internal` if the balance would overflow.
    pub fn release(&mut self, owner: PlayerId, amount: Decimal) -> Result<()> {
        let acct = self.account_mut(owner)?;
        acct.balance = acct.balance.checked_add(amount).ok_or_else(|| {
            DicematchError::Internal(format!(
                "balance of {owner} overflows when releasing {amount}"
            ))
        })?;
        Ok(())
    }

    // =================================================================
    // Counters
    // =================================================================

    /// A new offer from `owner` is queued.
    pub fn open_offer(&mut self, owner: PlayerId) -> Result<()> {
        self.bump(owner, Counter::OpenOffers)
    }

    /// A queued offer from `owner` was cancelled or matched.
    pub fn close_offer(&mut self, owner: PlayerId) -> Result<()> {
        self.drop_one(owner, Counter::OpenOffers)
    }

    /// `owner` entered a game.
    pub fn open_game(&mut self, owner: PlayerId) -> Result<()> {
        self.bump(owner, Counter::OpenGames)
    }

    /// A game `owner` was part of has settled.
    pub fn close_game(&mut self, owner: PlayerId) -> Result<()> {
        self.drop_one(owner, Counter::OpenGames)
    }

    fn bump(&mut self, owner: PlayerId, counter: Counter) -> Result<()> {
        let acct = self.account_mut(owner)?;
        match counter {
            Counter::OpenOffers => acct.open_offers += 1,
            Counter::OpenGames => acct.open_games += 1,
        }
        Ok(())
    }

    fn drop_one(&mut self, owner: PlayerId, counter: Counter) -> Result<()> {
        let acct = self.account_mut(owner)?;
        let slot = match counter {
            Counter::OpenOffers => &mut acct.open_offers,
            Counter::OpenGames => &mut acct.open_games,
        };
        *slot = slot
            .checked_sub(1)
            .ok_or(DicematchError::CounterUnderflow {
                player: owner,
                counter: counter.name(),
            })?;
        Ok(())
    }

    // =================================================================
    // Cleanup
    // =================================================================

    /// Delete the account if it holds nothing. Returns `true` if removed.
    pub fn remove_if_empty(&mut self, owner: PlayerId) -> bool {
        if self.accounts.get(&owner).is_some_and(Account::is_empty) {
            self.accounts.remove(&owner);
            tracing::debug!(player = %owner, "Empty account removed");
            true
        } else {
            false
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn account(&self, owner: &PlayerId) -> Option<&Account> {
        self.accounts.get(owner)
    }

    #[must_use]
    pub fn contains(&self, owner: &PlayerId) -> bool {
        self.accounts.contains_key(owner)
    }

    /// Spendable balance, zero for unknown players.
    #[must_use]
    pub fn balance(&self, owner: &PlayerId) -> Decimal {
        self.accounts
            .get(owner)
            .map_or(Decimal::ZERO, |a| a.balance)
    }

    /// Sum of all spendable balances.
    #[must_use]
    pub fn total_balance(&self) -> Decimal {
        self.accounts.values().map(|a| a.balance).sum()
    }

    /// Accounts in ascending owner order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn account_mut(&mut self, owner: PlayerId) -> Result<&mut Account> {
        self.accounts
            .get_mut(&owner)
            .ok_or(DicematchError::UnknownAccount(owner))
    }
}
