//! Supply conservation invariant checker.
//!
//! Enforced after every call:
//! ```text
//! Σ balances + Σ open-offer holds + Σ game stakes == Σ deposits - Σ withdrawals
//! ```
//!
//! Game stakes count both sides of every stored game. Settlement only moves
//! value between these buckets; deposits and withdrawals are the only calls
//! that change the right-hand side.

use std::fmt;

use dicematch_types::{DicematchError, Result};
use rust_decimal::Decimal;

/// Where the custodied funds currently sit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Custody {
    /// Spendable account balances.
    pub balances: Decimal,
    /// Stakes held by open offers.
    pub open_offers: Decimal,
    /// Both stakes of every unsettled game.
    pub games: Decimal,
}

impl Custody {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.balances + self.open_offers + self.games
    }
}

impl fmt::Display for Custody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "balances={} open_offers={} games={}",
            self.balances, self.open_offers, self.games
        )
    }
}

/// Running deposit and withdrawal totals for the engine's asset.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    deposits: Decimal,
    withdrawals: Decimal,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// `InvalidAmount` if lifetime deposits would overflow.
    pub fn record_deposit(&mut self, amount: Decimal) -> Result<()> {
        self.deposits = self
            .deposits
            .checked_add(amount)
            .ok_or_else(|| DicematchError::InvalidAmount {
                reason: format!("total deposits overflow when adding {amount}"),
            })?;
        Ok(())
    }

    /// Withdrawals never exceed deposits, so this total cannot overflow.
    pub fn record_withdrawal(&mut self, amount: Decimal) {
        self.withdrawals += amount;
    }

    /// Deposits minus withdrawals.
    #[must_use]
    pub fn expected_supply(&self) -> Decimal {
        self.deposits - self.withdrawals
    }

    /// Compare the custody breakdown against the expected supply.
    ///
    /// # Errors
    /// Returns [`DicematchError::SupplyInvariantViolation`] on mismatch.
    pub fn verify(&self, custody: &Custody) -> Result<()> {
        let expected = self.expected_supply();
        let actual = custody.total();
        if actual != expected {
            return Err(DicematchError::SupplyInvariantViolation {
                reason: format!(
                    "custody {actual} ({custody}) != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.deposits, self.withdrawals
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_deposits(&self) -> Decimal {
        self.deposits
    }

    #[must_use]
    pub fn total_withdrawals(&self) -> Decimal {
        self.withdrawals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(), Decimal::ZERO);
        assert!(sc.verify(&Custody::default()).is_ok());
    }

    #[test]
    fn deposits_minus_withdrawals() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(dec(100)).unwrap();
        sc.record_deposit(dec(50)).unwrap();
        sc.record_withdrawal(dec(30));
        assert_eq!(sc.expected_supply(), dec(120));
        assert_eq!(sc.total_deposits(), dec(150));
        assert_eq!(sc.total_withdrawals(), dec(30));
    }

    #[test]
    fn holds_and_games_count_toward_custody() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(dec(100)).unwrap();
        let custody = Custody {
            balances: dec(60),
            open_offers: dec(20),
            games: dec(20),
        };
        assert!(sc.verify(&custody).is_ok());
    }

    #[test]
    fn imbalance_detected() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(dec(10)).unwrap();
        let custody = Custody {
            balances: dec(11),
            ..Custody::default()
        };
        let err = sc.verify(&custody).unwrap_err();
        assert!(matches!(err, DicematchError::SupplyInvariantViolation { .. }));
    }

    #[test]
    fn deposit_overflow_is_rejected() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(Decimal::MAX).unwrap();
        let err = sc.record_deposit(Decimal::MAX).unwrap_err();
        assert!(matches!(err, DicematchError::InvalidAmount { .. }));
        assert_eq!(sc.total_deposits(), Decimal::MAX);
    }
}
