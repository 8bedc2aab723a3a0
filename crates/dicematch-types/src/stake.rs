//! Stake amounts.
//!
//! The engine custodies a single fungible asset. A [`Stake`] pairs an
//! amount with the asset symbol so that a mismatched asset can be
//! rejected at the boundary.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Type alias for asset symbols (e.g., "SYS", "EOS").
pub type Asset = String;

/// An amount of a given asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stake {
    pub asset: Asset,
    pub amount: Decimal,
}

impl Stake {
    #[must_use]
    pub fn new(asset: impl Into<Asset>, amount: Decimal) -> Self {
        Self {
            asset: asset.into(),
            amount,
        }
    }

    /// Same asset, different amount.
    #[must_use]
    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self {
            asset: self.asset.clone(),
            amount,
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.asset)
    }
}
