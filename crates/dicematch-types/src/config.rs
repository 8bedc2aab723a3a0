//! Configuration types for a DiceMatch engine.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{DicematchError, Result, Stake, constants};

/// The single asset an engine custodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Asset symbol (e.g., "SYS").
    pub symbol: String,
    /// Decimal places. The smallest positive amount is `10^-precision`.
    pub precision: u32,
}

impl AssetConfig {
    /// Smallest positive amount of this asset.
    #[must_use]
    pub fn min_unit(&self) -> Decimal {
        Decimal::new(1, self.precision)
    }

    /// Check that `stake` is a positive, representable amount of this asset.
    ///
    /// Returns the reason on failure so callers can wrap it in the error
    /// variant that fits their call.
    pub fn check(&self, stake: &Stake) -> std::result::Result<(), String> {
        if stake.asset != self.symbol {
            return Err(format!(
                "only {} accepted, got {}",
                self.symbol, stake.asset
            ));
        }
        if !stake.is_positive() {
            return Err(format!("amount must be positive, got {}", stake.amount));
        }
        if stake.amount.normalize().scale() > self.precision {
            return Err(format!(
                "amount {} exceeds {} decimal places",
                stake.amount, self.precision
            ));
        }
        Ok(())
    }

    /// A stake of `amount` in this asset.
    #[must_use]
    pub fn stake(&self, amount: Decimal) -> Stake {
        Stake::new(self.symbol.clone(), amount)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            symbol: constants::DEFAULT_ASSET_SYMBOL.to_string(),
            precision: constants::DEFAULT_ASSET_PRECISION,
        }
    }
}

/// Configuration for a single engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accepted asset.
    pub asset: AssetConfig,
    /// Seconds the second player has to reveal after the first reveal.
    pub reveal_window_secs: i64,
    /// Verify conservation of funds after every call.
    pub verify_supply: bool,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns `Configuration` for malformed JSON or out-of-range values.
    pub fn from_json(input: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| DicematchError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns `Configuration` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.asset.symbol.is_empty() {
            return Err(DicematchError::Configuration(
                "asset.symbol must not be empty".into(),
            ));
        }
        if self.asset.precision > constants::MAX_ASSET_PRECISION {
            return Err(DicematchError::Configuration(format!(
                "asset.precision {} exceeds {}",
                self.asset.precision,
                constants::MAX_ASSET_PRECISION
            )));
        }
        self.reveal_window()?;
        Ok(())
    }

    /// The reveal window as a [`Duration`].
    ///
    /// # Errors
    /// `Configuration` unless `reveal_window_secs` is positive and fits a
    /// `Duration`.
    pub fn reveal_window(&self) -> Result<Duration> {
        if self.reveal_window_secs <= 0 {
            return Err(DicematchError::Configuration(format!(
                "reveal_window_secs must be positive, got {}",
                self.reveal_window_secs
            )));
        }
        Duration::try_seconds(self.reveal_window_secs).ok_or_else(|| {
            DicematchError::Configuration(format!(
                "reveal_window_secs {} is out of range",
                self.reveal_window_secs
            ))
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            asset: AssetConfig::default(),
            reveal_window_secs: constants::DEFAULT_REVEAL_WINDOW_SECS,
            verify_supply: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.asset.symbol, "SYS");
        assert_eq!(cfg.asset.min_unit(), Decimal::new(1, 4));
        assert_eq!(cfg.reveal_window().unwrap(), Duration::minutes(5));
        assert!(cfg.verify_supply);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let cfg = EngineConfig::from_json(r#"{"reveal_window_secs": 60}"#).unwrap();
        assert_eq!(cfg.reveal_window_secs, 60);
        assert_eq!(cfg.asset, AssetConfig::default());
    }

    #[test]
    fn from_json_rejects_bad_values() {
        let err = EngineConfig::from_json(r#"{"reveal_window_secs": 0}"#).unwrap_err();
        assert!(matches!(err, DicematchError::Configuration(_)));

        let err = EngineConfig::from_json(r#"{"asset": {"symbol": "", "precision": 4}}"#)
            .unwrap_err();
        assert!(matches!(err, DicematchError::Configuration(_)));

        let err = EngineConfig::from_json(r#"{"reveal_window_secs": -5}"#).unwrap_err();
        assert!(matches!(err, DicematchError::Configuration(_)));

        let err = EngineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, DicematchError::Configuration(_)));
    }

    #[test]
    fn asset_check() {
        let asset = AssetConfig::default();
        assert!(asset.check(&asset.stake(asset.min_unit())).is_ok());
        assert!(asset.check(&asset.stake(Decimal::new(10_000, 3))).is_ok());
        assert!(asset.check(&asset.stake(Decimal::ZERO)).is_err());
        assert!(asset.check(&asset.stake(Decimal::new(1, 5))).is_err());
        assert!(asset.check(&Stake::new("BTC", Decimal::ONE)).is_err());
    }

    #[test]
    fn window_beyond_duration_range_rejected() {
        let err = EngineConfig::from_json(r#"{"reveal_window_secs": 9223372036854775807}"#)
            .unwrap_err();
        assert!(matches!(err, DicematchError::Configuration(_)));

        let cfg = EngineConfig {
            reveal_window_secs: i64::MAX,
            ..EngineConfig::default()
        };
        assert!(cfg.reveal_window().is_err());
    }
}
