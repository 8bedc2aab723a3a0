//! System-wide constants for the DiceMatch wagering engine.

/// Default response window after the first reveal (five minutes).
pub const DEFAULT_REVEAL_WINDOW_SECS: i64 = 5 * 60;

/// Symbol of the single asset accepted by a default engine.
pub const DEFAULT_ASSET_SYMBOL: &str = "SYS";

/// Decimal places of the default asset. The smallest stake is `10^-4`.
pub const DEFAULT_ASSET_PRECISION: u32 = 4;

/// Upper bound on configurable asset precision (`rust_decimal` holds 28).
pub const MAX_ASSET_PRECISION: u32 = 18;

/// A settled game pays the winner both stakes.
pub const PAYOUT_MULTIPLIER: i64 = 2;

/// Domain separator for signed call payloads.
pub const CALL_DOMAIN: &[u8] = b"dicematch:call:v1:";

/// Domain separator for the engine state root.
pub const STATE_ROOT_DOMAIN: &[u8] = b"dicematch:state_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "DiceMatch";
