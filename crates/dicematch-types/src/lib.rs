//! # dicematch-types
//!
//! Shared types, errors, and configuration for the **DiceMatch** wagering engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`PlayerId`], [`OfferId`], [`GameId`]
//! - **Commitments**: [`Commitment`], [`Secret`], [`Digest256`]
//! - **Stake model**: [`Stake`], [`Asset`]
//! - **Records**: [`Account`], [`Offer`], [`OfferState`], [`Game`], [`PlayerSlot`], [`Slot`]
//! - **Receipts**: [`SettlementReceipt`], [`Resolution`]
//! - **Host capabilities**: [`Authorizer`], [`AssetTransfer`], [`Clock`], [`Hasher256`]
//! - **Configuration**: [`EngineConfig`], [`AssetConfig`]
//! - **Errors**: [`DicematchError`] with `DM_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod account;
pub mod auth;
pub mod commitment;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod host;
pub mod ids;
pub mod offer;
pub mod receipt;
pub mod stake;

// Re-export all primary types at crate root for ergonomic imports:
//   use dicematch_types::{Offer, Game, Stake, Commitment, ...};

pub use account::*;
pub use auth::*;
pub use commitment::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use host::*;
pub use ids::*;
pub use offer::*;
pub use receipt::*;
pub use stake::*;

// Constants are accessed via `dicematch_types::constants::FOO`
// (not re-exported to avoid name collisions).
