//! # dicematch-settlement
//!
//! **Finality plane**: everything that happens to a pair of offers after
//! the matcher has joined them.
//!
//! ## Architecture
//!
//! ```text
//!   matched pair ──▶ GameTable::create ──▶ reveal::record_reveal ──┐
//!                                                                  │
//!         ┌──────────── both revealed ◀────────────────────────────┤
//!         ▼                                                        ▼
//!   fairness::winning_slot                        reveal::forfeit_winner
//!         │                                         (deadline passed)
//!         └────────────────▶ settler::settle ◀─────────────┘
//!                               │
//!                               ▼
//!                     SettlementReceipt
//! ```
//!
//! [`SupplyConservation`] tracks deposits and withdrawals so the engine
//! can check after each call that custody still adds up.

pub mod fairness;
pub mod game_table;
pub mod reveal;
pub mod settler;
pub mod supply_conservation;

pub use fairness::{outcome_digest, winning_slot};
pub use game_table::GameTable;
pub use reveal::{RevealStep, forfeit_winner, record_reveal};
pub use settler::{Verdict, settle};
pub use supply_conservation::{Custody, SupplyConservation};
