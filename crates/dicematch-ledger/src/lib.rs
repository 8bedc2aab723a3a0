//! # dicematch-ledger
//!
//! **Account ledger** for the DiceMatch engine.
//!
//! The [`Ledger`] owns every [`Account`](dicematch_types::Account) record:
//! spendable balance plus the open-offer and open-game counters that decide
//! when an account can be deleted.
//!
//! ## Money Flow
//!
//! ```text
//! deposit ──▶ balance ──hold──▶ offer stake ──match──▶ game stake
//!                ▲                   │                     │
//!                └─────release───────┘                     │
//!                ▲                                         │
//!                └───────────release (2 × stake)───────────┘
//! withdraw ◀── balance
//! ```
//!
//! Every mutation either succeeds completely or leaves the ledger unchanged.

pub mod ledger;

pub use ledger::Ledger;
