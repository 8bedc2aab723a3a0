//! # dicematch-engine
//!
//! Peer-to-peer commit-reveal dice wagering. Two players lock equal stakes,
//! each behind a hash commitment. Once both secrets are revealed a digest
//! over them picks the winner, who receives both stakes. A player who
//! reveals and then waits out the opponent can claim the pot by forfeit.
//!
//! [`DiceEngine`] is the only entry point. It owns the ledger, the offer
//! book and the game table, and exposes six calls:
//!
//! | Call | Effect |
//! |------|--------|
//! | `deposit` | credit an account, transfer in |
//! | `withdraw` | debit an account, transfer out |
//! | `offerbet` | queue a stake or pair it into a game |
//! | `canceloffer` | refund an unmatched offer |
//! | `reveal` | disclose a secret; settles once both are in |
//! | `claimexpired` | settle by forfeit after the reveal deadline |
//!
//! Every call is all-or-nothing and conserves funds:
//!
//! ```text
//! Σ balances + Σ open-offer stakes + Σ 2×game stakes == deposits − withdrawals
//! ```

pub mod engine;
pub mod outcome;
mod state;
mod state_root;

pub use engine::{DiceEngine, HostServices};
pub use outcome::{OfferOutcome, RevealOutcome};
