//! # dicematch-matchcore
//!
//! **Offer book and matcher for DiceMatch.**
//!
//! MatchCore owns every [`Offer`](dicematch_types::Offer) record and decides
//! which queued offer a newcomer pairs with. It has:
//!
//! - **No ledger side effects**: holds and counters are the caller's job
//! - **Exact-amount pairing**: an offer only matches an equal stake
//! - **FIFO at each amount**: the earliest queued compatible offer wins
//! - **Self-match prevention**: a player's offers never pair with each other

pub mod matcher;
pub mod offer_book;
pub mod stake_level;

pub use matcher::{MatchDecision, find_counter_offer};
pub use offer_book::OfferBook;
pub use stake_level::{QueuedOffer, StakeLevel};
