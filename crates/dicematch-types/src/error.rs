//! Error types for the DiceMatch wagering engine.
//!
//! All errors use the `DM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Validation errors
//! - 2xx: Authorization errors
//! - 3xx: Lookup (not found) errors
//! - 4xx: State conflicts
//! - 5xx: Balance errors
//! - 6xx: Timing errors
//! - 7xx: External collaborator errors
//! - 8xx: Invariant violations
//! - 9xx: General / internal errors

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Commitment, GameId, OfferId, PlayerId};

/// Central error enum for all DiceMatch operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DicematchError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// The stake of an offer is malformed (wrong asset, non-positive, bad precision).
    #[error("DM_ERR_100: Invalid stake: {reason}")]
    InvalidStake { reason: String },

    /// A deposit or withdrawal amount is malformed.
    #[error("DM_ERR_101: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    /// A commitment could not be parsed (wrong length, not hex).
    #[error("DM_ERR_102: Invalid commitment: {reason}")]
    InvalidCommitment { reason: String },

    /// The revealed secret does not hash to the published commitment.
    #[error("DM_ERR_103: Invalid reveal: secret does not match commitment {0}")]
    InvalidReveal(Commitment),

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The principal did not authorize this call.
    #[error("DM_ERR_200: Missing authorization of {0}")]
    Unauthorized(PlayerId),

    // =================================================================
    // Lookup Errors (3xx)
    // =================================================================
    /// The player has never deposited (or the account was cleaned up).
    #[error("DM_ERR_300: Unknown account: {0}")]
    UnknownAccount(PlayerId),

    /// No offer carries this commitment.
    #[error("DM_ERR_301: Offer not found for commitment {0}")]
    OfferNotFound(Commitment),

    /// No game with this id is in flight.
    #[error("DM_ERR_302: Game not found: {0}")]
    GameNotFound(GameId),

    // =================================================================
    // State Conflicts (4xx)
    // =================================================================
    /// An offer with this commitment already exists.
    #[error("DM_ERR_400: Offer with commitment {0} already exists")]
    DuplicateCommitment(Commitment),

    /// The offer was already matched into a game.
    #[error("DM_ERR_401: Offer {offer_id} cannot be cancelled: matched into {game_id}")]
    NotCancelable { offer_id: OfferId, game_id: GameId },

    /// The offer is still queued; there is nothing to reveal against.
    #[error("DM_ERR_402: Offer {0} is not in a game")]
    NotInGame(OfferId),

    /// This player slot already holds a reveal.
    #[error("DM_ERR_403: Player already revealed in {0}")]
    AlreadyRevealed(GameId),

    // =================================================================
    // Balance Errors (5xx)
    // =================================================================
    /// Not enough balance to hold or withdraw.
    #[error("DM_ERR_500: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// An open-offer or open-game counter would drop below zero.
    #[error("DM_ERR_501: Counter underflow for {player}: {counter}")]
    CounterUnderflow {
        player: PlayerId,
        counter: &'static str,
    },

    // =================================================================
    // Timing Errors (6xx)
    // =================================================================
    /// The game has no deadline yet, or the deadline has not passed.
    #[error("DM_ERR_600: Game {0} not expired")]
    NotExpired(GameId),

    // =================================================================
    // External Errors (7xx)
    // =================================================================
    /// The host asset-transfer service rejected the transfer.
    #[error("DM_ERR_700: Asset transfer failed: {reason}")]
    TransferFailed { reason: String },

    // =================================================================
    // Invariant Violations (8xx)
    // =================================================================
    /// A game record is in a state that no call sequence should produce.
    #[error("DM_ERR_800: Game {game_id} state error: {reason}")]
    GameStateError { game_id: GameId, reason: String },

    /// Conservation of funds violated — critical safety alert.
    #[error("DM_ERR_801: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("DM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("DM_ERR_901: Configuration error: {0}")]
    Configuration(String),
}

/// Coarse error taxonomy, used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input; retry with corrected input.
    Validation,
    /// Missing signer; resubmit with proper credentials.
    Authorization,
    /// Unknown offer, game or account.
    NotFound,
    /// The call conflicts with current state; not retryable as-is.
    StateConflict,
    /// Too early; retryable after waiting.
    Timing,
    /// A host collaborator failed.
    External,
    /// Should be unreachable; fatal to the operation.
    InvariantViolation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::StateConflict => write!(f, "STATE_CONFLICT"),
            Self::Timing => write!(f, "TIMING"),
            Self::External => write!(f, "EXTERNAL"),
            Self::InvariantViolation => write!(f, "INVARIANT_VIOLATION"),
        }
    }
}

impl DicematchError {
    /// Which part of the taxonomy this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStake { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidCommitment { .. }
            | Self::InvalidReveal(_)
            | Self::InsufficientBalance { .. }
            | Self::Configuration(_) => ErrorKind::Validation,
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::UnknownAccount(_) | Self::OfferNotFound(_) | Self::GameNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::DuplicateCommitment(_)
            | Self::NotCancelable { .. }
            | Self::NotInGame(_)
            | Self::AlreadyRevealed(_) => ErrorKind::StateConflict,
            Self::NotExpired(_) => ErrorKind::Timing,
            Self::TransferFailed { .. } => ErrorKind::External,
            Self::CounterUnderflow { .. }
            | Self::GameStateError { .. }
            | Self::SupplyInvariantViolation { .. }
            | Self::Internal(_) => ErrorKind::InvariantViolation,
        }
    }

    /// Only timing errors can succeed later without any change of input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Timing
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DicematchError>;
