//! Host capabilities consumed by the engine.
//!
//! The engine never reads the wall clock, hashes, or moves assets on its
//! own. The host injects these capabilities, which keeps every call
//! deterministic and testable without a live host.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Digest256, DicematchError, PlayerId, Result, Stake};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Hasher256
// ---------------------------------------------------------------------------

/// 256-bit cryptographic hash used for commitments and winner selection.
pub trait Hasher256: Send + Sync {
    fn hash(&self, bytes: &[u8]) -> Digest256;
}

/// SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher256 for Sha256Hasher {
    fn hash(&self, bytes: &[u8]) -> Digest256 {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(bytes));
        out
    }
}

// ---------------------------------------------------------------------------
// AssetTransfer
// ---------------------------------------------------------------------------

/// One side of an external transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferEndpoint {
    /// A player's external wallet.
    Player(PlayerId),
    /// The engine's custody account.
    Custody,
}

impl fmt::Display for TransferEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(id) => write!(f, "{id}"),
            Self::Custody => write!(f, "custody"),
        }
    }
}

/// A transfer the engine asked the host to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: TransferEndpoint,
    pub to: TransferEndpoint,
    pub stake: Stake,
}

/// Moves value between the engine's custody and the outside ledger.
pub trait AssetTransfer: Send {
    /// # Errors
    /// Returns `TransferFailed` if the host rejects the transfer.
    fn transfer(&mut self, from: TransferEndpoint, to: TransferEndpoint, stake: &Stake)
    -> Result<()>;
}

/// In-memory transfer service that records every transfer.
///
/// Clones share the same log, so a host (or test) can keep a handle while
/// the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransfer {
    inner: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    log: Vec<TransferRecord>,
    reject_next: Option<String>,
}

impl RecordingTransfer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next transfer fail with `reason`.
    pub fn reject_next(&self, reason: impl Into<String>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reject_next = Some(reason.into());
    }

    /// All transfers performed so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<TransferRecord> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .log
            .clone()
    }
}

impl AssetTransfer for RecordingTransfer {
    fn transfer(
        &mut self,
        from: TransferEndpoint,
        to: TransferEndpoint,
        stake: &Stake,
    ) -> Result<()> {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(reason) = state.reject_next.take() {
            return Err(DicematchError::TransferFailed { reason });
        }
        state.log.push(TransferRecord {
            from,
            to,
            stake: stake.clone(),
        });
        Ok(())
    }
}
