//! Authorization of calls.
//!
//! State-mutating calls that act on behalf of a principal consult an
//! [`Authorizer`] supplied by the host for that call. Two implementations
//! are provided:
//!
//! - [`SignerSet`]: the host has already verified signatures and passes the
//!   set of principals that signed.
//! - [`Ed25519Authorizer`]: the engine verifies ed25519 signatures over the
//!   call's canonical payload against keys in a [`KeyRegistry`].

use std::collections::{HashMap, HashSet};

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::{Commitment, DicematchError, GameId, PlayerId, Result, Secret, Stake, constants};

/// Answers whether a principal consented to `call`.
///
/// The engine builds `call` from the arguments it is about to execute, so an
/// implementation that checks signatures must check them against exactly
/// that call.
pub trait Authorizer {
    fn is_authorized(&self, principal: &PlayerId, call: &Call) -> bool;
}

/// Fail with `Unauthorized` unless `principal` authorized `call`.
///
/// # Errors
/// Returns [`DicematchError::Unauthorized`].
pub fn require_auth(auth: &dyn Authorizer, principal: &PlayerId, call: &Call) -> Result<()> {
    if auth.is_authorized(principal, call) {
        Ok(())
    } else {
        Err(DicematchError::Unauthorized(*principal))
    }
}

// ---------------------------------------------------------------------------
// SignerSet
// ---------------------------------------------------------------------------

/// The principals that signed the current call, as reported by the host.
#[derive(Debug, Clone, Default)]
pub struct SignerSet {
    signers: HashSet<PlayerId>,
}

impl SignerSet {
    /// Nobody signed. Enough for calls that need no authorization.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn of(signers: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            signers: signers.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn single(signer: PlayerId) -> Self {
        Self::of([signer])
    }
}

impl Authorizer for SignerSet {
    fn is_authorized(&self, principal: &PlayerId, _call: &Call) -> bool {
        self.signers.contains(principal)
    }
}

// ---------------------------------------------------------------------------
// Call payloads
// ---------------------------------------------------------------------------

/// An external call, in the form that gets signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OfferBet {
        stake: Stake,
        player: PlayerId,
        commitment: Commitment,
    },
    CancelOffer {
        commitment: Commitment,
    },
    Reveal {
        commitment: Commitment,
        secret: Secret,
    },
    ClaimExpired {
        game_id: GameId,
    },
    Deposit {
        from: PlayerId,
        amount: Stake,
    },
    Withdraw {
        to: PlayerId,
        amount: Stake,
    },
}

impl Call {
    /// Canonical signing payload.
    ///
    /// Format: `"dicematch:call:v1:" || tag || fields` with ids as raw bytes,
    /// amounts as their decimal string followed by the asset symbol.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        fn push_stake(payload: &mut Vec<u8>, stake: &Stake) {
            payload.extend_from_slice(stake.amount.to_string().as_bytes());
            payload.push(b' ');
            payload.extend_from_slice(stake.asset.as_bytes());
        }

        let mut payload = Vec::with_capacity(128);
        payload.extend_from_slice(constants::CALL_DOMAIN);
        match self {
            Self::OfferBet {
                stake,
                player,
                commitment,
            } => {
                payload.extend_from_slice(b"offerbet:");
                push_stake(&mut payload, stake);
                payload.extend_from_slice(player.as_bytes());
                payload.extend_from_slice(commitment.as_bytes());
            }
            Self::CancelOffer { commitment } => {
                payload.extend_from_slice(b"canceloffer:");
                payload.extend_from_slice(commitment.as_bytes());
            }
            Self::Reveal { commitment, secret } => {
                payload.extend_from_slice(b"reveal:");
                payload.extend_from_slice(commitment.as_bytes());
                payload.extend_from_slice(secret.as_bytes());
            }
            Self::ClaimExpired { game_id } => {
                payload.extend_from_slice(b"claimexpired:");
                payload.extend_from_slice(&game_id.0.to_le_bytes());
            }
            Self::Deposit { from, amount } => {
                payload.extend_from_slice(b"deposit:");
                payload.extend_from_slice(from.as_bytes());
                push_stake(&mut payload, amount);
            }
            Self::Withdraw { to, amount } => {
                payload.extend_from_slice(b"withdraw:");
                payload.extend_from_slice(to.as_bytes());
                push_stake(&mut payload, amount);
            }
        }
        payload
    }
}

// ---------------------------------------------------------------------------
// Ed25519
// ---------------------------------------------------------------------------

/// Registered ed25519 verifying keys, one per player.
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: HashMap<PlayerId, VerifyingKey>,
}

impl KeyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or rotate) a player's key.
    pub fn register(&mut self, player: PlayerId, key: VerifyingKey) {
        self.keys.insert(player, key);
    }

    #[must_use]
    pub fn key(&self, player: &PlayerId) -> Option<&VerifyingKey> {
        self.keys.get(player)
    }
}

/// Authorizes principals whose attached signature covers the call being run.
pub struct Ed25519Authorizer<'a> {
    registry: &'a KeyRegistry,
    signatures: HashMap<PlayerId, Signature>,
}

impl<'a> Ed25519Authorizer<'a> {
    #[must_use]
    pub fn new(registry: &'a KeyRegistry) -> Self {
        Self {
            registry,
            signatures: HashMap::new(),
        }
    }

    /// Attach a signature claimed to be from `player`.
    #[must_use]
    pub fn with_signature(mut self, player: PlayerId, signature: Signature) -> Self {
        self.signatures.insert(player, signature);
        self
    }
}

impl Authorizer for Ed25519Authorizer<'_> {
    fn is_authorized(&self, principal: &PlayerId, call: &Call) -> bool {
        let (Some(key), Some(sig)) = (
            self.registry.key(principal),
            self.signatures.get(principal),
        ) else {
            return false;
        };
        key.verify(&call.signing_payload(), sig).is_ok()
    }
}
