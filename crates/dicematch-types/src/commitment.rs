//! Commit-reveal primitives.
//!
//! A player publishes `hash(secret)` as a [`Commitment`] when offering a
//! bet, and later discloses the [`Secret`]. [`verify_reveal`] is the pure
//! check binding the two together.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DicematchError, Hasher256, Result};

/// A 256-bit digest as produced by [`Hasher256`].
pub type Digest256 = [u8; 32];

fn parse_digest(input: &str) -> std::result::Result<Digest256, String> {
    let trimmed = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(trimmed).map_err(|e| format!("not hex: {e}"))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| format!("expected 32 bytes, got {}", b.len()))
}

// ---------------------------------------------------------------------------
// Commitment
// ---------------------------------------------------------------------------

/// Hash of a player's secret, published before the secret itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Commitment(pub Digest256);

impl Commitment {
    /// Parse a 64-character hex string (optionally `0x`-prefixed).
    ///
    /// # Errors
    /// Returns `InvalidCommitment` on malformed or oversized input.
    pub fn from_hex(input: &str) -> Result<Self> {
        parse_digest(input)
            .map(Self)
            .map_err(|reason| DicematchError::InvalidCommitment { reason })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &Digest256 {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// Secret
// ---------------------------------------------------------------------------

/// The 256-bit value a player commits to and later reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secret(pub Digest256);

impl Secret {
    /// Parse a 64-character hex string (optionally `0x`-prefixed).
    ///
    /// # Errors
    /// Returns `InvalidCommitment` on malformed input.
    pub fn from_hex(input: &str) -> Result<Self> {
        parse_digest(input)
            .map(Self)
            .map_err(|reason| DicematchError::InvalidCommitment { reason })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &Digest256 {
        &self.0
    }

    /// The commitment a player publishes for this secret.
    #[must_use]
    pub fn commit(&self, hasher: &dyn Hasher256) -> Commitment {
        Commitment(hasher.hash(&self.0))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Secret {
    /// Deterministic secret whose every byte is `seed`.
    pub fn from_seed(seed: u8) -> Self {
        Self([seed; 32])
    }

    /// Fresh random secret.
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

/// Check that `secret` hashes to `commitment`.
///
/// # Errors
/// Returns [`DicematchError::InvalidReveal`] on mismatch.
pub fn verify_reveal(
    hasher: &dyn Hasher256,
    commitment: &Commitment,
    secret: &Secret,
) -> Result<()> {
    if secret.commit(hasher) == *commitment {
        Ok(())
    } else {
        Err(DicematchError::InvalidReveal(*commitment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256Hasher;

    #[test]
    fn reveal_matches_own_commitment() {
        let secret = Secret::from_seed(7);
        let commitment = secret.commit(&Sha256Hasher);
        assert!(verify_reveal(&Sha256Hasher, &commitment, &secret).is_ok());
    }

    #[test]
    fn reveal_with_other_secret_fails() {
        let commitment = Secret::from_seed(1).commit(&Sha256Hasher);
        let err = verify_reveal(&Sha256Hasher, &commitment, &Secret::from_seed(2)).unwrap_err();
        assert!(matches!(err, DicematchError::InvalidReveal(c) if c == commitment));
    }

    #[test]
    fn hex_parsing_accepts_prefix() {
        let secret = Secret::random();
        let commitment = secret.commit(&Sha256Hasher);
        let parsed = Commitment::from_hex(&format!("0x{}", commitment.to_hex())).unwrap();
        assert_eq!(parsed, commitment);
    }

    #[test]
    fn hex_parsing_rejects_oversized() {
        let err = Commitment::from_hex(&"ab".repeat(33)).unwrap_err();
        assert!(matches!(err, DicematchError::InvalidCommitment { .. }));
        let err = Commitment::from_hex("zz").unwrap_err();
        assert!(matches!(err, DicematchError::InvalidCommitment { .. }));
    }
}
