//! Deterministic state fingerprint.
//!
//! `SHA-256(domain_sep || accounts || offers || games || counters || supply)`
//!
//! Every store iterates in key order and amounts are hashed in normalized
//! decimal form, so two engines that processed the same call sequence
//! produce the same root.

use dicematch_types::{Digest256, OfferState, constants};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::state::EngineState;

fn amount(hasher: &mut Sha256, value: Decimal) {
    hasher.update(value.normalize().to_string().as_bytes());
    hasher.update(b";");
}

fn count(hasher: &mut Sha256, n: usize) {
    hasher.update((n as u64).to_le_bytes());
}

pub(crate) fn compute(state: &EngineState) -> Digest256 {
    let mut hasher = Sha256::new();
    hasher.update(constants::STATE_ROOT_DOMAIN);

    count(&mut hasher, state.ledger.len());
    for acct in state.ledger.accounts() {
        hasher.update(acct.owner.as_bytes());
        amount(&mut hasher, acct.balance);
        hasher.update(acct.open_offers.to_le_bytes());
        hasher.update(acct.open_games.to_le_bytes());
    }

    count(&mut hasher, state.book.len());
    for offer in state.book.offers() {
        hasher.update(offer.id.0.to_le_bytes());
        hasher.update(offer.owner.as_bytes());
        hasher.update(offer.stake.asset.as_bytes());
        amount(&mut hasher, offer.stake.amount);
        hasher.update(offer.commitment.as_bytes());
        match offer.state {
            OfferState::Open { amount: open } => {
                hasher.update([0u8]);
                amount(&mut hasher, open);
            }
            OfferState::Matched { game_id } => {
                hasher.update([1u8]);
                hasher.update(game_id.0.to_le_bytes());
            }
        }
    }

    count(&mut hasher, state.games.len());
    for game in state.games.games() {
        hasher.update(game.id.0.to_le_bytes());
        amount(&mut hasher, game.stake.amount);
        match game.deadline {
            Some(deadline) => {
                hasher.update([1u8]);
                hasher.update(deadline.timestamp_millis().to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
        for player in &game.players {
            hasher.update(player.commitment.as_bytes());
            match &player.reveal {
                Some(secret) => {
                    hasher.update([1u8]);
                    hasher.update(secret.as_bytes());
                }
                None => hasher.update([0u8]),
            }
        }
    }

    hasher.update(state.book.last_id().0.to_le_bytes());
    hasher.update(state.games.last_id().0.to_le_bytes());
    amount(&mut hasher, state.supply.total_deposits());
    amount(&mut hasher, state.supply.total_withdrawals());

    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use dicematch_types::{AssetConfig, PlayerId, Stake};

    use super::*;

    #[test]
    fn empty_states_agree() {
        assert_eq!(
            compute(&EngineState::default()),
            compute(&EngineState::default())
        );
    }

    #[test]
    fn any_deposit_changes_the_root() {
        let asset = AssetConfig::default();
        let player = PlayerId::from_bytes([7; 16]);
        let before = compute(&EngineState::default());

        let mut state = EngineState::default();
        state
            .deposit(&asset, player, &Stake::new("SYS", Decimal::ONE))
            .unwrap();
        assert_ne!(compute(&state), before);
    }

    #[test]
    fn scale_does_not_leak_into_the_root() {
        let asset = AssetConfig::default();
        let player = PlayerId::from_bytes([7; 16]);

        let mut a = EngineState::default();
        a.deposit(&asset, player, &Stake::new("SYS", Decimal::new(10, 0)))
            .unwrap();
        let mut b = EngineState::default();
        b.deposit(&asset, player, &Stake::new("SYS", Decimal::new(10_000, 3)))
            .unwrap();
        assert_eq!(compute(&a), compute(&b));
    }
}
