//! Integration tests: matched pair -> reveals -> winner rule -> payout.
//!
//! Drives the ledger, offer book and game table by hand the way the engine
//! does, and checks that custody is conserved at every step.

use chrono::{Duration, Utc};
use dicematch_ledger::Ledger;
use dicematch_matchcore::{MatchDecision, OfferBook, find_counter_offer};
use dicematch_settlement::{
    Custody, GameTable, RevealStep, SupplyConservation, Verdict, forfeit_winner, outcome_digest,
    record_reveal, settle, winning_slot,
};
use dicematch_types::*;
use rust_decimal::Decimal;

struct Desk {
    ledger: Ledger,
    book: OfferBook,
    games: GameTable,
    supply: SupplyConservation,
    hasher: Sha256Hasher,
}

impl Desk {
    fn new() -> Self {
        Self {
            ledger: Ledger::new(),
            book: OfferBook::new(),
            games: GameTable::new(),
            supply: SupplyConservation::new(),
            hasher: Sha256Hasher,
        }
    }

    fn deposit(&mut self, player: PlayerId, amount: Decimal) {
        self.ledger.deposit(player, amount).unwrap();
        self.supply.record_deposit(amount).unwrap();
    }

    /// Insert, match and hold the way `offerbet` does.
    fn offer(&mut self, player: PlayerId, amount: Decimal, secret: &Secret) -> Option<GameId> {
        let stake = Stake::new("SYS", amount);
        let commitment = secret.commit(&self.hasher);
        let id = self.book.insert(player, stake.clone(), commitment).unwrap();
        self.ledger.hold(player, amount).unwrap();

        match find_counter_offer(&self.book, amount, player) {
            MatchDecision::Queue => {
                self.ledger.open_offer(player).unwrap();
                None
            }
            MatchDecision::Pair { counter } => {
                let queued = self.book.get(counter).unwrap().clone();
                let game = self.games.create(stake, queued.commitment, commitment);
                self.book.mark_matched(counter, game).unwrap();
                self.book.mark_matched(id, game).unwrap();
                self.ledger.close_offer(queued.owner).unwrap();
                self.ledger.open_game(queued.owner).unwrap();
                self.ledger.open_game(player).unwrap();
                Some(game)
            }
        }
    }

    fn custody(&self) -> Custody {
        Custody {
            balances: self.ledger.total_balance(),
            open_offers: self.book.open_total(),
            games: self.games.staked_total(),
        }
    }

    fn assert_conserved(&self) {
        self.supply.verify(&self.custody()).unwrap();
    }
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

#[test]
fn full_reveal_pays_the_rule_winner() {
    let mut desk = Desk::new();
    let (alice, bob) = (PlayerId::new(), PlayerId::new());
    let (sa, sb) = (Secret::from_seed(11), Secret::from_seed(22));
    desk.deposit(alice, dec(100));
    desk.deposit(bob, dec(100));

    assert_eq!(desk.offer(alice, dec(10), &sa), None);
    desk.assert_conserved();
    let game_id = desk.offer(bob, dec(10), &sb).unwrap();
    assert_eq!(game_id, GameId(1));
    desk.assert_conserved();

    let now = Utc::now();
    let window = Duration::seconds(300);
    let game = desk.games.get_mut(game_id).unwrap();
    assert!(matches!(
        record_reveal(game, Slot::First, sa, now, window).unwrap(),
        RevealStep::Recorded { .. }
    ));
    assert_eq!(
        record_reveal(game, Slot::Second, sb, now, window).unwrap(),
        RevealStep::Complete
    );

    let digest = outcome_digest(&desk.hasher, game).unwrap();
    let slot = winning_slot(&digest);
    let receipt = settle(
        &mut desk.ledger,
        &mut desk.book,
        &mut desk.games,
        Verdict {
            game_id,
            winning_slot: slot,
            resolution: Resolution::Revealed,
            outcome_digest: Some(digest),
        },
        now,
    )
    .unwrap();

    let (winner, loser) = match slot {
        Slot::First => (alice, bob),
        Slot::Second => (bob, alice),
    };
    assert_eq!(receipt.winner, winner);
    assert_eq!(desk.ledger.balance(&winner), dec(110));
    assert_eq!(desk.ledger.balance(&loser), dec(90));
    assert!(desk.games.is_empty());
    assert!(desk.book.is_empty());
    desk.assert_conserved();
}

#[test]
fn forfeit_after_deadline_pays_the_revealer() {
    let mut desk = Desk::new();
    let (alice, bob) = (PlayerId::new(), PlayerId::new());
    let (sa, sb) = (Secret::from_seed(1), Secret::from_seed(2));
    desk.deposit(alice, dec(10));
    desk.deposit(bob, dec(10));
    desk.offer(alice, dec(10), &sa);
    let game_id = desk.offer(bob, dec(10), &sb).unwrap();

    let start = Utc::now();
    let window = Duration::seconds(300);
    let game = desk.games.get_mut(game_id).unwrap();
    record_reveal(game, Slot::Second, sb, start, window).unwrap();

    let game = desk.games.get(game_id).unwrap();
    assert!(forfeit_winner(game, start + window).is_err());
    let claim_at = start + window + Duration::seconds(1);
    let slot = forfeit_winner(game, claim_at).unwrap();
    assert_eq!(slot, Slot::Second);

    let receipt = settle(
        &mut desk.ledger,
        &mut desk.book,
        &mut desk.games,
        Verdict {
            game_id,
            winning_slot: slot,
            resolution: Resolution::Forfeit,
            outcome_digest: None,
        },
        claim_at,
    )
    .unwrap();

    assert_eq!(receipt.winner, bob);
    assert_eq!(desk.ledger.balance(&bob), dec(20));
    assert!(!desk.ledger.contains(&alice), "loser had nothing left");
    desk.assert_conserved();
}

#[test]
fn fifo_pairs_oldest_offer_first() {
    let mut desk = Desk::new();
    let players: Vec<PlayerId> = (0..4).map(|_| PlayerId::new()).collect();
    for p in &players {
        desk.deposit(*p, dec(5));
    }
    for (i, p) in players.iter().take(3).enumerate() {
        let seed = u8::try_from(i).unwrap() + 1;
        assert_eq!(desk.offer(*p, dec(5), &Secret::from_seed(seed)), None);
    }

    let game_id = desk.offer(players[3], dec(5), &Secret::from_seed(9)).unwrap();
    let game = desk.games.get(game_id).unwrap();
    let first = desk.book.by_commitment(&game.slot(Slot::First).commitment).unwrap();
    assert_eq!(first.owner, players[0]);
    assert_eq!(desk.book.level(dec(5)).unwrap().len(), 2);
    desk.assert_conserved();
}
