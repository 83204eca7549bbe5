use super::*;
use crate::{Rank, Suit};

fn card(rank: Rank) -> Card {
    Card::new(rank, Suit::Hearts)
}

fn spot_with(ranks: &[Rank], bet: u64) -> Spot {
    let mut spot = Spot::new(bet);
    for &rank in ranks {
        spot.active_hand_mut().unwrap().add_card(card(rank));
    }
    spot
}

#[test]
fn test_round_new() {
    let round = Round::new(Deck::build());
    assert_eq!(round.phase, GamePhase::NotStarted);
    assert!(round.spot.hands.is_empty());
    assert!(round.dealer_hand.is_empty());
    assert!(round.outcome.is_none());
    assert!(!round.is_terminal());
    assert_eq!(round.card_count(), 52);
}

#[test]
fn test_spot_can_split() {
    let rules = TableRules::default();
    let spot = spot_with(&[Rank::Eight, Rank::Eight], 10);
    assert!(spot.can_split(&rules));
}

#[test]
fn test_spot_cannot_split_when_disabled() {
    let spot = spot_with(&[Rank::Eight, Rank::Eight], 10);
    assert!(!spot.can_split(&TableRules::classic()));
}

#[test]
fn test_spot_split_keeps_position_and_bet() {
    let rules = TableRules::default();
    let mut spot = spot_with(&[Rank::Eight, Rank::Eight], 25);
    spot.split(&rules).unwrap();

    assert_eq!(spot.hands.len(), 2);
    assert_eq!(spot.active_hand_index, 0);
    assert_eq!(spot.splits, 1);
    for hand in &spot.hands {
        assert_eq!(hand.cards, vec![card(Rank::Eight)]);
        assert_eq!(hand.bet, 25);
    }
    assert_eq!(spot.total_bet(), 50);
}

#[test]
fn test_spot_resplit_inserts_after_active_hand() {
    let rules = TableRules::default();
    let mut spot = spot_with(&[Rank::Eight, Rank::Eight], 10);
    spot.split(&rules).unwrap();
    spot.hands[0].add_card(Card::new(Rank::Eight, Suit::Clubs));
    spot.hands[1].add_card(card(Rank::Three));

    spot.split(&rules).unwrap();
    assert_eq!(spot.hands.len(), 3);
    assert_eq!(spot.hands[0].cards, vec![card(Rank::Eight)]);
    assert_eq!(spot.hands[1].cards, vec![Card::new(Rank::Eight, Suit::Clubs)]);
    assert_eq!(spot.hands[2].cards, vec![card(Rank::Eight), card(Rank::Three)]);
}

#[test]
fn test_spot_cannot_split_max_splits_reached() {
    let rules = TableRules {
        max_splits: 1,
        ..TableRules::default()
    };
    let mut spot = spot_with(&[Rank::Eight, Rank::Eight], 10);
    spot.split(&rules).unwrap();

    spot.hands[0].add_card(Card::new(Rank::Eight, Suit::Clubs));
    assert!(!spot.can_split(&rules));
    assert_eq!(spot.split(&rules), Err(RoundError::InvalidAction("Cannot split")));
}

#[test]
fn test_spot_cannot_split_mismatched_ranks() {
    let spot = spot_with(&[Rank::King, Rank::Queen], 10);
    assert!(!spot.can_split(&TableRules::default()));
}

#[test]
fn test_spot_move_to_next_hand() {
    let rules = TableRules::default();
    let mut spot = spot_with(&[Rank::Eight, Rank::Eight], 10);
    spot.split(&rules).unwrap();

    assert_eq!(spot.active_hand_index, 0);
    assert!(spot.move_to_next_hand());
    assert_eq!(spot.active_hand_index, 1);
    assert!(!spot.move_to_next_hand());
}

#[test]
fn test_spot_all_hands_finished() {
    let mut spot = spot_with(&[Rank::Ten, Rank::Nine], 10);
    assert!(!spot.all_hands_finished());
    spot.hands[0].stood = true;
    assert!(spot.all_hands_finished());
    assert!(!spot.all_hands_busted());
}

#[test]
fn test_spot_all_hands_busted() {
    let spot = spot_with(&[Rank::Ten, Rank::Nine, Rank::Five], 10);
    assert!(spot.all_hands_busted());
    assert!(!Spot::default().all_hands_busted());
}

#[test]
fn test_dealer_should_hit() {
    let rules = TableRules::default();
    let mut round = Round::new(Deck::default());

    round.dealer_hand = vec![card(Rank::Ten), card(Rank::Six)];
    assert!(round.dealer_should_hit(&rules));

    round.dealer_hand = vec![card(Rank::Ten), card(Rank::Seven)];
    assert!(round.dealer_should_hit(&rules));

    round.dealer_hand = vec![card(Rank::Ten), card(Rank::Eight)];
    assert!(!round.dealer_should_hit(&rules));
}

#[test]
fn test_dealer_should_hit_classic_limit() {
    let rules = TableRules::classic();
    let mut round = Round::new(Deck::default());

    round.dealer_hand = vec![card(Rank::Ten), card(Rank::Five)];
    assert!(round.dealer_should_hit(&rules));

    round.dealer_hand = vec![card(Rank::Ten), card(Rank::Six)];
    assert!(!round.dealer_should_hit(&rules));
}

#[test]
fn test_active_hand_only_during_player_turn() {
    let mut round = Round::new(Deck::build());
    round.spot = spot_with(&[Rank::Ten, Rank::Two], 10);
    assert!(round.active_hand().is_none());

    round.phase = GamePhase::PlayerTurn;
    assert!(round.active_hand().is_some());
    assert!(round.can_hit_current_hand());
    assert!(round.can_double_current_hand(&TableRules::default()));
    assert!(!round.can_double_current_hand(&TableRules::classic()));

    round.phase = GamePhase::Settled;
    assert!(round.active_hand().is_none());
    assert!(!round.can_hit_current_hand());
}

#[test]
fn test_cannot_hit_with_empty_deck() {
    let mut round = Round::new(Deck::default());
    round.spot = spot_with(&[Rank::Ten, Rank::Two], 10);
    round.phase = GamePhase::PlayerTurn;
    assert!(!round.can_hit_current_hand());
}

#[test]
fn test_split_needs_two_cards_in_deck() {
    let rules = TableRules::default();
    let mut round = Round::new(Deck::from_cards(vec![card(Rank::Two)]));
    round.spot = spot_with(&[Rank::Eight, Rank::Eight], 10);
    round.phase = GamePhase::PlayerTurn;
    assert!(!round.can_split_current_hand(&rules));

    round.deck = Deck::from_cards(vec![card(Rank::Two), card(Rank::Three)]);
    assert!(round.can_split_current_hand(&rules));
}

#[test]
fn test_outcome_messages() {
    let hand = |outcome, busted| HandResult {
        outcome,
        total: 20,
        busted,
        bet: 10,
        payout: 0,
    };

    let single = RoundOutcome {
        kind: OutcomeKind::Showdown,
        dealer_total: 18,
        hands: vec![hand(HandOutcome::Win, false)],
    };
    assert_eq!(single.message(), "Win");

    let busted = RoundOutcome {
        kind: OutcomeKind::Showdown,
        dealer_total: 18,
        hands: vec![hand(HandOutcome::Loss, true)],
    };
    assert_eq!(busted.to_string(), "Busted, lost");

    let split = RoundOutcome {
        kind: OutcomeKind::Showdown,
        dealer_total: 18,
        hands: vec![hand(HandOutcome::Push, false), hand(HandOutcome::Loss, false)],
    };
    assert_eq!(split.message(), "Hand 1: Push, Hand 2: Lost");

    let dealer_bj = RoundOutcome {
        kind: OutcomeKind::DealerBlackjack,
        dealer_total: 21,
        hands: vec![hand(HandOutcome::Loss, false)],
    };
    assert_eq!(dealer_bj.message(), "Dealer blackjack, player loses");
}

#[test]
fn test_outcome_net() {
    let outcome = RoundOutcome {
        kind: OutcomeKind::Showdown,
        dealer_total: 22,
        hands: vec![
            HandResult {
                outcome: HandOutcome::Win,
                total: 18,
                busted: false,
                bet: 10,
                payout: 20,
            },
            HandResult {
                outcome: HandOutcome::Loss,
                total: 25,
                busted: true,
                bet: 20,
                payout: 0,
            },
        ],
    };
    assert_eq!(outcome.total_bet(), 30);
    assert_eq!(outcome.total_payout(), 20);
    assert_eq!(outcome.net(), -10);
}
