//! Round engine for a single player seat.
//!
//! A [`Table`] owns the rules, the player's chips, the current [`Round`] and
//! the RNG used for shuffling. Commands validate every precondition before
//! touching any state, so a rejected command leaves the table unchanged.

use crate::{
    Card, ChipLedger, Deck, GamePhase, Hand, HandOutcome, HandResult, OutcomeKind, Round,
    RoundError, RoundOutcome, Spot, TableRules,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug)]
pub struct Table<R: Rng = ChaCha8Rng> {
    rules: TableRules,
    ledger: ChipLedger,
    round: Round,
    bet: u64,
    rng: R,
}

impl Table<ChaCha8Rng> {
    pub fn new(rules: TableRules) -> Result<Self, RoundError> {
        Self::with_rng(rules, ChaCha8Rng::from_entropy())
    }

    /// Reproducible table: the same seed and commands replay the same session.
    pub fn with_seed(rules: TableRules, seed: u64) -> Result<Self, RoundError> {
        Self::with_rng(rules, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Table<R> {
    pub fn with_rng(rules: TableRules, mut rng: R) -> Result<Self, RoundError> {
        let deck = Deck::build().shuffle(&mut rng);
        Self::with_deck(rules, deck, rng)
    }

    /// Table whose first round is dealt from `deck` exactly as given.
    pub fn with_deck(rules: TableRules, deck: Deck, rng: R) -> Result<Self, RoundError> {
        rules.validate()?;
        Ok(Self {
            ledger: ChipLedger::new(rules.starting_chips),
            round: Round::new(deck),
            bet: rules.min_bet,
            rules,
            rng,
        })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn phase(&self) -> GamePhase {
        self.round.phase
    }

    pub fn player_hands(&self) -> &[Hand] {
        &self.round.spot.hands
    }

    pub fn dealer_hand(&self) -> &[Card] {
        &self.round.dealer_hand
    }

    pub fn active_hand_index(&self) -> usize {
        self.round.spot.active_hand_index
    }

    pub fn chip_balance(&self) -> u64 {
        self.ledger.balance()
    }

    /// Base wager of the current round, or the table minimum between rounds.
    pub fn current_bet(&self) -> u64 {
        self.bet
    }

    pub fn deck_len(&self) -> usize {
        self.round.deck.len()
    }

    pub fn is_round_terminal(&self) -> bool {
        self.round.is_terminal()
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.round.outcome.as_ref()
    }

    pub fn outcome_message(&self) -> Option<String> {
        self.round.outcome.as_ref().map(RoundOutcome::message)
    }

    pub fn can_hit(&self) -> bool {
        self.round.can_hit_current_hand()
    }

    pub fn can_double(&self) -> bool {
        self.round.can_double_current_hand(&self.rules)
            && self
                .round
                .active_hand()
                .is_some_and(|h| self.ledger.can_afford(h.bet))
    }

    pub fn can_split(&self) -> bool {
        self.round.can_split_current_hand(&self.rules)
            && self
                .round
                .active_hand()
                .is_some_and(|h| self.ledger.can_afford(h.bet))
    }

    /// Starts a fresh session: new shuffled deck, starting chips, first deal.
    pub fn start_game(&mut self, initial_bet: u64) -> Result<(), RoundError> {
        if matches!(
            self.round.phase,
            GamePhase::InitialDeal | GamePhase::PlayerTurn | GamePhase::DealerTurn
        ) {
            return Err(RoundError::InvalidAction("Round in progress"));
        }
        self.check_bet_limits(initial_bet)?;
        if initial_bet > self.rules.starting_chips {
            return Err(RoundError::InsufficientChips {
                available: self.rules.starting_chips,
                required: initial_bet,
            });
        }

        log::info!("Starting game with {} chips", self.rules.starting_chips);
        self.ledger = ChipLedger::new(self.rules.starting_chips);
        self.round = Round::new(Deck::build().shuffle(&mut self.rng));
        self.start_round(initial_bet)
    }

    /// Debits `bet` and deals two cards to the player, then two to the dealer.
    pub fn start_round(&mut self, bet: u64) -> Result<(), RoundError> {
        if self.round.phase != GamePhase::NotStarted {
            return Err(RoundError::InvalidAction("Round already dealt"));
        }
        self.check_bet_limits(bet)?;
        if self.round.deck.len() < 4 {
            return Err(RoundError::EmptyDeck);
        }
        self.ledger.debit(bet)?;

        self.bet = bet;
        let mut spot = Spot::new(bet);
        for _ in 0..2 {
            let card = self.round.deck.draw()?;
            spot.hands[0].add_card(card);
        }
        for _ in 0..2 {
            let card = self.round.deck.draw()?;
            self.round.dealer_hand.push(card);
        }
        self.round.spot = spot;
        self.round.phase = GamePhase::InitialDeal;

        log::debug!(
            "Dealt player {} ({}), dealer {} ({}), bet {bet}",
            format_cards(&self.round.spot.hands[0].cards),
            self.round.spot.hands[0].value(),
            format_cards(&self.round.dealer_hand),
            self.round.dealer_value()
        );

        self.check_early_blackjack();
        Ok(())
    }

    pub fn hit(&mut self) -> Result<Card, RoundError> {
        self.require_open_hand()?;
        let card = self.round.deck.draw()?;

        let index = self.round.spot.active_hand_index;
        let hand = &mut self.round.spot.hands[index];
        hand.add_card(card);
        log::debug!("Hand {} hits {card}, total {}", index + 1, hand.value());

        if hand.is_busted() {
            log::debug!("Hand {} busts", index + 1);
            self.advance();
        }
        Ok(card)
    }

    pub fn stand(&mut self) -> Result<(), RoundError> {
        self.require_open_hand()?;
        let index = self.round.spot.active_hand_index;
        self.round.spot.hands[index].stood = true;
        log::debug!("Hand {} stands", index + 1);
        self.advance();
        Ok(())
    }

    /// Doubles the active hand's bet, draws exactly one card and stands.
    pub fn double_down(&mut self) -> Result<Card, RoundError> {
        let hand = self.require_open_hand()?;
        if !self.rules.allow_double {
            return Err(RoundError::InvalidAction("Doubling is not allowed at this table"));
        }
        if !hand.can_double() {
            return Err(RoundError::InvalidAction(
                "Can only double on a fresh two-card hand",
            ));
        }
        let additional_bet = hand.bet;
        if self.round.deck.is_empty() {
            return Err(RoundError::EmptyDeck);
        }
        self.ledger.debit(additional_bet)?;
        let card = self.round.deck.draw()?;

        let index = self.round.spot.active_hand_index;
        let hand = &mut self.round.spot.hands[index];
        hand.bet = hand.bet.saturating_add(additional_bet);
        hand.doubled = true;
        hand.add_card(card);
        if !hand.is_busted() {
            hand.stood = true;
        }
        log::debug!(
            "Hand {} doubles to {}, draws {card}, total {}",
            index + 1,
            hand.bet,
            hand.value()
        );

        self.advance();
        Ok(card)
    }

    /// Splits the active pair into two hands, dealing one card to each.
    pub fn split(&mut self) -> Result<(), RoundError> {
        let hand = self.require_open_hand()?;
        if !self.rules.allow_split {
            return Err(RoundError::InvalidAction("Splitting is not allowed at this table"));
        }
        if !hand.can_split() {
            return Err(RoundError::InvalidAction(
                "Can only split two cards of the same rank",
            ));
        }
        if !self.round.spot.can_split(&self.rules) {
            return Err(RoundError::InvalidAction("Split limit reached"));
        }
        let additional_bet = hand.bet;
        if self.round.deck.len() < 2 {
            return Err(RoundError::EmptyDeck);
        }
        self.ledger.debit(additional_bet)?;

        self.round.spot.split(&self.rules)?;
        let index = self.round.spot.active_hand_index;
        for offset in 0..2 {
            let card = self.round.deck.draw()?;
            self.round.spot.hands[index + offset].add_card(card);
        }
        log::debug!(
            "Split into {} and {}",
            format_cards(&self.round.spot.hands[index].cards),
            format_cards(&self.round.spot.hands[index + 1].cards)
        );
        Ok(())
    }

    /// Returns every card to the deck, reshuffles and resets for the next deal.
    pub fn new_round(&mut self) -> Result<(), RoundError> {
        if !self.round.is_terminal() {
            return Err(RoundError::InvalidAction("Round still in progress"));
        }

        let round = &self.round;
        let spent = round
            .spot
            .hands
            .iter()
            .map(|h| h.cards.as_slice())
            .chain(std::iter::once(round.dealer_hand.as_slice()));
        let deck = round.deck.reshuffle_discards(spent, &mut self.rng);

        log::debug!("Reshuffled {} cards for the next round", deck.len());
        self.round = Round::new(deck);
        self.bet = self.rules.min_bet;
        Ok(())
    }

    /// Clears a settled round if needed, then deals the next one.
    ///
    /// A rejected bet leaves the table between rounds, so the call can be
    /// retried with a different bet.
    pub fn deal_next_round(&mut self, bet: u64) -> Result<(), RoundError> {
        if self.round.is_terminal() {
            self.new_round()?;
        }
        if self.round.phase != GamePhase::NotStarted {
            return Err(RoundError::InvalidAction("Finish the current round first"));
        }
        self.start_round(bet)
    }

    fn check_bet_limits(&self, bet: u64) -> Result<(), RoundError> {
        if !self.rules.bet_within_limits(bet) {
            return Err(RoundError::InvalidAction("Bet outside table limits"));
        }
        if !self.rules.accepts_bet(bet) {
            return Err(RoundError::InvalidAction("Bet must pay out in whole chips"));
        }
        Ok(())
    }

    fn require_open_hand(&self) -> Result<&Hand, RoundError> {
        match self.round.phase {
            GamePhase::PlayerTurn => {}
            GamePhase::Settled => return Err(RoundError::InvalidAction("Round is over")),
            _ => return Err(RoundError::InvalidAction("Not player turn")),
        }
        match self.round.spot.active_hand() {
            Some(hand) if !hand.is_finished() => Ok(hand),
            _ => Err(RoundError::InvalidAction("Hand is not active")),
        }
    }

    fn check_early_blackjack(&mut self) {
        let player_blackjack = self.round.spot.hands[0].is_blackjack();
        let bet = self.bet;

        match (player_blackjack, self.round.dealer_has_blackjack()) {
            (true, true) => self.finish_early(OutcomeKind::Standoff, HandOutcome::Push, bet),
            (true, false) => {
                let payout = self.rules.blackjack_payout.total_return(bet);
                self.finish_early(OutcomeKind::PlayerBlackjack, HandOutcome::Blackjack, payout)
            }
            (false, true) => self.finish_early(OutcomeKind::DealerBlackjack, HandOutcome::Loss, 0),
            (false, false) => {
                self.round.spot.active_hand_index = 0;
                self.round.phase = GamePhase::PlayerTurn;
            }
        }
    }

    fn finish_early(&mut self, kind: OutcomeKind, outcome: HandOutcome, payout: u64) {
        let hand = &self.round.spot.hands[0];
        let result = HandResult {
            outcome,
            total: hand.value(),
            busted: false,
            bet: hand.bet,
            payout,
        };
        self.ledger.credit(payout);
        self.record_outcome(RoundOutcome {
            kind,
            dealer_total: self.round.dealer_value(),
            hands: vec![result],
        });
    }

    /// Moves to the next unfinished hand, or plays the dealer and settles.
    fn advance(&mut self) {
        if self.round.spot.move_to_next_hand() {
            log::debug!("Playing hand {}", self.round.spot.active_hand_index + 1);
            return;
        }
        self.resolve_dealer();
        self.settle();
    }

    fn resolve_dealer(&mut self) {
        self.round.phase = GamePhase::DealerTurn;
        if self.round.spot.all_hands_busted() {
            return;
        }

        while self.round.dealer_should_hit(&self.rules) {
            match self.round.deck.draw() {
                Ok(card) => {
                    self.round.dealer_hand.push(card);
                    log::debug!("Dealer draws {card}, total {}", self.round.dealer_value());
                }
                Err(_) => {
                    log::warn!(
                        "Deck exhausted, dealer stops at {}",
                        self.round.dealer_value()
                    );
                    break;
                }
            }
        }
    }

    fn settle(&mut self) {
        let dealer_total = self.round.dealer_value();
        let dealer_busted = dealer_total > 21;

        let hands: Vec<HandResult> = self
            .round
            .spot
            .hands
            .iter()
            .map(|hand| {
                let total = hand.value();
                let busted = hand.is_busted();
                let (outcome, payout) = if busted {
                    (HandOutcome::Loss, 0)
                } else if dealer_busted || total > dealer_total {
                    (HandOutcome::Win, self.rules.standard_payout.total_return(hand.bet))
                } else if total == dealer_total {
                    (HandOutcome::Push, hand.bet)
                } else {
                    (HandOutcome::Loss, 0)
                };
                HandResult {
                    outcome,
                    total,
                    busted,
                    bet: hand.bet,
                    payout,
                }
            })
            .collect();

        let outcome = RoundOutcome {
            kind: OutcomeKind::Showdown,
            dealer_total,
            hands,
        };
        self.ledger.credit(outcome.total_payout());
        self.record_outcome(outcome);
    }

    fn record_outcome(&mut self, outcome: RoundOutcome) {
        log::info!(
            "Round settled: {} (dealer {}, net {:+}, balance {})",
            outcome,
            outcome.dealer_total,
            outcome.net(),
            self.ledger.balance()
        );
        self.round.outcome = Some(outcome);
        self.round.phase = GamePhase::Settled;
    }
}

pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
