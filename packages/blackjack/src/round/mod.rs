use crate::{Card, Deck, Hand, RoundError, TableRules};
use serde::{Deserialize, Serialize};

mod outcome;

pub use outcome::{HandOutcome, HandResult, OutcomeKind, RoundOutcome};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    InitialDeal,
    PlayerTurn,
    DealerTurn,
    Settled,
}

/// The player's position at the table (can have multiple hands if split)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Spot {
    pub hands: Vec<Hand>,
    pub active_hand_index: usize,
    pub splits: u8,
}

impl Spot {
    pub fn new(bet: u64) -> Self {
        Self {
            hands: vec![Hand::new(bet)],
            active_hand_index: 0,
            splits: 0,
        }
    }

    pub fn active_hand(&self) -> Option<&Hand> {
        self.hands.get(self.active_hand_index)
    }

    pub fn active_hand_mut(&mut self) -> Option<&mut Hand> {
        self.hands.get_mut(self.active_hand_index)
    }

    pub fn has_next_hand(&self) -> bool {
        self.active_hand_index + 1 < self.hands.len()
    }

    pub fn move_to_next_hand(&mut self) -> bool {
        if self.has_next_hand() {
            self.active_hand_index += 1;
            true
        } else {
            false
        }
    }

    pub fn can_split(&self, rules: &TableRules) -> bool {
        if !rules.allow_split || self.splits >= rules.max_splits {
            return false;
        }
        self.active_hand()
            .is_some_and(|h| h.can_split() && !h.doubled && !h.stood)
    }

    /// Replaces the active pair with two one-card hands at the same position.
    /// Both hands carry the original bet; dealing their second cards is left
    /// to the caller.
    pub fn split(&mut self, rules: &TableRules) -> Result<(), RoundError> {
        if !self.can_split(rules) {
            return Err(RoundError::InvalidAction("Cannot split"));
        }

        let index = self.active_hand_index;
        let hand = &mut self.hands[index];
        let second_card = hand
            .cards
            .pop()
            .ok_or(RoundError::InvalidAction("No second card"))?;

        let mut new_hand = Hand::new(hand.bet);
        new_hand.add_card(second_card);
        self.hands.insert(index + 1, new_hand);
        self.splits += 1;

        Ok(())
    }

    pub fn all_hands_finished(&self) -> bool {
        self.hands.iter().all(Hand::is_finished)
    }

    pub fn all_hands_busted(&self) -> bool {
        !self.hands.is_empty() && self.hands.iter().all(Hand::is_busted)
    }

    pub fn total_bet(&self) -> u64 {
        self.hands.iter().fold(0u64, |acc, h| acc.saturating_add(h.bet))
    }
}

/// Everything on the table for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub deck: Deck,
    pub spot: Spot,
    pub dealer_hand: Vec<Card>,
    pub phase: GamePhase,
    pub outcome: Option<RoundOutcome>,
}

impl Round {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            spot: Spot::default(),
            dealer_hand: Vec::new(),
            phase: GamePhase::NotStarted,
            outcome: None,
        }
    }

    pub fn dealer_value(&self) -> u8 {
        crate::calculate_hand_value(&self.dealer_hand)
    }

    pub fn dealer_should_hit(&self, rules: &TableRules) -> bool {
        self.dealer_value() <= rules.dealer_hit_limit
    }

    pub fn dealer_has_blackjack(&self) -> bool {
        crate::is_blackjack(&self.dealer_hand)
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == GamePhase::Settled
    }

    pub fn active_hand(&self) -> Option<&Hand> {
        match self.phase {
            GamePhase::PlayerTurn => self.spot.active_hand(),
            _ => None,
        }
    }

    pub fn can_hit_current_hand(&self) -> bool {
        self.active_hand().is_some_and(|h| !h.is_finished()) && !self.deck.is_empty()
    }

    pub fn can_double_current_hand(&self, rules: &TableRules) -> bool {
        rules.allow_double
            && self.active_hand().is_some_and(Hand::can_double)
            && !self.deck.is_empty()
    }

    pub fn can_split_current_hand(&self, rules: &TableRules) -> bool {
        self.phase == GamePhase::PlayerTurn && self.spot.can_split(rules) && self.deck.len() >= 2
    }

    /// Cards dealt out of the deck this round
    pub fn table_cards(&self) -> impl Iterator<Item = &Card> {
        self.spot
            .hands
            .iter()
            .flat_map(|h| h.cards.iter())
            .chain(self.dealer_hand.iter())
    }

    /// Deck plus table. Constant for the lifetime of a session.
    pub fn card_count(&self) -> usize {
        self.deck.len() + self.table_cards().count()
    }
}

#[cfg(test)]
mod tests;
