use crate::Card;
use serde::{Deserialize, Serialize};

/// Calculate the value of a blackjack hand.
///
/// Every ace is first counted as 1. Aces are then promoted to 11 one at a
/// time while the promotion keeps the total at or below 21.
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    let mut total: u16 = 0;
    let mut aces: u16 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total += card.value() as u16;
    }

    while aces > 0 && total + 10 <= 21 {
        total += 10;
        aces -= 1;
    }

    total.min(u8::MAX as u16) as u8
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    let hard: u16 = cards.iter().map(|c| c.value() as u16).sum();
    cards.iter().any(Card::is_ace) && hard + 10 <= 21
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

/// Check if two cards can be split (same rank symbol)
pub fn can_split_cards(card1: &Card, card2: &Card) -> bool {
    card1.rank == card2.rank
}

/// One player hand together with the chips riding on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub bet: u64,
    pub doubled: bool,
    pub stood: bool,
}

impl Hand {
    pub fn new(bet: u64) -> Self {
        Self {
            cards: Vec::new(),
            bet,
            doubled: false,
            stood: false,
        }
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    /// A hand takes no further player decisions once stood or busted.
    pub fn is_finished(&self) -> bool {
        self.stood || self.is_busted()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    /// Doubling is only offered as the first decision on a two-card hand.
    pub fn can_double(&self) -> bool {
        self.cards.len() == 2 && !self.doubled && !self.is_finished()
    }
}
