use crate::{Card, Rank, RoundError, Suit};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ordered card sequence. The front is the next card to draw.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// Standard 52-card deck, suit-major and rank-minor.
    pub fn build() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    /// Deck in exactly the given order, first element drawn first.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    /// Fisher-Yates walk from the last index down to 1.
    pub fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Deck {
        let mut cards: Vec<Card> = self.cards.iter().copied().collect();
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }
        Deck::from_cards(cards)
    }

    pub fn draw(&mut self) -> Result<Card, RoundError> {
        self.cards.pop_front().ok_or(RoundError::EmptyDeck)
    }

    /// Recombines the remaining deck with every spent hand and shuffles the lot.
    pub fn reshuffle_discards<'a, I, R>(&self, spent_hands: I, rng: &mut R) -> Deck
    where
        I: IntoIterator<Item = &'a [Card]>,
        R: Rng + ?Sized,
    {
        let mut combined = self.clone();
        for hand in spent_hands {
            combined.cards.extend(hand.iter().copied());
        }
        combined.shuffle(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_build_has_52_distinct_cards() {
        let deck = Deck::build();
        assert_eq!(deck.len(), 52);
        let unique: HashSet<Card> = deck.cards().copied().collect();
        assert_eq!(unique.len(), 52);
        for suit in Suit::ALL {
            assert_eq!(deck.cards().filter(|c| c.suit == suit).count(), 13);
        }
        for rank in Rank::ALL {
            assert_eq!(deck.cards().filter(|c| c.rank == rank).count(), 4);
        }
    }

    #[test]
    fn test_build_order_matches_card_index() {
        for (index, card) in Deck::build().cards().enumerate() {
            assert_eq!(card.index(), index);
        }
    }

    #[test]
    fn test_draw_takes_from_front() {
        let mut deck = Deck::build();
        let first = deck.draw().unwrap();
        assert_eq!(first, Card::new(Rank::Ace, Suit::Clubs));
        assert_eq!(deck.len(), 51);
        assert_eq!(deck.peek(), Some(&Card::new(Rank::Two, Suit::Clubs)));
    }

    #[test]
    fn test_draw_empty_deck() {
        let mut deck = Deck::from_cards(vec![Card::new(Rank::Nine, Suit::Hearts)]);
        assert!(deck.draw().is_ok());
        assert_eq!(deck.draw(), Err(RoundError::EmptyDeck));
    }

    #[test]
    fn test_shuffle_leaves_original_untouched() {
        let deck = Deck::build();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let shuffled = deck.shuffle(&mut rng);
        assert_eq!(deck, Deck::build());
        assert_eq!(shuffled.len(), 52);
        assert_ne!(shuffled, deck);
    }

    #[test]
    fn test_shuffle_is_reproducible_with_seed() {
        let deck = Deck::build();
        let a = deck.shuffle(&mut ChaCha8Rng::seed_from_u64(42));
        let b = deck.shuffle(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_single_card_and_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(Deck::default().shuffle(&mut rng).is_empty());
        let one = Deck::from_cards(vec![Card::new(Rank::Two, Suit::Spades)]);
        assert_eq!(one.shuffle(&mut rng), one);
    }

    #[test]
    fn test_reshuffle_discards_restores_full_deck() {
        let mut deck = Deck::build().shuffle(&mut ChaCha8Rng::seed_from_u64(3));
        let player: Vec<Card> = (0..3).map(|_| deck.draw().unwrap()).collect();
        let dealer: Vec<Card> = (0..4).map(|_| deck.draw().unwrap()).collect();
        assert_eq!(deck.len(), 45);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let combined = deck.reshuffle_discards([player.as_slice(), dealer.as_slice()], &mut rng);
        assert_eq!(combined.len(), 52);
        let unique: HashSet<Card> = combined.cards().copied().collect();
        assert_eq!(unique.len(), 52);
    }
}
