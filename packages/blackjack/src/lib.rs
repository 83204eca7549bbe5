mod card;
mod chips;
mod deck;
mod error;
mod hand;
mod round;
mod rules;
mod table;

pub use card::{Card, Rank, Suit};
pub use chips::ChipLedger;
pub use deck::Deck;
pub use error::RoundError;
pub use hand::{Hand, calculate_hand_value, is_soft_hand, is_busted, is_blackjack, can_split_cards};
pub use round::{GamePhase, HandOutcome, HandResult, OutcomeKind, Round, RoundOutcome, Spot};
pub use rules::{PayoutRatio, TableRules};
pub use table::{format_cards, Table};
