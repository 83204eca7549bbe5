use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
    Blackjack,
}

impl fmt::Display for HandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            HandOutcome::Win => "Win",
            HandOutcome::Loss => "Lost",
            HandOutcome::Push => "Push",
            HandOutcome::Blackjack => "Blackjack win",
        };
        f.write_str(text)
    }
}

/// Settlement of a single player hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub outcome: HandOutcome,
    pub total: u8,
    pub busted: bool,
    pub bet: u64,
    /// Chips returned to the player, stake included
    pub payout: u64,
}

/// How the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// Both sides dealt a natural
    Standoff,
    PlayerBlackjack,
    DealerBlackjack,
    /// Player hands played out and compared against the dealer
    Showdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub kind: OutcomeKind,
    pub dealer_total: u8,
    pub hands: Vec<HandResult>,
}

impl RoundOutcome {
    pub fn total_payout(&self) -> u64 {
        self.hands
            .iter()
            .fold(0u64, |acc, h| acc.saturating_add(h.payout))
    }

    pub fn total_bet(&self) -> u64 {
        self.hands.iter().fold(0u64, |acc, h| acc.saturating_add(h.bet))
    }

    /// Net chip change for the round, signed
    pub fn net(&self) -> i128 {
        self.total_payout() as i128 - self.total_bet() as i128
    }

    pub fn message(&self) -> String {
        match self.kind {
            OutcomeKind::Standoff => "Standoff".to_string(),
            OutcomeKind::PlayerBlackjack => "Blackjack win".to_string(),
            OutcomeKind::DealerBlackjack => "Dealer blackjack, player loses".to_string(),
            OutcomeKind::Showdown => match self.hands.as_slice() {
                [single] if single.busted => "Busted, lost".to_string(),
                [single] => single.outcome.to_string(),
                hands => hands
                    .iter()
                    .enumerate()
                    .map(|(i, h)| format!("Hand {}: {}", i + 1, h.outcome))
                    .collect::<Vec<_>>()
                    .join(", "),
            },
        }
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
