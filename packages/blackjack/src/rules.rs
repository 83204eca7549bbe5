use crate::RoundError;
use serde::{Deserialize, Serialize};

/// Payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, RoundError> {
        if denominator == 0 {
            return Err(RoundError::InvalidRules("Denominator cannot be zero"));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Winnings on top of the returned stake. Exact for bets where
    /// [`pays_whole_chips`](Self::pays_whole_chips) holds.
    pub fn calculate_payout(&self, bet: u64) -> u64 {
        let payout = (bet as u128 * self.numerator as u128) / self.denominator as u128;
        payout.min(u64::MAX as u128) as u64
    }

    pub fn pays_whole_chips(&self, bet: u64) -> bool {
        (bet as u128 * self.numerator as u128) % self.denominator as u128 == 0
    }

    /// Stake plus winnings.
    pub fn total_return(&self, bet: u64) -> u64 {
        bet.saturating_add(self.calculate_payout(bet))
    }
}

/// Configurable table rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    /// Dealer keeps drawing while the hand total is at or below this value
    pub dealer_hit_limit: u8,

    /// Payout for a natural dealt on the opening two cards
    pub blackjack_payout: PayoutRatio,

    /// Payout for an ordinary win
    pub standard_payout: PayoutRatio,

    /// Allow doubling down on a fresh two-card hand
    pub allow_double: bool,

    /// Allow splitting a pair into two hands
    pub allow_split: bool,

    /// Maximum number of splits per round
    pub max_splits: u8,

    pub min_bet: u64,
    pub max_bet: u64,

    /// Balance at the start of a game
    pub starting_chips: u64,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            dealer_hit_limit: 17,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            standard_payout: PayoutRatio::ONE_TO_ONE,
            allow_double: true,
            allow_split: true,
            max_splits: 3,
            min_bet: 10,
            max_bet: 500,
            starting_chips: 1000,
        }
    }
}

impl TableRules {
    /// The original single-hand table: hit/stand only, dealer draws below 16.
    pub fn classic() -> Self {
        Self {
            dealer_hit_limit: 15,
            allow_double: false,
            allow_split: false,
            max_splits: 0,
            ..Self::default()
        }
    }

    /// Default rules with doubling but no splitting
    pub fn single_hand() -> Self {
        Self {
            allow_split: false,
            max_splits: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RoundError> {
        if self.blackjack_payout.denominator == 0 || self.standard_payout.denominator == 0 {
            return Err(RoundError::InvalidRules("Denominator cannot be zero"));
        }
        if self.min_bet == 0 {
            return Err(RoundError::InvalidRules("Minimum bet must be positive"));
        }
        if self.min_bet > self.max_bet {
            return Err(RoundError::InvalidRules("Minimum bet exceeds maximum bet"));
        }
        if !self.blackjack_payout.pays_whole_chips(self.min_bet)
            || !self.standard_payout.pays_whole_chips(self.min_bet)
        {
            return Err(RoundError::InvalidRules("Minimum bet must pay out in whole chips"));
        }
        if self.dealer_hit_limit > 21 {
            return Err(RoundError::InvalidRules("Dealer hit limit above 21"));
        }
        Ok(())
    }

    pub fn bet_within_limits(&self, bet: u64) -> bool {
        (self.min_bet..=self.max_bet).contains(&bet)
    }

    /// Bet is within limits and every payout on it is a whole number of chips.
    pub fn accepts_bet(&self, bet: u64) -> bool {
        self.bet_within_limits(bet)
            && self.blackjack_payout.pays_whole_chips(bet)
            && self.standard_payout.pays_whole_chips(bet)
    }
}
