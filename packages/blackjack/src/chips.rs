use crate::RoundError;
use serde::{Deserialize, Serialize};

/// Player chip balance. Never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChipLedger {
    balance: u64,
}

impl ChipLedger {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    pub fn debit(&mut self, amount: u64) -> Result<(), RoundError> {
        if !self.can_afford(amount) {
            return Err(RoundError::InsufficientChips {
                available: self.balance,
                required: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }
}
