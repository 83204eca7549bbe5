use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("Deck is empty")]
    EmptyDeck,
    #[error("Invalid action: {0}")]
    InvalidAction(&'static str),
    #[error("Insufficient chips: available {available}, required {required}")]
    InsufficientChips { available: u64, required: u64 },
    #[error("Invalid rules: {0}")]
    InvalidRules(&'static str),
}
