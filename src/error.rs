use rust_decimal::Decimal;
use thiserror::Error;

/// Recoverable, user-facing failures of the economy engines.
/// None of these leave the state partially mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },
    #[error("case has no gifts")]
    EmptyCase,
    #[error("name must not be empty")]
    InvalidName,
    #[error("description must not be empty")]
    InvalidDescription,
    #[error("gift value must be at least {min}")]
    ValueTooLow { min: Decimal },
    #[error("case price must be at least {min}")]
    PriceTooLow { min: Decimal },
    #[error("gift not found")]
    GiftNotFound,
    #[error("case {0} not found")]
    CaseNotFound(u64),
    #[error("a draw is already in progress")]
    DrawInProgress,
    #[error("no prize waiting to be claimed")]
    NoPendingPrize,
}

/// Storage failures. Loading falls back to defaults, saving keeps the
/// in-memory state and warns.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}
