use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board must have at least one row and one column")]
    InvalidBoardShape,
}

pub type Result<T, E = GameError> = core::result::Result<T, E>;

/// Failures crossing the persistence boundary of the reward subsystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("Granting {amount} coins to {user} failed: {reason}")]
    GrantFailed {
        user: String,
        amount: u32,
        reason: String,
    },
    #[error("Counter store failure: {0}")]
    Store(String),
    #[error("Insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance { available: u64, requested: u64 },
}

pub type RewardResult<T> = Result<T, RewardError>;
