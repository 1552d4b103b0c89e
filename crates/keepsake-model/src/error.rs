use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("probability must be one of 10, 20, 30, 40 or 50 (got {0})")]
    InvalidProbability(i64),
    #[error("severity must be between 1 and 4 (got {0})")]
    InvalidSeverity(i64),
    #[error("unknown suggestion type: {0}")]
    UnknownSuggestionType(String),
    #[error("unknown suggestion bucket: {0}")]
    UnknownBucket(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
