use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Insufficient data: need at least {needed} distinct books, found {found}")]
    InsufficientData { needed: usize, found: usize },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QuizError>;
