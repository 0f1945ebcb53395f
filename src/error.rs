//! Error types for the trading bot

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum BotError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("market request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to parse {what} from {value:?}")]
    Parse { what: &'static str, value: String },

    #[error("market rejected request: {0}")]
    Market(String),

    #[error("unknown game: {0}")]
    UnknownGame(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn parse(what: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            what,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
