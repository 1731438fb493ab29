use thiserror::Error;

pub type CoreResult<T> = Result<T, ScoringError>;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid scoring thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ScoringError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
