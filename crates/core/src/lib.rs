pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ScoringThresholds};
pub use error::{CoreResult, ScoringError};
pub use types::*;
