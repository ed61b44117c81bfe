//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid method tag: {0}")]
    InvalidMethod(String),

    #[error("invalid setting context: {0}")]
    InvalidContext(String),

    #[error("invalid setting type: {0}")]
    InvalidSettingType(String),

    #[error("invalid job schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
