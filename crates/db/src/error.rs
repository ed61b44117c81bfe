//! Configuration store error types.

use thiserror::Error;

/// Configuration store operation errors.
///
/// `NotFound` and `MethodConflict` are distinct variants rather than
/// collapsed error strings: callers branch on them to render precise
/// messages ("this value was last set by the scheduler and cannot be
/// changed from here").
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("{entity} is owned by method '{owner}'")]
    MethodConflict { entity: String, owner: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Build a method-conflict error for an entity owned by `owner`.
    pub fn conflict(entity: impl Into<String>, owner: impl std::fmt::Display) -> Self {
        Self::MethodConflict {
            entity: entity.into(),
            owner: owner.to_string(),
        }
    }

    /// Whether this error is a missing-entity failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error is an overwrite-authority failure.
    pub fn is_method_conflict(&self) -> bool {
        matches!(self, Self::MethodConflict { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
