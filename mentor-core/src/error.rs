//! Engine error taxonomy.
//!
//! Deliberately small. Model failures are absent: every one of them is
//! absorbed by a deterministic fallback before reaching a caller. What
//! remains is bad input and broken storage.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required field was missing or empty. Maps to a client error at the
    /// host boundary.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The injected plan store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
