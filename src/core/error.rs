//! Engine error type.
//!
//! Validation rejections have their own type ([`crate::rules::Rejection`]);
//! `RulesError` covers failures of the model operations themselves and of
//! session setup.

use thiserror::Error;

use crate::cards::CardId;

/// Errors raised by the card model, session setup and snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("card {0} not found")]
    NotFound(CardId),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("invalid rules config: {0}")]
    InvalidConfig(String),

    #[error("player count {count} outside {min}..={max}")]
    PlayerCount { count: usize, min: usize, max: usize },

    #[error("snapshot codec failed: {0}")]
    Snapshot(String),
}

impl From<bincode::Error> for RulesError {
    fn from(err: bincode::Error) -> Self {
        RulesError::Snapshot(err.to_string())
    }
}
