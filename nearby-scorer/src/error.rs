//! Error types raised while configuring the scorer.

use thiserror::Error;

/// Errors raised when scorer configuration is unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringConfigError {
    /// Provided weights were unusable.
    #[error("weights must be finite, non-negative and sum to a positive value")]
    InvalidWeights,
    /// Provided context rules were unusable.
    #[error("context rules must use finite, non-negative values: {reason}")]
    InvalidContextRules {
        /// Which part of the rules was rejected.
        reason: &'static str,
    },
}
