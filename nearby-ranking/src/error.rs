//! Errors surfaced by ranking and roulette requests.

use nearby_core::PlaceStoreError;
use thiserror::Error;

/// Message reported when a roulette pool is empty.
pub const NO_PLACES_FOUND: &str = "No places found matching filters";

/// Errors raised by [`RankingPipeline`](crate::RankingPipeline) and
/// [`RouletteSelector`](crate::RouletteSelector).
#[derive(Debug, Error)]
pub enum RankingError {
    /// A required request field was missing.
    #[error("missing required field: {field}")]
    Validation {
        /// Name of the missing field.
        field: &'static str,
    },
    /// The request was valid but matched nothing.
    #[error("{message}")]
    NotFound {
        /// Caller-facing description.
        message: String,
    },
    /// The place store failed. Details are only reachable via `source()`.
    #[error("internal error while querying places")]
    Internal {
        /// Underlying store failure.
        #[source]
        source: PlaceStoreError,
    },
}

impl RankingError {
    /// Build the roulette empty-pool error.
    #[must_use]
    pub fn no_places_found() -> Self {
        Self::NotFound {
            message: NO_PLACES_FOUND.to_owned(),
        }
    }
}
