//! Relative weighting of the five scoring signals.

use serde::{Deserialize, Serialize};

use crate::ScoringConfigError;

/// Multipliers applied to each normalised signal.
///
/// The defaults sum to `1.0`, which keeps the score in `0.0..=1.0` and the
/// breakdown total in `0.0..=10.0`. Other sums are accepted; the breakdown
/// total always equals the sum of its components.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Multiplier for the rating signal.
    pub rating: f64,
    /// Multiplier for the proximity signal.
    pub distance: f64,
    /// Multiplier for the rating-count signal.
    pub popularity: f64,
    /// Multiplier for the opening-state signal.
    pub open: f64,
    /// Multiplier for the feature-context signal.
    pub context: f64,
}

impl ScoreWeights {
    /// Validate the weights and return a copy.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidWeights`] when any value is not
    /// finite, any value is negative or the total weight is zero.
    pub const fn validate(self) -> Result<Self, ScoringConfigError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(ScoringConfigError::InvalidWeights)
        }
    }

    /// Report whether [`ScoreWeights::validate`] would accept these weights.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.has_finite_values() && self.has_non_negative_values() && self.has_non_zero_total()
    }

    /// Sum of all five weights.
    #[expect(
        clippy::float_arithmetic,
        reason = "validation sums weights to ensure a non-zero total"
    )]
    #[must_use]
    pub const fn total(self) -> f64 {
        self.rating + self.distance + self.popularity + self.open + self.context
    }

    const fn has_finite_values(self) -> bool {
        self.rating.is_finite()
            && self.distance.is_finite()
            && self.popularity.is_finite()
            && self.open.is_finite()
            && self.context.is_finite()
    }

    const fn has_non_negative_values(self) -> bool {
        self.rating >= 0.0
            && self.distance >= 0.0
            && self.popularity >= 0.0
            && self.open >= 0.0
            && self.context >= 0.0
    }

    const fn has_non_zero_total(self) -> bool {
        self.total() > 0.0
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            rating: 0.30,
            distance: 0.25,
            popularity: 0.20,
            open: 0.15,
            context: 0.10,
        }
    }
}
