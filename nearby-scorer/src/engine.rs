//! The weighted scorer and its per-signal normalisers.

use log::trace;
use nearby_core::{MAX_RATING, Place, PlaceScore, PlaceSignals, ScoreBreakdown, Scorer};

use crate::{ContextRules, ScoreWeights, ScoringConfigError};

/// Factor applied to every breakdown component for display.
pub const BREAKDOWN_SCALE: f64 = 10.0;

/// Distance in kilometres at which the proximity signal falls to `1/e`.
const DISTANCE_DECAY_KM: f64 = 2.0;

/// Rating count treated as saturated popularity.
const POPULARITY_SATURATION: f64 = 10_000.0;

const OPEN_SIGNAL: f64 = 1.0;
const CLOSED_SIGNAL: f64 = 0.3;
const UNKNOWN_OPEN_SIGNAL: f64 = 0.5;

/// Normalise a `0..=5` rating to `0..=1`.
#[expect(clippy::float_arithmetic, reason = "rating is scaled onto the unit range")]
#[must_use]
pub fn rating_signal(rating: f64) -> f64 {
    (rating / MAX_RATING).clamp(0.0, 1.0)
}

/// Proximity signal: `1.0` at the centre, decaying as `exp(-km / 2)`.
#[expect(clippy::float_arithmetic, reason = "exponential decay over distance")]
#[must_use]
pub fn distance_signal(distance_m: f64) -> f64 {
    let km = distance_m.max(0.0) / 1000.0;
    (-km / DISTANCE_DECAY_KM).exp()
}

/// Log-scaled popularity, saturating at 10 000 ratings.
#[expect(clippy::float_arithmetic, reason = "log scaling of the rating count")]
#[expect(
    clippy::cast_precision_loss,
    reason = "counts beyond 2^52 are far past saturation"
)]
#[must_use]
pub fn popularity_signal(rating_count: u64) -> f64 {
    let count = rating_count as f64;
    ((count + 1.0).ln() / (POPULARITY_SATURATION + 1.0).ln()).min(1.0)
}

/// Opening-state signal; unknown schedules sit between open and closed.
#[must_use]
pub const fn open_signal(is_open: Option<bool>) -> f64 {
    match is_open {
        Some(true) => OPEN_SIGNAL,
        Some(false) => CLOSED_SIGNAL,
        None => UNKNOWN_OPEN_SIGNAL,
    }
}

/// [`Scorer`] combining five weighted signals.
///
/// Weights and context rules are explicit configuration validated at
/// construction; the scorer holds no other state.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedScorer {
    weights: ScoreWeights,
    context: ContextRules,
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            context: ContextRules::default(),
        }
    }
}

impl WeightedScorer {
    /// Build a scorer with `weights` and the default context rules.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidWeights`] when the weights fail
    /// [`ScoreWeights::validate`].
    pub fn new(weights: ScoreWeights) -> Result<Self, ScoringConfigError> {
        Ok(Self {
            weights: weights.validate()?,
            context: ContextRules::default(),
        })
    }

    /// Replace the context rules.
    ///
    /// # Errors
    /// Returns [`ScoringConfigError::InvalidContextRules`] when the rules fail
    /// [`ContextRules::validate`].
    pub fn with_context_rules(self, context: ContextRules) -> Result<Self, ScoringConfigError> {
        Ok(Self {
            weights: self.weights,
            context: context.validate()?,
        })
    }

    /// Weights in use.
    #[must_use]
    pub const fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Context rules in use.
    #[must_use]
    pub const fn context_rules(&self) -> &ContextRules {
        &self.context
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "score blending requires weighted sums"
    )]
    fn blend(&self, place: &Place, signals: &PlaceSignals) -> PlaceScore {
        let weights = self.weights;
        let rating = rating_signal(place.rating) * weights.rating;
        let distance = distance_signal(signals.distance_m) * weights.distance;
        let popularity = popularity_signal(place.rating_count) * weights.popularity;
        let open = open_signal(signals.is_open) * weights.open;
        let context = self.context.evaluate(&place.features) * weights.context;

        let breakdown = ScoreBreakdown {
            rating: rating * BREAKDOWN_SCALE,
            distance: distance * BREAKDOWN_SCALE,
            popularity: popularity * BREAKDOWN_SCALE,
            open: open * BREAKDOWN_SCALE,
            context: context * BREAKDOWN_SCALE,
            total: 0.0,
        };
        let total = breakdown.rating
            + breakdown.distance
            + breakdown.popularity
            + breakdown.open
            + breakdown.context;
        let score = rating + distance + popularity + open + context;

        PlaceScore {
            score: Self::sanitise(score),
            breakdown: ScoreBreakdown { total, ..breakdown },
        }
    }
}

impl Scorer for WeightedScorer {
    fn score(&self, place: &Place, signals: &PlaceSignals) -> PlaceScore {
        let scored = self.blend(place, signals);
        trace!("scored place {} at {:.4}", place.id, scored.score);
        scored
    }
}
