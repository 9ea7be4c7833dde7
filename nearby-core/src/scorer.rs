//! Score places for a ranking request.
//!
//! The [`Scorer`] trait assigns a relevance score to a [`Place`] given the
//! request-dependent [`PlaceSignals`] observed for it.

use chrono::NaiveDateTime;
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{Place, distance_between, is_open_now};

/// Request-dependent observations about one place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceSignals {
    /// Great-circle distance from the search centre in metres.
    pub distance_m: f64,
    /// Weekday availability: `None` when the place has no schedule.
    pub is_open: Option<bool>,
}

impl PlaceSignals {
    /// Measure `place` against the search `origin` at local time `now`.
    #[must_use]
    pub fn observe(place: &Place, origin: Coord<f64>, now: NaiveDateTime) -> Self {
        Self {
            distance_m: distance_between(origin, place.location),
            is_open: place
                .open_hours
                .as_ref()
                .map(|schedule| is_open_now(schedule, now)),
        }
    }
}

/// Per-signal contributions on a `0..=10` display scale.
///
/// Each component is the weighted signal multiplied by ten; `total` is their
/// sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Rating contribution.
    pub rating: f64,
    /// Proximity contribution.
    pub distance: f64,
    /// Rating-count contribution.
    pub popularity: f64,
    /// Opening-state contribution.
    pub open: f64,
    /// Feature-context contribution.
    pub context: f64,
    /// Sum of the components above.
    pub total: f64,
}

/// Result of scoring one place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaceScore {
    /// Weighted score used for ordering; `0.0..=1.0` when the weights sum to 1.
    pub score: f64,
    /// Display breakdown of `score`.
    pub breakdown: ScoreBreakdown,
}

/// Calculate a relevance score for a place.
///
/// Implementations must be thread-safe (`Send` + `Sync`) so a pipeline can be
/// shared across request handlers. Scoring is infallible; implementations
/// return a finite, non-negative score and use [`Scorer::sanitise`] to
/// enforce it. The upper bound follows from the weights in use.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use geo::Coord;
/// use nearby_core::{Place, PlaceScore, PlaceSignals, Scorer};
///
/// struct FlatScorer;
///
/// impl Scorer for FlatScorer {
///     fn score(&self, _place: &Place, _signals: &PlaceSignals) -> PlaceScore {
///         PlaceScore { score: 0.5, ..PlaceScore::default() }
///     }
/// }
///
/// let place = Place::new("p1", "Cafe", Coord { x: 121.5, y: 25.0 });
/// let now = NaiveDate::from_ymd_opt(2024, 6, 3)
///     .and_then(|d| d.and_hms_opt(12, 0, 0))
///     .unwrap();
/// let signals = PlaceSignals::observe(&place, place.location, now);
/// assert_eq!(FlatScorer.score(&place, &signals).score, 0.5);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a score for `place` given its observed `signals`.
    fn score(&self, place: &Place, signals: &PlaceSignals) -> PlaceScore;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite or negative values.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if score.is_finite() { score.max(0.0) } else { 0.0 }
    }
}

impl<T: Scorer + ?Sized> Scorer for Box<T> {
    fn score(&self, place: &Place, signals: &PlaceSignals) -> PlaceScore {
        (**self).score(place, signals)
    }
}
