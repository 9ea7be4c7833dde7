//! Places annotated for one request.

use chrono::NaiveDateTime;
use geo::Coord;
use nearby_core::{Place, PlaceSignals, ScoreBreakdown, Scorer};
use serde::{Deserialize, Serialize};

/// A [`Place`] with its request-specific distance, availability and score.
///
/// Serialises as the place document extended with `distance_m`, `is_open`
/// (omitted when unknown), `score` and `score_breakdown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The underlying place.
    #[serde(flatten)]
    pub place: Place,
    /// Distance from the search centre in metres.
    pub distance_m: f64,
    /// Weekday availability; `None` when the place publishes no schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    /// Ranking score.
    pub score: f64,
    /// Per-signal display breakdown.
    #[serde(rename = "score_breakdown")]
    pub breakdown: ScoreBreakdown,
}

impl Candidate {
    /// Annotate and score `place` relative to `origin` at local time `now`.
    pub fn assess<C>(place: Place, origin: Coord<f64>, now: NaiveDateTime, scorer: &C) -> Self
    where
        C: Scorer + ?Sized,
    {
        let signals = PlaceSignals::observe(&place, origin, now);
        let scored = scorer.score(&place, &signals);
        Self {
            place,
            distance_m: signals.distance_m,
            is_open: signals.is_open,
            score: scored.score,
            breakdown: scored.breakdown,
        }
    }

    /// Whether the candidate is known to be open today.
    #[must_use]
    pub const fn is_known_open(&self) -> bool {
        matches!(self.is_open, Some(true))
    }
}
