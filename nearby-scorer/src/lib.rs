//! Weighted desirability scoring for nearby places.
//!
//! [`WeightedScorer`] implements the [`Scorer`](nearby_core::Scorer) trait by
//! combining five normalised signals:
//!
//! | Signal | Formula |
//! |--------|---------|
//! | rating | `rating / 5` |
//! | distance | `exp(-km / 2)` |
//! | popularity | `min(ln(count + 1) / ln(10001), 1)` |
//! | open | `1.0` open, `0.3` closed, `0.5` unknown |
//! | context | [`ContextRules`] applied to the place's features |
//!
//! Each signal is multiplied by its [`ScoreWeights`] entry. The sum is the
//! ranking score; the breakdown reports every contribution scaled by ten.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use geo::Coord;
//! use nearby_core::{Place, PlaceSignals, Scorer};
//! use nearby_scorer::WeightedScorer;
//!
//! let place = Place::new("p1", "Tea House", Coord { x: 121.5395, y: 25.0170 })
//!     .with_rating(4.0)
//!     .with_rating_count(120);
//! let now = NaiveDate::from_ymd_opt(2024, 6, 3)
//!     .and_then(|day| day.and_hms_opt(12, 0, 0))
//!     .expect("valid timestamp");
//! let signals = PlaceSignals::observe(&place, place.location, now);
//!
//! let scored = WeightedScorer::default().score(&place, &signals);
//! assert!(scored.score > 0.0 && scored.score <= 1.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod engine;
mod error;
mod weights;


pub use context::{ContextBonus, ContextRules};
pub use engine::{
    BREAKDOWN_SCALE, WeightedScorer, distance_signal, open_signal, popularity_signal,
    rating_signal,
};
pub use error::ScoringConfigError;
pub use nearby_core::{PlaceScore, PlaceSignals, ScoreBreakdown};
pub use weights::ScoreWeights;
