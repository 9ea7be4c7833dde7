//! Facade crate for the Nearby place-ranking engine.
//!
//! This crate re-exports the domain types, the weighted scorer and the
//! ranking entry points, with the SQLite store and test doubles behind
//! feature flags.

#![forbid(unsafe_code)]

pub use nearby_core::{
    Clock, FilterParams, GeoQueryBuilder, LocalizedText, Place, PlaceQuery, PlaceScore,
    PlaceSignals, PlaceStore, PlaceStoreError, RawFilterParams, ScoreBreakdown, Scorer,
    SystemClock, WeeklyAvailability, WeeklySchedule, distance_between, haversine_distance,
    is_open_now,
};
pub use nearby_ranking::{Candidate, RankingError, RankingPipeline, RouletteSelector};
pub use nearby_scorer::{ContextBonus, ContextRules, ScoreWeights, ScoringConfigError, WeightedScorer};

#[cfg(feature = "store-sqlite")]
pub use nearby_core::{SqlitePlaceStore, SqlitePlaceStoreError, write_places};

#[cfg(feature = "test-support")]
pub use nearby_core::test_support;
