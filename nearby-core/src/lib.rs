//! Core domain types for the Nearby place-ranking engine.
//!
//! The crate owns everything the ranking pipeline needs before a score is
//! attached: the [`Place`] model, great-circle distance, the weekday
//! availability check, filter normalisation and the read-only [`PlaceStore`]
//! boundary. Scoring strategies plug in through the [`Scorer`] trait.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod clock;
pub mod distance;
pub mod place;
pub mod query;
pub mod schedule;
pub mod scorer;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use clock::{Clock, SystemClock};
pub use distance::{EARTH_RADIUS_M, distance_between, haversine_distance};
pub use place::{LocalizedText, MAX_PRICE_LEVEL, MAX_RATING, MIN_PRICE_LEVEL, Place};
pub use query::{
    DEFAULT_LAT, DEFAULT_LNG, DEFAULT_RADIUS_M, FilterParams, GeoQueryBuilder, MAX_FILTER_TERM_LEN,
    MAX_RADIUS_M, PlaceQuery, RawFilterParams,
};
pub use schedule::{WeeklyAvailability, WeeklySchedule, is_open_now, weekday_key};
pub use scorer::{PlaceScore, PlaceSignals, ScoreBreakdown, Scorer};
pub use store::{PlaceStore, PlaceStoreError};

#[cfg(feature = "store-sqlite")]
pub use store::{SqlitePlaceStore, SqlitePlaceStoreError, WritePlacesError, write_places};
