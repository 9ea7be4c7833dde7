//! Ranked and random place selection for Nearby.
//!
//! Both entry points share one candidate-gathering stage: normalise the raw
//! filters, fetch matching places from a [`PlaceStore`](nearby_core::PlaceStore),
//! annotate each with its distance and weekday availability, and score it.
//!
//! - [`RankingPipeline`] then drops closed places when `open_now` is set and
//!   sorts by descending score.
//! - [`RouletteSelector`] skips the `open_now` filter and draws one candidate
//!   uniformly at random from an injected RNG.
//!
//! # Examples
//!
//! ```
//! use geo::Coord;
//! use nearby_core::{Place, RawFilterParams, test_support::MemoryStore};
//! use nearby_ranking::RankingPipeline;
//! use nearby_scorer::WeightedScorer;
//!
//! let store = MemoryStore::with_places([
//!     Place::new("p1", "Dumplings", Coord { x: 121.5395, y: 25.0170 }).with_rating(4.8),
//!     Place::new("p2", "Bakery", Coord { x: 121.5400, y: 25.0180 }).with_rating(3.2),
//! ]);
//! let pipeline = RankingPipeline::new(store, WeightedScorer::default());
//! let ranked = pipeline
//!     .run(&RawFilterParams::from_query_string("lat=25.0170&lng=121.5395"))
//!     .expect("in-memory store cannot fail");
//! assert_eq!(ranked.first().map(|c| c.place.id.as_str()), Some("p1"));
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod candidate;
mod error;
mod pipeline;
mod pool;
mod roulette;

pub use candidate::Candidate;
pub use error::{NO_PLACES_FOUND, RankingError};
pub use pipeline::RankingPipeline;
pub use roulette::RouletteSelector;
