//! Ranked list of nearby places.

use log::debug;
use nearby_core::{Clock, FilterParams, PlaceStore, RawFilterParams, Scorer, SystemClock};

use crate::{Candidate, RankingError, pool::CandidatePool};

/// Produces score-ordered candidates for a filter request.
///
/// The pipeline is stateless between runs and may be shared across threads
/// when its store, scorer and clock are.
#[derive(Debug)]
pub struct RankingPipeline<S, C, K = SystemClock> {
    pool: CandidatePool<S, C, K>,
}

impl<S, C> RankingPipeline<S, C, SystemClock>
where
    S: PlaceStore,
    C: Scorer,
{
    /// Construct a pipeline reading the system clock.
    pub const fn new(store: S, scorer: C) -> Self {
        Self::with_clock(store, scorer, SystemClock)
    }
}

impl<S, C, K> RankingPipeline<S, C, K>
where
    S: PlaceStore,
    C: Scorer,
    K: Clock,
{
    /// Construct a pipeline with an explicit clock.
    pub const fn with_clock(store: S, scorer: C, clock: K) -> Self {
        Self {
            pool: CandidatePool::new(store, scorer, clock),
        }
    }

    /// Borrow the underlying place store.
    pub const fn store(&self) -> &S {
        self.pool.store()
    }

    /// Normalise `raw` and rank the matching places.
    ///
    /// An empty result is a success.
    ///
    /// # Errors
    /// Returns [`RankingError::Internal`] when the place store fails.
    pub fn run(&self, raw: &RawFilterParams) -> Result<Vec<Candidate>, RankingError> {
        let filters = self.pool.filters(raw);
        self.rank(&filters)
    }

    /// Rank places for already-normalised `filters`.
    ///
    /// When `filters.open_now` is set only candidates known to be open today
    /// are kept. Candidates are ordered by descending score; the order of
    /// equal scores is unspecified.
    ///
    /// # Errors
    /// Returns [`RankingError::Internal`] when the place store fails.
    pub fn rank(&self, filters: &FilterParams) -> Result<Vec<Candidate>, RankingError> {
        let mut candidates = self.pool.gather(filters)?;
        if filters.open_now {
            candidates.retain(Candidate::is_known_open);
        }
        candidates.sort_unstable_by(|lhs, rhs| rhs.score.total_cmp(&lhs.score));
        debug!("ranked {} candidates", candidates.len());
        Ok(candidates)
    }
}
