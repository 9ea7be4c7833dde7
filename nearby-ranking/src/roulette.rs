//! Uniform random pick among matching places.

use log::debug;
use nearby_core::{Clock, PlaceStore, RawFilterParams, Scorer, SystemClock};
use rand::Rng;

use crate::{Candidate, RankingError, pool::CandidatePool};

/// Draws one candidate uniformly from the full matching pool.
///
/// Unlike [`RankingPipeline`](crate::RankingPipeline), the `open_now` filter
/// is not applied: closed and unknown places stay in the pool.
#[derive(Debug)]
pub struct RouletteSelector<S, C, K = SystemClock> {
    pool: CandidatePool<S, C, K>,
}

impl<S, C> RouletteSelector<S, C, SystemClock>
where
    S: PlaceStore,
    C: Scorer,
{
    /// Construct a selector reading the system clock.
    pub const fn new(store: S, scorer: C) -> Self {
        Self::with_clock(store, scorer, SystemClock)
    }
}

impl<S, C, K> RouletteSelector<S, C, K>
where
    S: PlaceStore,
    C: Scorer,
    K: Clock,
{
    /// Construct a selector with an explicit clock.
    pub const fn with_clock(store: S, scorer: C, clock: K) -> Self {
        Self {
            pool: CandidatePool::new(store, scorer, clock),
        }
    }

    /// Pick one matching place using `rng`.
    ///
    /// # Errors
    /// - [`RankingError::Validation`] when `lat` or `lng` is missing; the
    ///   store is not queried.
    /// - [`RankingError::NotFound`] when no place matches.
    /// - [`RankingError::Internal`] when the place store fails.
    pub fn spin<R>(&self, raw: &RawFilterParams, rng: &mut R) -> Result<Candidate, RankingError>
    where
        R: Rng,
    {
        if !raw.has_center() {
            let field = if raw.lat.as_deref().is_some_and(|lat| !lat.trim().is_empty()) {
                "lng"
            } else {
                "lat"
            };
            return Err(RankingError::Validation { field });
        }

        let filters = self.pool.filters(raw);
        let mut candidates = self.pool.gather(&filters)?;
        if candidates.is_empty() {
            return Err(RankingError::no_places_found());
        }

        let index = rng.gen_range(0..candidates.len());
        debug!("roulette drew {index} of {}", candidates.len());
        Ok(candidates.swap_remove(index))
    }
}
