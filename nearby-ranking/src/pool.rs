//! Candidate gathering shared by ranking and roulette.

use log::{debug, error};
use nearby_core::{Clock, FilterParams, GeoQueryBuilder, PlaceStore, RawFilterParams, Scorer};

use crate::{Candidate, RankingError};

/// Build filters, fetch, annotate and score.
#[derive(Debug)]
pub(crate) struct CandidatePool<S, C, K> {
    store: S,
    scorer: C,
    clock: K,
    builder: GeoQueryBuilder,
}

impl<S, C, K> CandidatePool<S, C, K>
where
    S: PlaceStore,
    C: Scorer,
    K: Clock,
{
    pub(crate) const fn new(store: S, scorer: C, clock: K) -> Self {
        Self {
            store,
            scorer,
            clock,
            builder: GeoQueryBuilder::new(),
        }
    }

    pub(crate) fn filters(&self, raw: &RawFilterParams) -> FilterParams {
        self.builder.build(raw)
    }

    pub(crate) const fn store(&self) -> &S {
        &self.store
    }

    /// Fetch every matching place and score it against `filters`.
    ///
    /// `open_now` is ignored here; callers decide whether to apply it.
    pub(crate) fn gather(&self, filters: &FilterParams) -> Result<Vec<Candidate>, RankingError> {
        let query = filters.to_query();
        let places = self.store.find_places(&query).map_err(|source| {
            error!("place store query failed: {source}");
            RankingError::Internal { source }
        })?;
        let now = self.clock.now();
        debug!("scoring {} candidate places at {now}", places.len());

        Ok(places
            .into_iter()
            .take(query.limit)
            .map(|place| Candidate::assess(place, filters.center, now, &self.scorer))
            .collect())
    }
}
