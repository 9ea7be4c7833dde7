//! Test-only helpers: an in-memory `PlaceStore`, a store that always fails,
//! and a fixed clock.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{Clock, Place, PlaceQuery, PlaceStore, PlaceStoreError};

/// In-memory `PlaceStore` implementation used in tests.
///
/// The store performs a linear scan and is intended only for small datasets.
/// Places are normalised on insertion, mirroring the SQLite store.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    places: Vec<Place>,
}

impl MemoryStore {
    /// Create a store from a collection of places.
    pub fn with_places<I>(places: I) -> Self
    where
        I: IntoIterator<Item = Place>,
    {
        Self {
            places: places.into_iter().map(Place::normalised).collect(),
        }
    }

    /// Borrow the stored places.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }
}

impl PlaceStore for MemoryStore {
    fn find_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlaceStoreError> {
        Ok(query.select(&self.places))
    }
}

/// `PlaceStore` that rejects every query with [`PlaceStoreError::Unavailable`].
#[derive(Debug, Clone)]
pub struct FailingStore {
    reason: String,
}

impl FailingStore {
    /// Create a store failing with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("connection refused")
    }
}

impl PlaceStore for FailingStore {
    fn find_places(&self, _query: &PlaceQuery) -> Result<Vec<Place>, PlaceStoreError> {
        Err(PlaceStoreError::Unavailable {
            reason: self.reason.clone(),
        })
    }
}

/// [`Clock`] frozen at a single instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Noon on Monday 2024-06-03.
    #[must_use]
    pub fn monday_noon() -> Self {
        let at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .unwrap_or_default();
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
