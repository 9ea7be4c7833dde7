//! Data access traits for places.
//!
//! The `PlaceStore` trait defines a read-only interface for retrieving
//! [`Place`] values matching a [`PlaceQuery`]. Consumers use it to fetch the
//! candidate pool for one ranking request.

use thiserror::Error;

use crate::{Place, PlaceQuery};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePlaceStore, SqlitePlaceStoreError, WritePlacesError, write_places};

/// Error raised by a [`PlaceStore`] while answering a query.
#[derive(Debug, Error)]
pub enum PlaceStoreError {
    /// The backend cannot currently serve queries.
    #[error("place store unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
    /// The backend failed while executing the query.
    #[error("place store query failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PlaceStoreError {
    /// Wrap a backend-specific error.
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }
}

/// Read-only access to persisted places.
///
/// Implementers return every place whose haversine distance from
/// `query.center` is at most `query.radius_m` and whose attributes satisfy
/// [`PlaceQuery::matches_attributes`]. Results are ordered nearest-first and
/// hold at most `query.limit` entries. Returned places are normalised (see
/// [`Place::normalised`]).
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use nearby_core::{Place, PlaceQuery, PlaceStore, PlaceStoreError};
///
/// struct VecStore {
///     places: Vec<Place>,
/// }
///
/// impl PlaceStore for VecStore {
///     fn find_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlaceStoreError> {
///         Ok(query.select(&self.places))
///     }
/// }
///
/// let centre = Coord { x: 121.5395, y: 25.0170 };
/// let store = VecStore { places: vec![Place::new("p1", "Cafe", centre)] };
/// let found = store
///     .find_places(&PlaceQuery::within(centre, 500.0))
///     .expect("in-memory query");
/// assert_eq!(found.len(), 1);
/// ```
pub trait PlaceStore: Send + Sync {
    /// Return the places matching `query`.
    ///
    /// # Errors
    /// Returns [`PlaceStoreError`] when the backend cannot answer.
    fn find_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlaceStoreError>;
}

impl<T: PlaceStore + ?Sized> PlaceStore for Box<T> {
    fn find_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlaceStoreError> {
        (**self).find_places(query)
    }
}
