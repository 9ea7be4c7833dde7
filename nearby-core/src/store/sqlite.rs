//! SQLite-backed store implementation for persisted places.
//!
//! Places live in a single table:
//!
//! ```sql
//! CREATE TABLE places (
//!     id TEXT PRIMARY KEY,
//!     lon REAL NOT NULL,
//!     lat REAL NOT NULL,
//!     document TEXT NOT NULL
//! )
//! ```
//!
//! `document` holds the JSON form of a [`Place`]. Coordinates are loaded
//! into an in-memory R\*-tree when the store opens; queries pre-filter with a
//! bounding box around the search circle and fetch the surviving documents.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::debug;
use rstar::{AABB, RTree, primitives::GeomWithData};
use rusqlite::{Connection, OpenFlags, params, params_from_iter};
use thiserror::Error;

use crate::{EARTH_RADIUS_M, Place, PlaceQuery};

use super::{PlaceStore, PlaceStoreError};

/// SQLite limits bound parameters per statement to 999 by default. The store
/// chunks `IN` queries to remain below that ceiling.
const SQLITE_MAX_VARIABLE_NUMBER: usize = 999;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS places (
    id TEXT PRIMARY KEY,
    lon REAL NOT NULL,
    lat REAL NOT NULL,
    document TEXT NOT NULL
)";

type IndexedPlace = GeomWithData<[f64; 2], String>;

/// Error raised when opening or reading the persisted place table.
#[derive(Debug, Error)]
pub enum SqlitePlaceStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A row carried coordinates that cannot be indexed.
    #[error("place {id} has non-finite coordinates")]
    InvalidCoordinates {
        /// Identifier of the offending row.
        id: String,
    },
    /// The stored document was not a valid place.
    #[error("failed to parse document for place {id}: {source}")]
    InvalidDocument {
        /// Identifier of the offending row.
        id: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Generic SQLite error when reading rows.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Error raised by [`write_places`].
#[derive(Debug, Error)]
pub enum WritePlacesError {
    /// A place could not be encoded as JSON.
    #[error("failed to encode place {id}: {source}")]
    Encode {
        /// Identifier of the place.
        id: String,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// SQLite rejected the write.
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// Read-only place store backed by SQLite documents and an R\*-tree.
pub struct SqlitePlaceStore {
    connection: Mutex<Connection>,
    index: RTree<IndexedPlace>,
}

impl fmt::Debug for SqlitePlaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceStore")
            .field("entries", &self.index.size())
            .finish_non_exhaustive()
    }
}

impl SqlitePlaceStore {
    /// Open the database at `path` read-only and index its coordinates.
    ///
    /// # Errors
    /// Fails when the database cannot be opened, the `places` table is
    /// missing, or a row holds non-finite coordinates.
    pub fn open<P>(path: P) -> Result<Self, SqlitePlaceStoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| SqlitePlaceStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;

        let entries = load_index_entries(&connection)?;
        debug!(
            "indexed {} places from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            connection: Mutex::new(connection),
            index: RTree::bulk_load(entries),
        })
    }

    /// Number of indexed places.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Return `true` when the store holds no places.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    fn ids_near(&self, query: &PlaceQuery) -> Vec<String> {
        let mut ids: Vec<String> = search_envelopes(query)
            .iter()
            .flat_map(|envelope| self.index.locate_in_envelope(envelope))
            .map(|entry| entry.data.clone())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl PlaceStore for SqlitePlaceStore {
    fn find_places(&self, query: &PlaceQuery) -> Result<Vec<Place>, PlaceStoreError> {
        let ids = self.ids_near(query);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let connection = self
            .connection
            .lock()
            .map_err(|_| PlaceStoreError::Unavailable {
                reason: String::from("SQLite connection lock poisoned"),
            })?;
        let mut places = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(SQLITE_MAX_VARIABLE_NUMBER) {
            places.extend(load_places_chunk(&connection, chunk).map_err(PlaceStoreError::backend)?);
        }
        drop(connection);

        Ok(query.select(&places))
    }
}

/// Bounding boxes in lon/lat degrees that together enclose the query circle.
///
/// The boxes are a superset; callers still apply the exact haversine test.
/// A circle reaching a pole spans every longitude. A circle crossing ±180°
/// yields a second box wrapped onto the far side of the antimeridian.
fn search_envelopes(query: &PlaceQuery) -> Vec<AABB<[f64; 2]>> {
    let centre = query.center;
    // Pad slightly so points on the circle are never lost to rounding.
    let angular_deg = (query.radius_m.max(0.0) / EARTH_RADIUS_M).to_degrees() * 1.01 + 1e-9;
    let min_lat = (centre.y - angular_deg).max(-90.0);
    let max_lat = (centre.y + angular_deg).min(90.0);
    let cos_lat = centre.y.to_radians().cos();
    let lng_delta = if cos_lat <= angular_deg.to_radians().sin() {
        180.0
    } else {
        angular_deg / cos_lat
    };
    if lng_delta >= 180.0 {
        return vec![AABB::from_corners([-180.0, min_lat], [180.0, max_lat])];
    }

    let west = centre.x - lng_delta;
    let east = centre.x + lng_delta;
    let mut envelopes = vec![AABB::from_corners([west, min_lat], [east, max_lat])];
    if west < -180.0 {
        envelopes.push(AABB::from_corners([west + 360.0, min_lat], [180.0, max_lat]));
    }
    if east > 180.0 {
        envelopes.push(AABB::from_corners([-180.0, min_lat], [east - 360.0, max_lat]));
    }
    envelopes
}

fn load_index_entries(connection: &Connection) -> Result<Vec<IndexedPlace>, SqlitePlaceStoreError> {
    let mut statement = connection.prepare("SELECT id, lon, lat FROM places")?;
    let mut rows = statement.query([])?;
    let mut entries = Vec::new();

    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        let lon: f64 = row.get(1)?;
        let lat: f64 = row.get(2)?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(SqlitePlaceStoreError::InvalidCoordinates { id });
        }
        entries.push(GeomWithData::new([lon, lat], id));
    }

    Ok(entries)
}

fn load_places_chunk(
    connection: &Connection,
    ids: &[String],
) -> Result<Vec<Place>, SqlitePlaceStoreError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, document FROM places WHERE id IN ({placeholders})");
    let mut statement = connection.prepare(&sql)?;
    let mut rows = statement.query(params_from_iter(ids.iter()))?;
    let mut places = Vec::with_capacity(ids.len());

    while let Some(row) = rows.next()? {
        let id: String = row.get(0)?;
        let document: String = row.get(1)?;
        let place: Place = serde_json::from_str(&document)
            .map_err(|source| SqlitePlaceStoreError::InvalidDocument { id, source })?;
        places.push(place.normalised());
    }

    Ok(places)
}

/// Persist `places` to the SQLite database at `path`.
///
/// The `places` table is created when missing. Rows are upserted by id inside
/// a single transaction, so either every place is written or none is.
///
/// # Errors
/// Returns [`WritePlacesError`] when encoding or the SQLite write fails.
pub fn write_places(path: &Path, places: &[Place]) -> Result<(), WritePlacesError> {
    let mut connection = Connection::open(path)?;
    connection.execute(CREATE_TABLE, [])?;
    let transaction = connection.transaction()?;
    {
        let mut statement = transaction.prepare(
            "INSERT OR REPLACE INTO places (id, lon, lat, document) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for place in places {
            let document =
                serde_json::to_string(place).map_err(|source| WritePlacesError::Encode {
                    id: place.id.clone(),
                    source,
                })?;
            statement.execute(params![
                place.id,
                place.location.x,
                place.location.y,
                document
            ])?;
        }
    }
    transaction.commit()?;
    debug!("wrote {} places to {}", places.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstar::Envelope;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const CENTRE: Coord<f64> = Coord {
        x: 121.5395,
        y: 25.0170,
    };

    fn place(id: &str, lat: f64, lng: f64) -> Place {
        Place::new(id, id, Coord { x: lng, y: lat })
    }

    #[fixture]
    fn temp_db() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("places.db");
        (dir, path)
    }

    #[fixture]
    fn sample_places() -> Vec<Place> {
        vec![
            place("centre", 25.0170, 121.5395).with_rating(4.6),
            place("near", 25.0200, 121.5400).with_rating(3.9),
            place("far", 25.1000, 121.6000),
        ]
    }

    #[rstest]
    fn returns_places_within_radius_nearest_first(
        temp_db: (TempDir, PathBuf),
        sample_places: Vec<Place>,
    ) {
        let (_dir, path) = temp_db;
        write_places(&path, &sample_places).expect("persist places");
        let store = SqlitePlaceStore::open(&path).expect("open store");
        assert_eq!(store.len(), 3);

        let found = store
            .find_places(&PlaceQuery::within(CENTRE, 1000.0))
            .expect("query store");
        let ids: Vec<_> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["centre", "near"]);
    }

    #[rstest]
    fn applies_attribute_filters(temp_db: (TempDir, PathBuf), sample_places: Vec<Place>) {
        let (_dir, path) = temp_db;
        write_places(&path, &sample_places).expect("persist places");
        let store = SqlitePlaceStore::open(&path).expect("open store");

        let found = store
            .find_places(&PlaceQuery::within(CENTRE, 1000.0).with_rating_min(4.5))
            .expect("query store");
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|p| p.id.as_str()), Some("centre"));
    }

    #[rstest]
    fn normalises_loaded_documents(temp_db: (TempDir, PathBuf)) {
        let (_dir, path) = temp_db;
        let noisy = place("noisy", 25.0170, 121.5395)
            .with_rating(9.0)
            .with_price_level(7);
        write_places(&path, &[noisy]).expect("persist places");
        let store = SqlitePlaceStore::open(&path).expect("open store");

        let found = store
            .find_places(&PlaceQuery::within(CENTRE, 10.0))
            .expect("query store");
        let loaded = found.first().expect("one place");
        assert_eq!(loaded.rating, 5.0);
        assert_eq!(loaded.price_level, 4);
    }

    #[rstest]
    fn rewriting_replaces_existing_rows(temp_db: (TempDir, PathBuf)) {
        let (_dir, path) = temp_db;
        write_places(&path, &[place("p1", 25.0170, 121.5395)]).expect("first write");
        write_places(&path, &[place("p1", 25.0170, 121.5395).with_rating(4.0)])
            .expect("second write");
        let store = SqlitePlaceStore::open(&path).expect("open store");
        assert_eq!(store.len(), 1);
        let found = store
            .find_places(&PlaceQuery::within(CENTRE, 10.0))
            .expect("query store");
        assert_eq!(found.first().map(|p| p.rating), Some(4.0));
    }

    #[rstest]
    fn empty_area_returns_no_places(temp_db: (TempDir, PathBuf), sample_places: Vec<Place>) {
        let (_dir, path) = temp_db;
        write_places(&path, &sample_places).expect("persist places");
        let store = SqlitePlaceStore::open(&path).expect("open store");
        let found = store
            .find_places(&PlaceQuery::within(Coord { x: 0.0, y: 0.0 }, 1000.0))
            .expect("query store");
        assert!(found.is_empty());
    }

    #[rstest]
    fn open_fails_without_places_table(temp_db: (TempDir, PathBuf)) {
        let (_dir, path) = temp_db;
        Connection::open(&path)
            .and_then(|c| c.execute("CREATE TABLE other (id INTEGER)", []))
            .expect("create unrelated table");
        let error = SqlitePlaceStore::open(&path).expect_err("missing table should fail");
        assert!(matches!(error, SqlitePlaceStoreError::Database(_)));
    }

    #[rstest]
    fn open_fails_for_missing_file(temp_db: (TempDir, PathBuf)) {
        let (_dir, path) = temp_db;
        let error = SqlitePlaceStore::open(&path).expect_err("missing file should fail");
        assert!(matches!(error, SqlitePlaceStoreError::OpenDatabase { .. }));
    }

    #[rstest]
    fn invalid_documents_surface_as_backend_errors(temp_db: (TempDir, PathBuf)) {
        let (_dir, path) = temp_db;
        let connection = Connection::open(&path).expect("create SQLite database");
        connection.execute(CREATE_TABLE, []).expect("create table");
        connection
            .execute(
                "INSERT INTO places (id, lon, lat, document) VALUES ('bad', 121.5395, 25.0170, 'not-json')",
                [],
            )
            .expect("insert row");
        drop(connection);

        let store = SqlitePlaceStore::open(&path).expect("open store");
        let error = store
            .find_places(&PlaceQuery::within(CENTRE, 100.0))
            .expect_err("invalid document should fail");
        assert!(matches!(error, PlaceStoreError::Backend(_)));
    }

    #[rstest]
    #[case(0.0)]
    #[case(60.0)]
    #[case(-89.99)]
    fn envelope_contains_circle_edge(#[case] lat: f64) {
        let centre = Coord { x: 10.0, y: lat };
        let query = PlaceQuery::within(centre, 5000.0);
        let north = [centre.x, (lat + (5000.0 / EARTH_RADIUS_M).to_degrees()).min(90.0)];
        assert!(
            search_envelopes(&query)
                .iter()
                .any(|envelope| envelope.contains_point(&north))
        );
    }

    #[rstest]
    #[case::east_of_antimeridian(0.0, 179.99, 0.0, -179.99)]
    #[case::west_of_antimeridian(0.0, -179.99, 0.0, 179.99)]
    #[case::across_north_pole(89.99, 10.0, 89.99, -175.0)]
    #[case::across_south_pole(-89.99, -170.0, -89.99, 5.0)]
    fn finds_places_across_antimeridian_and_poles(
        temp_db: (TempDir, PathBuf),
        #[case] centre_lat: f64,
        #[case] centre_lng: f64,
        #[case] place_lat: f64,
        #[case] place_lng: f64,
    ) {
        let (_dir, path) = temp_db;
        let far_side = place("far-side", place_lat, place_lng);
        let centre = Coord {
            x: centre_lng,
            y: centre_lat,
        };
        assert!(crate::distance_between(centre, far_side.location) < 5000.0);
        write_places(&path, std::slice::from_ref(&far_side)).expect("persist places");
        let store = SqlitePlaceStore::open(&path).expect("open store");
        let memory = crate::test_support::MemoryStore::with_places([far_side]);

        let query = PlaceQuery::within(centre, 5000.0);
        let found = store.find_places(&query).expect("query store");
        let expected = memory.find_places(&query).expect("query memory store");
        assert_eq!(found.len(), 1);
        assert_eq!(found, expected);
    }

    #[rstest]
    fn polar_envelope_spans_every_longitude() {
        let query = PlaceQuery::within(Coord { x: 10.0, y: 89.99 }, 5000.0);
        let envelopes = search_envelopes(&query);
        assert_eq!(envelopes.len(), 1);
        let envelope = envelopes.first().expect("one envelope");
        assert!(envelope.contains_point(&[-179.5, 89.99]));
        assert!(envelope.contains_point(&[179.5, 89.99]));
    }
}
