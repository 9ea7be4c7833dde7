//! Test helpers: stub store openers and place fixtures.

use super::*;
use crate::store::StoreOpener;
use camino::{Utf8Path, Utf8PathBuf};
use nearby_core::{
    Place, PlaceStore,
    test_support::{FailingStore, MemoryStore},
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Store opener handing out a fresh copy of an in-memory store.
pub(super) struct StubStoreOpener {
    store: MemoryStore,
}

impl StubStoreOpener {
    pub(super) fn new(places: Vec<Place>) -> Self {
        Self {
            store: MemoryStore::with_places(places),
        }
    }
}

impl StoreOpener for StubStoreOpener {
    fn open(&self, _database: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError> {
        Ok(Box::new(self.store.clone()))
    }
}

/// Store opener whose store rejects every query.
pub(super) struct FailingStoreOpener;

impl StoreOpener for FailingStoreOpener {
    fn open(&self, _database: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError> {
        Ok(Box::new(FailingStore::default()))
    }
}

const EVERY_DAY: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// JSON documents for three places around the default centre.
///
/// `always-open` lists every weekday, `never-open` has an empty schedule and
/// `no-hours` carries no schedule at all, so opening checks do not depend on
/// the day the tests run.
pub(super) fn sample_documents() -> serde_json::Value {
    let every_day: serde_json::Map<String, serde_json::Value> = EVERY_DAY
        .iter()
        .map(|day| ((*day).to_owned(), json!(["08:00-22:00"])))
        .collect();
    json!([
        {
            "id": "always-open",
            "name": { "zh": "", "en": "Always Open Noodles" },
            "rating": 4.8,
            "rating_count": 1200,
            "price_level": 2,
            "location": { "lat": 25.0172, "lng": 121.5397 },
            "categories": ["noodles"],
            "features": ["wifi"],
            "open_hours": every_day
        },
        {
            "id": "never-open",
            "name": { "zh": "", "en": "Closed Cafe" },
            "rating": 4.9,
            "rating_count": 50,
            "price_level": 1,
            "location": { "lat": 25.0180, "lng": 121.5400 },
            "categories": ["cafe"],
            "open_hours": {}
        },
        {
            "id": "no-hours",
            "name": { "zh": "", "en": "Mystery Bistro" },
            "rating": 3.5,
            "price_level": 3,
            "location": { "lat": 25.0200, "lng": 121.5420 },
            "categories": ["bistro"]
        }
    ])
}

pub(super) fn sample_places() -> Vec<Place> {
    serde_json::from_value(sample_documents()).expect("sample places decode")
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Temporary directory with UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn stdout_text(buffer: &[u8]) -> String {
    String::from_utf8(buffer.to_vec()).expect("stdout utf-8")
}
