//! Opening the place store for a command invocation.

use camino::Utf8Path;
use nearby_core::PlaceStore;

use crate::CliError;

/// Opens the place store backing a command.
pub(crate) trait StoreOpener {
    fn open(&self, database: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError>;
}

/// Opens the SQLite database written by `nearby import`.
pub(crate) struct SqliteStoreOpener;

impl StoreOpener for SqliteStoreOpener {
    #[cfg(feature = "store-sqlite")]
    fn open(&self, database: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError> {
        let store = nearby_core::SqlitePlaceStore::open(database.as_std_path()).map_err(
            |source| CliError::OpenStore {
                path: database.to_path_buf(),
                source,
            },
        )?;
        log::debug!("opened place database {database} with {} places", store.len());
        Ok(Box::new(store))
    }

    #[cfg(not(feature = "store-sqlite"))]
    fn open(&self, _database: &Utf8Path) -> Result<Box<dyn PlaceStore>, CliError> {
        Err(CliError::MissingFeature {
            feature: "store-sqlite",
            action: "opening the place database",
        })
    }
}
