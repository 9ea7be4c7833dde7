//! Import command implementation for the Nearby CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use nearby_core::Place;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fs::open_utf8_file;
use crate::{ARG_DATABASE, ARG_IMPORT_SOURCE, CliError, DEFAULT_DATABASE, ENV_IMPORT_SOURCE};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON array of place documents and write them into \
                 the SQLite place database, replacing rows with the same id.",
    about = "Import places into the place database"
)]
#[ortho_config(prefix = "NEARBY")]
pub(crate) struct ImportArgs {
    /// Path to a JSON file holding an array of places.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) source: Option<Utf8PathBuf>,
    /// Path to the SQLite place database to write.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    pub(crate) fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    /// JSON file of places.
    pub(crate) source: Utf8PathBuf,
    /// Destination database.
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_IMPORT_SOURCE,
            env: ENV_IMPORT_SOURCE,
        })?;
        Ok(Self {
            source,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
        })
    }
}

/// Loads a JSON array of places from disk, normalising each one.
pub(crate) fn load_places(path: &Utf8Path) -> Result<Vec<Place>, CliError> {
    let reader = open_utf8_file(path).map_err(|source| CliError::ReadInput {
        field: ARG_IMPORT_SOURCE,
        path: path.to_path_buf(),
        source,
    })?;
    let places: Vec<Place> =
        serde_json::from_reader(reader).map_err(|source| CliError::ParsePlaces {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(places.into_iter().map(Place::normalised).collect())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_import_with(args, &mut stdout)
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let places = load_places(&config.source)?;
    persist(&config.database, &places)?;
    info!("imported {} places into {}", places.len(), config.database);
    writeln!(
        writer,
        "imported {} places into {}",
        places.len(),
        config.database
    )
    .map_err(CliError::WriteOutput)
}

#[cfg(feature = "store-sqlite")]
fn persist(database: &Utf8Path, places: &[Place]) -> Result<(), CliError> {
    nearby_core::write_places(database.as_std_path(), places).map_err(|source| {
        CliError::WritePlaces {
            path: database.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(feature = "store-sqlite"))]
fn persist(_database: &Utf8Path, _places: &[Place]) -> Result<(), CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "importing places",
    })
}
