//! Error types emitted by the Nearby CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
#[cfg(feature = "store-sqlite")]
use nearby_core::{SqlitePlaceStoreError, WritePlacesError};
use nearby_ranking::RankingError;
use nearby_scorer::ScoringConfigError;
use thiserror::Error;

/// Errors emitted by the Nearby CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// Opening the place database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open place database {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: SqlitePlaceStoreError,
    },
    /// An input file could not be read.
    #[error("failed to read {field} at {path:?}: {source}")]
    ReadInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The roulette body was not valid JSON.
    #[error("failed to parse roulette body: {0}")]
    ParseRouletteBody(#[source] serde_json::Error),
    /// The import file was not a JSON array of places.
    #[error("failed to parse places from {path:?}: {source}")]
    ParsePlaces {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Configured score weights or context rules were rejected.
    #[error("invalid scoring configuration: {0}")]
    Scoring(#[from] ScoringConfigError),
    /// Ranking or selection failed.
    #[error(transparent)]
    Ranking(#[from] RankingError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Persisting imported places failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to write places to {path:?}: {source}")]
    WritePlaces {
        path: Utf8PathBuf,
        #[source]
        source: WritePlacesError,
    },
}
