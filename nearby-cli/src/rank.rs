//! Rank command implementation for the Nearby CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use nearby_core::RawFilterParams;
use nearby_ranking::RankingPipeline;
use nearby_scorer::ScoreWeights;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::write_json;
use crate::scoring::{WeightOverrides, build_scorer};
use crate::store::{SqliteStoreOpener, StoreOpener};
use crate::{
    ARG_DATABASE, ARG_QUERY, ARG_WEIGHT_CONTEXT, ARG_WEIGHT_DISTANCE, ARG_WEIGHT_OPEN,
    ARG_WEIGHT_POPULARITY, ARG_WEIGHT_RATING, CliError, DEFAULT_DATABASE,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the places around a location. Filters are given as \
                 an URL query string (lat, lng, radius, price_max, \
                 rating_min, categories, features, open_now); invalid or \
                 missing values fall back to defaults. Prints the ranked \
                 candidates as a JSON array.",
    about = "Rank nearby places by score"
)]
#[ortho_config(prefix = "NEARBY")]
pub(crate) struct RankArgs {
    /// URL query string, e.g. "lat=25.03&lng=121.56&categories=ramen".
    #[arg(long = ARG_QUERY, value_name = "query")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Path to the SQLite place database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Weight of the rating signal.
    #[arg(long = ARG_WEIGHT_RATING, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_rating: Option<f64>,
    /// Weight of the proximity signal.
    #[arg(long = ARG_WEIGHT_DISTANCE, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_distance: Option<f64>,
    /// Weight of the rating-count signal.
    #[arg(long = ARG_WEIGHT_POPULARITY, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_popularity: Option<f64>,
    /// Weight of the opening-state signal.
    #[arg(long = ARG_WEIGHT_OPEN, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_open: Option<f64>,
    /// Weight of the feature-context signal.
    #[arg(long = ARG_WEIGHT_CONTEXT, value_name = "weight")]
    #[serde(default)]
    pub(crate) weight_context: Option<f64>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RankConfig::from(merged))
    }

    const fn weight_overrides(&self) -> WeightOverrides {
        WeightOverrides {
            rating: self.weight_rating,
            distance: self.weight_distance,
            popularity: self.weight_popularity,
            open: self.weight_open,
            context: self.weight_context,
        }
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Raw URL query string; empty means "all defaults".
    pub(crate) query: String,
    /// Path to the SQLite place database.
    pub(crate) database: Utf8PathBuf,
    /// Score weights after applying overrides.
    pub(crate) weights: ScoreWeights,
}

impl From<RankArgs> for RankConfig {
    fn from(args: RankArgs) -> Self {
        let weights = args.weight_overrides().weights();
        Self {
            query: args.query.unwrap_or_default(),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            weights,
        }
    }
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rank_with(args, &SqliteStoreOpener, &mut stdout)
}

pub(crate) fn run_rank_with(
    args: RankArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let scorer = build_scorer(config.weights)?;
    let store = opener.open(&config.database)?;
    let pipeline = RankingPipeline::new(store, scorer);
    let raw = RawFilterParams::from_query_string(&config.query);
    let ranked = pipeline.run(&raw)?;
    info!("ranked {} places", ranked.len());
    write_json(writer, &ranked)
}
