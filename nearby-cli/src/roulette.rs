//! Roulette command implementation for the Nearby CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use nearby_core::RawFilterParams;
use nearby_ranking::RouletteSelector;
use nearby_scorer::ScoreWeights;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fs::read_utf8_to_string;
use crate::output::write_json;
use crate::scoring::{WeightOverrides, build_scorer};
use crate::store::{SqliteStoreOpener, StoreOpener};
use crate::{
    ARG_BODY, ARG_BODY_FILE, ARG_DATABASE, ARG_SEED, ARG_WEIGHT_CONTEXT, ARG_WEIGHT_DISTANCE,
    ARG_WEIGHT_OPEN, ARG_WEIGHT_POPULARITY, ARG_WEIGHT_RATING, CliError, DEFAULT_DATABASE,
};

/// CLI arguments for the `roulette` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Pick one place at random among those matching a JSON \
                 filter body. lat and lng are required; other filters fall \
                 back to defaults. The open_now filter is not applied. \
                 Prints the chosen candidate as JSON.",
    about = "Pick a random nearby place"
)]
#[ortho_config(prefix = "NEARBY")]
pub(crate) struct RouletteArgs {
    /// Inline JSON filter body, e.g. '{"lat": 25.03, "lng": 121.56}'.
    #[arg(long = ARG_BODY, value_name = "json", conflicts_with = "body_file")]
    #[serde(default)]
    pub(crate) body: Option<String>,
    /// Path to a file holding the JSON filter body.
    #[arg(long = ARG_BODY_FILE, value_name = "path")]
    #[serde(default)]
    pub(crate) body_file: Option<Utf8PathBuf>,
    /// Path to the SQLite place database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Seed for a reproducible pick; entropy from the OS when absent.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
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

impl RouletteArgs {
    pub(crate) fn into_config(self) -> Result<RouletteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(RouletteConfig::from(merged))
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

/// Where the roulette filter body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BodySource {
    /// No body; every filter is absent.
    Empty,
    /// JSON given on the command line.
    Inline(String),
    /// JSON stored in a file.
    File(Utf8PathBuf),
}

impl BodySource {
    fn load(&self) -> Result<RawFilterParams, CliError> {
        match self {
            Self::Empty => Ok(RawFilterParams::default()),
            Self::Inline(text) => parse_body(text),
            Self::File(path) => parse_body(&read_body_file(path)?),
        }
    }
}

/// Resolved `roulette` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouletteConfig {
    /// Filter body source; an inline body wins over a file.
    pub(crate) body: BodySource,
    /// Path to the SQLite place database.
    pub(crate) database: Utf8PathBuf,
    /// Optional RNG seed.
    pub(crate) seed: Option<u64>,
    /// Score weights after applying overrides.
    pub(crate) weights: ScoreWeights,
}

impl From<RouletteArgs> for RouletteConfig {
    fn from(args: RouletteArgs) -> Self {
        let weights = args.weight_overrides().weights();
        let body = match (args.body, args.body_file) {
            (Some(text), _) => BodySource::Inline(text),
            (None, Some(path)) => BodySource::File(path),
            (None, None) => BodySource::Empty,
        };
        Self {
            body,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            seed: args.seed,
            weights,
        }
    }
}

fn read_body_file(path: &Utf8Path) -> Result<String, CliError> {
    read_utf8_to_string(path).map_err(|source| CliError::ReadInput {
        field: ARG_BODY_FILE,
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a JSON filter body into raw filters.
pub(crate) fn parse_body(text: &str) -> Result<RawFilterParams, CliError> {
    let value: Value = serde_json::from_str(text).map_err(CliError::ParseRouletteBody)?;
    Ok(RawFilterParams::from_json(&value))
}

pub(crate) fn run_roulette(args: RouletteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_roulette_with(args, &SqliteStoreOpener, &mut stdout)
}

pub(crate) fn run_roulette_with(
    args: RouletteArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let raw = config.body.load()?;
    let scorer = build_scorer(config.weights)?;
    let store = opener.open(&config.database)?;
    let selector = RouletteSelector::new(store, scorer);
    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let picked = selector.spin(&raw, &mut rng)?;
    info!("roulette picked place {}", picked.place.id);
    write_json(writer, &picked)
}
