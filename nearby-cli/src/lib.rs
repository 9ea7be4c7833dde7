//! Command-line interface for ranking and picking nearby places.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod import;
mod output;
mod rank;
mod roulette;
mod scoring;
mod store;

pub use error::CliError;

use import::{ImportArgs, run_import};
use rank::{RankArgs, run_rank};
use roulette::{RouletteArgs, run_roulette};

pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_QUERY: &str = "query";
pub(crate) const ARG_BODY: &str = "body";
pub(crate) const ARG_BODY_FILE: &str = "body-file";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_IMPORT_SOURCE: &str = "source";
pub(crate) const ARG_WEIGHT_RATING: &str = "weight-rating";
pub(crate) const ARG_WEIGHT_DISTANCE: &str = "weight-distance";
pub(crate) const ARG_WEIGHT_POPULARITY: &str = "weight-popularity";
pub(crate) const ARG_WEIGHT_OPEN: &str = "weight-open";
pub(crate) const ARG_WEIGHT_CONTEXT: &str = "weight-context";
pub(crate) const ENV_IMPORT_SOURCE: &str = "NEARBY_CMDS_IMPORT_SOURCE";

/// Database file used when none is configured.
pub(crate) const DEFAULT_DATABASE: &str = "places.db";

/// Run the Nearby CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
        Command::Roulette(args) => run_roulette(args),
        Command::Import(args) => run_import(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "nearby",
    about = "Rank, filter and randomly pick places around a location",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank places matching a URL query string by score.
    Rank(RankArgs),
    /// Pick one matching place at random.
    Roulette(RouletteArgs),
    /// Load a JSON array of places into the place database.
    Import(ImportArgs),
}

#[cfg(test)]
mod tests;
