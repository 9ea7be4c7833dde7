//! Score weight overrides collected from the command line.

use nearby_scorer::{ScoreWeights, WeightedScorer};

use crate::CliError;

/// Per-signal weights supplied by the user; `None` keeps the default.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub(crate) struct WeightOverrides {
    pub(crate) rating: Option<f64>,
    pub(crate) distance: Option<f64>,
    pub(crate) popularity: Option<f64>,
    pub(crate) open: Option<f64>,
    pub(crate) context: Option<f64>,
}

impl WeightOverrides {
    pub(crate) fn weights(self) -> ScoreWeights {
        let defaults = ScoreWeights::default();
        ScoreWeights {
            rating: self.rating.unwrap_or(defaults.rating),
            distance: self.distance.unwrap_or(defaults.distance),
            popularity: self.popularity.unwrap_or(defaults.popularity),
            open: self.open.unwrap_or(defaults.open),
            context: self.context.unwrap_or(defaults.context),
        }
    }
}

/// Build the scorer for resolved `weights`.
pub(crate) fn build_scorer(weights: ScoreWeights) -> Result<WeightedScorer, CliError> {
    WeightedScorer::new(weights).map_err(CliError::Scoring)
}
