//! Unit tests for rank configuration and output.

use super::helpers::{FailingStoreOpener, StubStoreOpener, sample_places, stdout_text};
use super::*;
use crate::rank::{RankArgs, RankConfig, run_rank_with};
use camino::Utf8PathBuf;
use nearby_ranking::{Candidate, RankingError};
use nearby_scorer::{ScoreWeights, ScoringConfigError};
use rstest::{fixture, rstest};

#[fixture]
fn opener() -> StubStoreOpener {
    StubStoreOpener::new(sample_places())
}

fn rank_args(query: &str) -> RankArgs {
    RankArgs {
        query: Some(query.to_owned()),
        ..RankArgs::default()
    }
}

fn run_and_decode(args: RankArgs, opener: &StubStoreOpener) -> Vec<Candidate> {
    let mut buffer = Vec::new();
    run_rank_with(args, opener, &mut buffer).expect("rank should succeed");
    serde_json::from_str(&stdout_text(&buffer)).expect("output should be a JSON array")
}

#[rstest]
fn rank_config_falls_back_to_defaults() {
    let config = RankConfig::from(RankArgs::default());
    assert_eq!(config.query, "");
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.weights, ScoreWeights::default());
}

#[rstest]
fn rank_config_applies_weight_overrides() {
    let args = RankArgs {
        weight_rating: Some(0.6),
        weight_context: Some(0.0),
        ..RankArgs::default()
    };
    let config = RankConfig::from(args);
    let defaults = ScoreWeights::default();
    assert_eq!(config.weights.rating, 0.6);
    assert_eq!(config.weights.context, 0.0);
    assert_eq!(config.weights.distance, defaults.distance);
}

#[rstest]
fn rank_prints_candidates_best_first(opener: StubStoreOpener) {
    let ranked = run_and_decode(rank_args("lat=25.0170&lng=121.5395"), &opener);
    assert_eq!(ranked.len(), 3);
    assert!(
        ranked
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.score >= b.score))
    );
}

#[rstest]
fn rank_open_now_keeps_only_open_places(opener: StubStoreOpener) {
    let ranked = run_and_decode(rank_args("lat=25.0170&lng=121.5395&open_now=true"), &opener);
    let ids: Vec<&str> = ranked.iter().map(|c| c.place.id.as_str()).collect();
    assert_eq!(ids, vec!["always-open"]);
}

#[rstest]
fn rank_with_no_matches_prints_empty_array(opener: StubStoreOpener) {
    let ranked = run_and_decode(rank_args("lat=25.0170&lng=121.5395&categories=sushi"), &opener);
    assert!(ranked.is_empty());
}

#[rstest]
fn rank_rejects_invalid_weights(opener: StubStoreOpener) {
    let args = RankArgs {
        weight_open: Some(-1.0),
        ..RankArgs::default()
    };
    let mut buffer = Vec::new();
    let err = run_rank_with(args, &opener, &mut buffer).expect_err("negative weight");
    match err {
        CliError::Scoring(ScoringConfigError::InvalidWeights) => {}
        other => panic!("expected Scoring, found {other:?}"),
    }
    assert!(buffer.is_empty());
}

#[rstest]
fn rank_reports_store_failure_as_internal() {
    let mut buffer = Vec::new();
    let err = run_rank_with(rank_args(""), &FailingStoreOpener, &mut buffer)
        .expect_err("failing store");
    match err {
        CliError::Ranking(RankingError::Internal { .. }) => {}
        other => panic!("expected Ranking(Internal), found {other:?}"),
    }
}
