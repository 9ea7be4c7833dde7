//! Behavioural coverage for the weighted scorer.

use std::cell::{Cell, RefCell};

use geo::Coord;
use nearby_core::{Place, PlaceSignals, ScoreBreakdown, Scorer};
use nearby_scorer::WeightedScorer;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const TOLERANCE: f64 = 1e-9;

#[fixture]
fn place() -> RefCell<Option<Place>> {
    RefCell::new(None)
}

#[fixture]
fn signals() -> Cell<PlaceSignals> {
    Cell::new(PlaceSignals {
        distance_m: 0.0,
        is_open: None,
    })
}

#[fixture]
fn breakdown() -> Cell<ScoreBreakdown> {
    Cell::new(ScoreBreakdown::default())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[given("a place rated 5 with 10000 ratings offering vegetarian food and wifi")]
fn given_perfect_place(#[from(place)] place: &RefCell<Option<Place>>) {
    let perfect = Place::new("p1", "Green Cafe", Coord { x: 121.5395, y: 25.0170 })
        .with_rating(5.0)
        .with_rating_count(10_000)
        .with_features(["vegetarian", "wifi"]);
    place.replace(Some(perfect));
}

#[given("the place is open today at the search centre")]
fn given_open(#[from(signals)] signals: &Cell<PlaceSignals>) {
    signals.set(PlaceSignals {
        distance_m: 0.0,
        is_open: Some(true),
    });
}

#[given("the place has no published opening hours")]
fn given_unknown(#[from(signals)] signals: &Cell<PlaceSignals>) {
    signals.set(PlaceSignals {
        distance_m: 0.0,
        is_open: None,
    });
}

#[given("the place is closed today")]
fn given_closed(#[from(signals)] signals: &Cell<PlaceSignals>) {
    signals.set(PlaceSignals {
        distance_m: 0.0,
        is_open: Some(false),
    });
}

#[when("I score the place with the default weights")]
fn when_score(
    #[from(place)] place: &RefCell<Option<Place>>,
    #[from(signals)] signals: &Cell<PlaceSignals>,
    #[from(breakdown)] breakdown: &Cell<ScoreBreakdown>,
) {
    let borrowed = place.borrow();
    let target = borrowed.as_ref().expect("place should be configured");
    let scored = WeightedScorer::default().score(target, &signals.get());
    breakdown.set(scored.breakdown);
}

#[then("the rating contribution is 3.0")]
fn then_rating(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().rating, 3.0);
}

#[then("the distance contribution is 2.5")]
fn then_distance(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().distance, 2.5);
}

#[then("the popularity contribution is 2.0")]
fn then_popularity(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().popularity, 2.0);
}

#[then("the open contribution is 1.5")]
fn then_open_full(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().open, 1.5);
}

#[then("the open contribution is 0.75")]
fn then_open_unknown(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().open, 0.75);
}

#[then("the open contribution is 0.45")]
fn then_open_closed(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().open, 0.45);
}

#[then("the context contribution is 0.75")]
fn then_context(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().context, 0.75);
}

#[then("the breakdown total is 9.75")]
fn then_total(#[from(breakdown)] breakdown: &Cell<ScoreBreakdown>) {
    assert_close(breakdown.get().total, 9.75);
}

#[scenario(path = "tests/features/scoring.feature", index = 0)]
fn perfect_place(
    place: RefCell<Option<Place>>,
    signals: Cell<PlaceSignals>,
    breakdown: Cell<ScoreBreakdown>,
) {
    let _ = (place, signals, breakdown);
}

#[scenario(path = "tests/features/scoring.feature", index = 1)]
fn unknown_hours(
    place: RefCell<Option<Place>>,
    signals: Cell<PlaceSignals>,
    breakdown: Cell<ScoreBreakdown>,
) {
    let _ = (place, signals, breakdown);
}

#[scenario(path = "tests/features/scoring.feature", index = 2)]
fn closed_today(
    place: RefCell<Option<Place>>,
    signals: Cell<PlaceSignals>,
    breakdown: Cell<ScoreBreakdown>,
) {
    let _ = (place, signals, breakdown);
}
