//! Filter normalisation and the place store query.
//!
//! Caller input arrives as loosely typed [`RawFilterParams`], either from an
//! URL query string or a JSON body. [`GeoQueryBuilder`] turns it into
//! [`FilterParams`] without ever rejecting the request: each invalid field is
//! replaced by its default or dropped. [`FilterParams::to_query`] then yields
//! the [`PlaceQuery`] understood by every [`PlaceStore`](crate::PlaceStore).

use std::collections::BTreeSet;

use geo::Coord;
use log::{debug, warn};
use serde_json::Value;
use url::form_urlencoded;

use crate::{MAX_PRICE_LEVEL, MAX_RATING, MIN_PRICE_LEVEL, Place, distance_between};

/// Latitude used when the caller's latitude is missing or invalid.
pub const DEFAULT_LAT: f64 = 25.0170;
/// Longitude used when the caller's longitude is missing or invalid.
pub const DEFAULT_LNG: f64 = 121.5395;
/// Search radius in metres used when the caller's radius is invalid.
pub const DEFAULT_RADIUS_M: u32 = 2000;
/// Largest accepted search radius in metres.
pub const MAX_RADIUS_M: u32 = 50_000;
/// Longest accepted category or feature term, in characters.
pub const MAX_FILTER_TERM_LEN: usize = 50;

/// Unvalidated filter input exactly as supplied by the caller.
///
/// Scalars are kept as text so numbers, strings and booleans from different
/// transports normalise the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilterParams {
    /// Centre latitude in degrees.
    pub lat: Option<String>,
    /// Centre longitude in degrees.
    pub lng: Option<String>,
    /// Search radius in metres.
    pub radius: Option<String>,
    /// Highest acceptable price band.
    pub price_max: Option<String>,
    /// Lowest acceptable rating.
    pub rating_min: Option<String>,
    /// Requested categories; any match qualifies.
    pub categories: Vec<String>,
    /// Requested features; any match qualifies.
    pub features: Vec<String>,
    /// Whether only currently open places are wanted.
    pub open_now: Option<String>,
}

impl RawFilterParams {
    /// Parse an URL query string such as `lat=25.03&lng=121.56&categories=ramen,cafe`.
    ///
    /// List fields accept repeated keys, `key[]` keys and comma-separated
    /// values. Unknown keys are ignored. A leading `?` is tolerated.
    ///
    /// # Examples
    /// ```
    /// use nearby_core::RawFilterParams;
    ///
    /// let raw = RawFilterParams::from_query_string("?lat=25.03&features=wifi&features=vegetarian");
    /// assert_eq!(raw.lat.as_deref(), Some("25.03"));
    /// assert_eq!(raw.features, vec!["wifi", "vegetarian"]);
    /// ```
    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        let pairs = query.strip_prefix('?').unwrap_or(query);
        let mut raw = Self::default();
        for (key, value) in form_urlencoded::parse(pairs.as_bytes()) {
            let text = value.into_owned();
            match key.as_ref() {
                "lat" => raw.lat = Some(text),
                "lng" => raw.lng = Some(text),
                "radius" => raw.radius = Some(text),
                "price_max" => raw.price_max = Some(text),
                "rating_min" => raw.rating_min = Some(text),
                "open_now" => raw.open_now = Some(text),
                "categories" | "categories[]" => raw.categories.extend(split_terms(&text)),
                "features" | "features[]" => raw.features.extend(split_terms(&text)),
                _ => {}
            }
        }
        raw
    }

    /// Extract filters from a JSON request body.
    ///
    /// Scalars may be numbers, strings or booleans. Lists may be arrays or
    /// comma-separated strings. `null` counts as absent.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        let scalar = |name: &str| body.get(name).and_then(scalar_text);
        let list = |name: &str| body.get(name).map(list_terms).unwrap_or_default();
        Self {
            lat: scalar("lat"),
            lng: scalar("lng"),
            radius: scalar("radius"),
            price_max: scalar("price_max"),
            rating_min: scalar("rating_min"),
            categories: list("categories"),
            features: list("features"),
            open_now: scalar("open_now"),
        }
    }

    /// Report whether both centre coordinates were supplied.
    ///
    /// Blank values count as missing. Supplied but invalid values still count
    /// as present; [`GeoQueryBuilder`] replaces them.
    #[must_use]
    pub fn has_center(&self) -> bool {
        present(self.lat.as_deref()).is_some() && present(self.lng.as_deref()).is_some()
    }
}

fn split_terms(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn list_terms(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            })
            .collect(),
        Value::String(text) => split_terms(text).collect(),
        _ => Vec::new(),
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|text| !text.is_empty())
}

/// Validated filters for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Search centre (`x = longitude`, `y = latitude`).
    pub center: Coord<f64>,
    /// Search radius in metres, `1..=50_000`.
    pub radius_m: u32,
    /// Highest acceptable price band, if bounded.
    pub price_max: Option<u8>,
    /// Lowest acceptable rating, if bounded.
    pub rating_min: Option<f64>,
    /// Requested categories.
    pub categories: BTreeSet<String>,
    /// Requested features.
    pub features: BTreeSet<String>,
    /// Whether the ranked list keeps only places open today.
    pub open_now: bool,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            center: Coord {
                x: DEFAULT_LNG,
                y: DEFAULT_LAT,
            },
            radius_m: DEFAULT_RADIUS_M,
            price_max: None,
            rating_min: None,
            categories: BTreeSet::new(),
            features: BTreeSet::new(),
            open_now: false,
        }
    }
}

impl FilterParams {
    /// Build the store query for these filters, capped at
    /// [`PlaceQuery::MAX_RESULTS`] documents.
    #[must_use]
    pub fn to_query(&self) -> PlaceQuery {
        PlaceQuery {
            center: self.center,
            radius_m: f64::from(self.radius_m),
            price_max: self.price_max,
            rating_min: self.rating_min,
            categories: self.categories.clone(),
            features: self.features.clone(),
            limit: PlaceQuery::MAX_RESULTS,
        }
    }
}

/// Normalises [`RawFilterParams`] into [`FilterParams`].
///
/// | Field | Accepted | Otherwise |
/// |-------|----------|-----------|
/// | `lat` | finite, `-90..=90` | [`DEFAULT_LAT`] |
/// | `lng` | finite, `-180..=180` | [`DEFAULT_LNG`] |
/// | `radius` | whole number, `1..=50_000` | [`DEFAULT_RADIUS_M`] |
/// | `price_max` | whole number, `1..=4` | unbounded |
/// | `rating_min` | number, `0..=5` | unbounded |
/// | list terms | at most 50 characters | term dropped |
/// | `open_now` | `true`/`1`/`yes`/`on` | `false` |
///
/// # Examples
/// ```
/// use nearby_core::{DEFAULT_RADIUS_M, GeoQueryBuilder, RawFilterParams};
///
/// let raw = RawFilterParams::from_query_string("radius=100000&price_max=2");
/// let filters = GeoQueryBuilder::new().build(&raw);
/// assert_eq!(filters.radius_m, DEFAULT_RADIUS_M);
/// assert_eq!(filters.price_max, Some(2));
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct GeoQueryBuilder;

impl GeoQueryBuilder {
    /// Construct a builder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate and clamp every field of `raw`.
    #[must_use]
    pub fn build(&self, raw: &RawFilterParams) -> FilterParams {
        let lat = coordinate(raw.lat.as_deref(), "lat", 90.0, DEFAULT_LAT);
        let lng = coordinate(raw.lng.as_deref(), "lng", 180.0, DEFAULT_LNG);
        let filters = FilterParams {
            center: Coord { x: lng, y: lat },
            radius_m: radius(raw.radius.as_deref()),
            price_max: price_max(raw.price_max.as_deref()),
            rating_min: rating_min(raw.rating_min.as_deref()),
            categories: terms(&raw.categories, "categories"),
            features: terms(&raw.features, "features"),
            open_now: flag(raw.open_now.as_deref()),
        };
        debug!("built filters {filters:?}");
        filters
    }
}

fn coordinate(raw: Option<&str>, field: &'static str, limit: f64, fallback: f64) -> f64 {
    let Some(text) = present(raw) else {
        return fallback;
    };
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && (-limit..=limit).contains(&value) => value,
        _ => {
            warn!("ignoring invalid {field} {text:?}; using {fallback}");
            fallback
        }
    }
}

fn radius(raw: Option<&str>) -> u32 {
    let Some(text) = present(raw) else {
        return DEFAULT_RADIUS_M;
    };
    let accepted = whole_number(text)
        .and_then(|value| u32::try_from(value).ok())
        .filter(|value| (1..=MAX_RADIUS_M).contains(value));
    accepted.unwrap_or_else(|| {
        warn!("ignoring invalid radius {text:?}; using {DEFAULT_RADIUS_M}");
        DEFAULT_RADIUS_M
    })
}

fn price_max(raw: Option<&str>) -> Option<u8> {
    let text = present(raw)?;
    let accepted = whole_number(text)
        .and_then(|value| u8::try_from(value).ok())
        .filter(|value| (MIN_PRICE_LEVEL..=MAX_PRICE_LEVEL).contains(value));
    if accepted.is_none() {
        warn!("ignoring invalid price_max {text:?}");
    }
    accepted
}

fn rating_min(raw: Option<&str>) -> Option<f64> {
    let text = present(raw)?;
    let accepted = text
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && (0.0..=MAX_RATING).contains(value));
    if accepted.is_none() {
        warn!("ignoring invalid rating_min {text:?}");
    }
    accepted
}

/// Parse integers, also accepting integral decimals such as `"1500.0"`.
fn whole_number(text: &str) -> Option<i64> {
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    let value = text.parse::<f64>().ok()?;
    // Integral and far inside the i64 range, so the cast is exact.
    let representable = value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15;
    representable.then(|| value as i64)
}

fn terms(raw: &[String], field: &'static str) -> BTreeSet<String> {
    raw.iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .filter(|term| {
            let keep = term.chars().count() <= MAX_FILTER_TERM_LEN;
            if !keep {
                warn!("dropping {field} term longer than {MAX_FILTER_TERM_LEN} characters");
            }
            keep
        })
        .map(str::to_owned)
        .collect()
}

fn flag(raw: Option<&str>) -> bool {
    present(raw).is_some_and(|text| {
        ["true", "1", "yes", "on"]
            .iter()
            .any(|accepted| text.eq_ignore_ascii_case(accepted))
    })
}

/// Query handed to a [`PlaceStore`](crate::PlaceStore).
///
/// The spatial predicate is "haversine distance from `center` is at most
/// `radius_m`" with the boundary included. Attribute predicates only apply
/// when set: `price_level <= price_max`, `rating >= rating_min`, and at least
/// one shared category or feature when those sets are non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    /// Search centre (`x = longitude`, `y = latitude`).
    pub center: Coord<f64>,
    /// Search radius in metres.
    pub radius_m: f64,
    /// Highest acceptable price band.
    pub price_max: Option<u8>,
    /// Lowest acceptable rating.
    pub rating_min: Option<f64>,
    /// Categories of which a place must carry at least one.
    pub categories: BTreeSet<String>,
    /// Features of which a place must carry at least one.
    pub features: BTreeSet<String>,
    /// Most documents a store may return.
    pub limit: usize,
}

impl PlaceQuery {
    /// Upper bound on documents returned per store call.
    pub const MAX_RESULTS: usize = 100;

    /// Query every place within `radius_m` metres of `center`.
    #[must_use]
    pub fn within(center: Coord<f64>, radius_m: f64) -> Self {
        Self {
            center,
            radius_m,
            price_max: None,
            rating_min: None,
            categories: BTreeSet::new(),
            features: BTreeSet::new(),
            limit: Self::MAX_RESULTS,
        }
    }

    /// Bound the price band while returning `self` for chaining.
    #[must_use]
    pub fn with_price_max(mut self, price_max: u8) -> Self {
        self.price_max = Some(price_max);
        self
    }

    /// Bound the rating while returning `self` for chaining.
    #[must_use]
    pub fn with_rating_min(mut self, rating_min: f64) -> Self {
        self.rating_min = Some(rating_min);
        self
    }

    /// Require one of `categories` while returning `self` for chaining.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Require one of `features` while returning `self` for chaining.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Lower the result cap; values above [`Self::MAX_RESULTS`] are clamped.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(Self::MAX_RESULTS);
        self
    }

    /// Distance in metres from the query centre to `place`.
    #[must_use]
    pub fn distance_to(&self, place: &Place) -> f64 {
        distance_between(self.center, place.location)
    }

    /// Evaluate the attribute predicates against `place`.
    #[must_use]
    pub fn matches_attributes(&self, place: &Place) -> bool {
        let price_ok = self
            .price_max
            .is_none_or(|max| place.price_level <= max);
        let rating_ok = self.rating_min.is_none_or(|min| place.rating >= min);
        let categories_ok = self.categories.is_empty()
            || !self.categories.is_disjoint(&place.categories);
        let features_ok =
            self.features.is_empty() || !self.features.is_disjoint(&place.features);
        price_ok && rating_ok && categories_ok && features_ok
    }

    /// Apply the full query to an in-memory collection.
    ///
    /// Matches are ordered nearest-first (ties by id) and truncated to
    /// [`PlaceQuery::limit`]. Stores share this so every backend agrees on
    /// which documents survive the cap.
    pub fn select<'a, I>(&self, places: I) -> Vec<Place>
    where
        I: IntoIterator<Item = &'a Place>,
    {
        let mut matches: Vec<(f64, &Place)> = places
            .into_iter()
            .filter(|place| self.matches_attributes(place))
            .map(|place| (self.distance_to(place), place))
            .filter(|(distance, _)| *distance <= self.radius_m)
            .collect();
        matches.sort_by(|(lhs_distance, lhs), (rhs_distance, rhs)| {
            lhs_distance
                .total_cmp(rhs_distance)
                .then_with(|| lhs.id.cmp(&rhs.id))
        });
        matches.truncate(self.limit);
        matches.into_iter().map(|(_, place)| place.clone()).collect()
    }
}
