//! Places returned by the store and ranked by the pipeline.

use std::collections::BTreeSet;

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::WeeklySchedule;

/// Lowest price band a place can carry.
pub const MIN_PRICE_LEVEL: u8 = 1;
/// Highest price band a place can carry.
pub const MAX_PRICE_LEVEL: u8 = 4;
/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Text carried in both Chinese and English.
///
/// Either side may be empty when the source only supplied one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Traditional Chinese text.
    #[serde(default)]
    pub zh: String,
    /// English text.
    #[serde(default)]
    pub en: String,
}

impl LocalizedText {
    /// Build text with both languages.
    pub fn new(zh: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            zh: zh.into(),
            en: en.into(),
        }
    }
}

/// A point of interest held by a [`PlaceStore`](crate::PlaceStore).
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. On the wire
/// the location is written as `{ "lat": …, "lng": … }`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nearby_core::Place;
///
/// let place = Place::new("p1", "Noodle Bar", Coord { x: 121.5395, y: 25.0170 })
///     .with_rating(4.5)
///     .with_features(["wifi"]);
/// assert!(place.features.contains("wifi"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Store identity.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: LocalizedText,
    /// Street address.
    #[serde(default)]
    pub address: LocalizedText,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Price band between [`MIN_PRICE_LEVEL`] and [`MAX_PRICE_LEVEL`].
    #[serde(default = "default_price_level")]
    pub price_level: u8,
    /// Average rating in `0.0..=5.0`.
    #[serde(default)]
    pub rating: f64,
    /// Number of ratings behind [`Place::rating`].
    #[serde(default)]
    pub rating_count: u64,
    /// Geospatial position.
    #[serde(with = "lat_lng")]
    pub location: Coord<f64>,
    /// Category labels such as `"ramen"`.
    #[serde(default)]
    pub categories: BTreeSet<String>,
    /// Amenity labels such as `"wifi"`.
    #[serde(default)]
    pub features: BTreeSet<String>,
    /// Weekly opening hours, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_hours: Option<WeeklySchedule>,
    /// Representative photo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Website of the venue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

const fn default_price_level() -> u8 {
    MIN_PRICE_LEVEL
}

impl Place {
    /// Construct a place with a Chinese name and otherwise empty attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id: id.into(),
            name: LocalizedText::new(name, String::new()),
            address: LocalizedText::default(),
            phone: None,
            price_level: MIN_PRICE_LEVEL,
            rating: 0.0,
            rating_count: 0,
            location,
            categories: BTreeSet::new(),
            features: BTreeSet::new(),
            open_hours: None,
            photo_url: None,
            website: None,
        }
    }

    /// Set the rating while returning `self` for chaining.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Set the rating count while returning `self` for chaining.
    #[must_use]
    pub fn with_rating_count(mut self, rating_count: u64) -> Self {
        self.rating_count = rating_count;
        self
    }

    /// Set the price band while returning `self` for chaining.
    #[must_use]
    pub fn with_price_level(mut self, price_level: u8) -> Self {
        self.price_level = price_level;
        self
    }

    /// Replace the categories while returning `self` for chaining.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the features while returning `self` for chaining.
    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a weekly schedule while returning `self` for chaining.
    #[must_use]
    pub fn with_open_hours(mut self, schedule: WeeklySchedule) -> Self {
        self.open_hours = Some(schedule);
        self
    }

    /// Bring numeric attributes into their documented ranges.
    ///
    /// Non-finite ratings become `0.0`; other ratings are clamped to
    /// `0.0..=5.0`. Price levels are clamped to `1..=4`. Stores apply this when
    /// loading documents so scorers only see normalised input.
    #[must_use]
    pub fn normalised(mut self) -> Self {
        self.rating = if self.rating.is_finite() {
            self.rating.clamp(0.0, MAX_RATING)
        } else {
            0.0
        };
        self.price_level = self.price_level.clamp(MIN_PRICE_LEVEL, MAX_PRICE_LEVEL);
        self
    }
}

mod lat_lng {
    use geo::Coord;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct LatLng {
        lat: f64,
        lng: f64,
    }

    pub(super) fn serialize<S>(coord: &Coord<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        LatLng {
            lat: coord.y,
            lng: coord.x,
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Coord<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let LatLng { lat, lng } = LatLng::deserialize(deserializer)?;
        Ok(Coord { x: lng, y: lat })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn location_is_written_as_lat_lng() {
        let place = Place::new("p1", "Cafe", Coord { x: 121.5, y: 25.0 });
        let json = serde_json::to_value(&place).expect("serialise place");
        assert_eq!(json["location"]["lat"], 25.0);
        assert_eq!(json["location"]["lng"], 121.5);
        assert!(json.get("open_hours").is_none());
    }

    #[rstest]
    fn missing_numeric_fields_default_to_zero() {
        let json = r#"{
            "id": "p9",
            "name": { "zh": "小吃", "en": "Snacks" },
            "location": { "lat": 25.0, "lng": 121.5 }
        }"#;
        let place: Place = serde_json::from_str(json).expect("parse place");
        assert_eq!(place.rating, 0.0);
        assert_eq!(place.rating_count, 0);
        assert_eq!(place.price_level, MIN_PRICE_LEVEL);
        assert_eq!(place.name.en, "Snacks");
        assert_eq!(place.location, Coord { x: 121.5, y: 25.0 });
    }

    #[rstest]
    #[case(7.5, 5.0)]
    #[case(-1.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(3.5, 3.5)]
    fn normalised_clamps_rating(#[case] raw: f64, #[case] expected: f64) {
        let place = Place::new("p1", "Cafe", Coord { x: 0.0, y: 0.0 })
            .with_rating(raw)
            .normalised();
        assert_eq!(place.rating, expected);
    }

    #[rstest]
    #[case(0, MIN_PRICE_LEVEL)]
    #[case(9, MAX_PRICE_LEVEL)]
    #[case(2, 2)]
    fn normalised_clamps_price_level(#[case] raw: u8, #[case] expected: u8) {
        let place = Place::new("p1", "Cafe", Coord { x: 0.0, y: 0.0 })
            .with_price_level(raw)
            .normalised();
        assert_eq!(place.price_level, expected);
    }
}
