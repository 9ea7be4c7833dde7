//! Great-circle distance between WGS84 coordinates.
//!
//! Inputs are not validated. Latitudes outside `[-90, 90]` or longitudes
//! outside `[-180, 180]` yield a defined but meaningless distance, so callers
//! normalise coordinates first (see [`GeoQueryBuilder`](crate::GeoQueryBuilder)).

use geo::Coord;

/// Mean Earth radius in metres used by [`haversine_distance`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Return the haversine distance in metres between two points given in
/// degrees.
///
/// The result is symmetric and zero for identical points.
///
/// # Examples
/// ```
/// use nearby_core::haversine_distance;
///
/// let metres = haversine_distance(25.0170, 121.5395, 25.0260, 121.5395);
/// assert!((metres - 1000.0).abs() < 50.0);
/// assert_eq!(haversine_distance(25.0, 121.0, 25.0, 121.0), 0.0);
/// ```
#[must_use]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    let half_chord = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push the chord fraction fractionally above one.
    let a = half_chord.clamp(0.0, 1.0);
    let angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * angle
}

/// Return the haversine distance in metres between two `geo` coordinates
/// (`x = longitude`, `y = latitude`).
#[must_use]
pub fn distance_between(from: Coord<f64>, to: Coord<f64>) -> f64 {
    haversine_distance(from.y, from.x, to.y, to.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(25.0170, 121.5395)]
    #[case(-89.9, 179.9)]
    fn identical_points_are_zero_apart(#[case] lat: f64, #[case] lng: f64) {
        assert_eq!(haversine_distance(lat, lng, lat, lng), 0.0);
    }

    #[rstest]
    fn one_kilometre_north_is_close_to_1000_metres() {
        let metres = haversine_distance(25.0170, 121.5395, 25.0260, 121.5395);
        assert!(
            (950.0..=1050.0).contains(&metres),
            "expected ~1000 m, got {metres}"
        );
    }

    #[rstest]
    fn distance_is_symmetric() {
        let there = haversine_distance(25.0330, 121.5654, 25.0478, 121.5170);
        let back = haversine_distance(25.0478, 121.5170, 25.0330, 121.5654);
        assert!((there - back).abs() < 1e-9);
    }

    #[rstest]
    fn antipodal_points_are_half_the_circumference_apart() {
        let metres = haversine_distance(0.0, 0.0, 0.0, 180.0);
        let expected = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((metres - expected).abs() < 1e-3);
    }

    #[rstest]
    fn coord_helper_uses_lon_lat_axis_order() {
        let from = Coord { x: 121.5395, y: 25.0170 };
        let to = Coord { x: 121.5395, y: 25.0260 };
        let expected = haversine_distance(25.0170, 121.5395, 25.0260, 121.5395);
        assert_eq!(distance_between(from, to), expected);
    }
}
