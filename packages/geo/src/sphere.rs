//! Direct geodesic problem, haversine distance, and initial bearing on
//! a spherical earth.
//!
//! The sphere approximation is accurate to well under 0.5% at the
//! radii this system works with (tens of kilometres), which is far
//! below the precision of the geocoded inputs.

use waypoint_geo_models::Coordinate;

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Solves the direct geodesic problem: the point reached by travelling
/// `distance_km` from `origin` along the given initial bearing.
///
/// Total for any finite `distance_km >= 0`; the bearing is taken
/// modulo 360. The result longitude is normalized to (-180, 180].
#[must_use]
pub fn destination_point(origin: Coordinate, distance_km: f64, bearing_deg: f64) -> Coordinate {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(normalize_lng(lng2.to_degrees()), lat2.to_degrees())
}

/// Haversine great-circle distance between two points, in kilometres.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Initial bearing from `a` to `b` in degrees, normalized to [0, 360).
#[must_use]
pub fn bearing_deg(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Normalizes a longitude in degrees to (-180, 180].
fn normalize_lng(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0);
    if wrapped == 0.0 { 180.0 } else { wrapped - 180.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: Coordinate = Coordinate::new(-0.1276, 51.5074);

    #[test]
    fn destination_round_trips_distance() {
        for bearing in [0.0, 37.0, 90.0, 180.0, 270.0, 359.0] {
            for dist in [0.5, 10.0, 100.0, 2000.0] {
                let dest = destination_point(LONDON, dist, bearing);
                let back = distance_km(LONDON, dest);
                assert!(
                    (back - dist).abs() < dist * 1e-9 + 1e-9,
                    "bearing {bearing} dist {dist}: got {back}"
                );
            }
        }
    }

    #[test]
    fn destination_round_trips_bearing() {
        for bearing in [0.0, 45.0, 123.4, 270.0] {
            let dest = destination_point(LONDON, 50.0, bearing);
            let observed = bearing_deg(LONDON, dest);
            assert!(
                (observed - bearing).abs() < 1e-6,
                "bearing {bearing}: got {observed}"
            );
        }
    }

    #[test]
    fn destination_zero_distance_is_identity() {
        let dest = destination_point(LONDON, 0.0, 42.0);
        assert!((dest.lng - LONDON.lng).abs() < 1e-12);
        assert!((dest.lat - LONDON.lat).abs() < 1e-12);
    }

    #[test]
    fn longitude_normalized_across_antimeridian() {
        let near_dateline = Coordinate::new(179.9, 0.0);
        let dest = destination_point(near_dateline, 50.0, 90.0);
        assert!(dest.lng > -180.0 && dest.lng <= 180.0);
        assert!(dest.lng < 0.0, "should wrap into the western hemisphere");
    }

    #[test]
    fn bearing_normalized_range() {
        let west = destination_point(LONDON, 10.0, 270.0);
        let b = bearing_deg(LONDON, west);
        assert!((0.0..360.0).contains(&b));
        assert!((b - 270.0).abs() < 1e-6);
    }

    #[test]
    fn distance_equator_degree() {
        // One degree of longitude at the equator is ~111.19 km on a
        // 6371 km sphere.
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.05, "got {d}");
    }
}
