//! Point-in-wedge membership test.
//!
//! This is the gate that decides which AI-suggested coordinates are
//! trusted enough to materialize as derived pins: a candidate must lie
//! within the query radius AND within the directional wedge's bearing
//! range. Rejected candidates are discarded, not errors.

use waypoint_geo_models::{Coordinate, Direction};

use crate::sphere::{bearing_deg, distance_km};

/// Returns true iff `point` lies inside the wedge of the given
/// direction, radius, and sweep centred on `center`.
///
/// [`Direction::Overview`] has no wedge and always matches. The bearing
/// range wraps modulo 360 where the wedge crosses north (the North
/// wedge spans 315° → 45°).
#[must_use]
pub fn is_inside(
    point: Coordinate,
    center: Coordinate,
    radius_km: f64,
    direction: Direction,
    sweep_deg: f64,
) -> bool {
    let Some(center_bearing) = direction.bearing_deg() else {
        return true;
    };

    if distance_km(center, point) > radius_km {
        return false;
    }

    let bearing = bearing_deg(center, point);
    let lower = (center_bearing - sweep_deg / 2.0).rem_euclid(360.0);
    let upper = (center_bearing + sweep_deg / 2.0).rem_euclid(360.0);

    if lower <= upper {
        (lower..=upper).contains(&bearing)
    } else {
        bearing >= lower || bearing <= upper
    }
}
