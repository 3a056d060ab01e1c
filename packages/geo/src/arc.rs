//! Directional search-wedge and circle polygon builders.
//!
//! A wedge is the pie-slice region shown on the map when the user
//! probes a cardinal direction from a pin. The ring starts and ends at
//! the centre so it renders as a closed polygon.

use waypoint_geo_models::{Coordinate, Direction};

use crate::sphere::destination_point;

/// Total angle covered by a directional wedge, in degrees.
///
/// 90° gives quarter-circle wedges whose edges meet exactly between
/// the cardinal directions. Values between 60° and 120° are reasonable;
/// wider sweeps trade directional precision for recall.
pub const DEFAULT_SWEEP_DEG: f64 = 90.0;

/// Number of rim segments for a wedge ring.
pub const DEFAULT_ARC_SEGMENTS: usize = 20;

/// Number of rim segments for a full-circle ring.
pub const DEFAULT_CIRCLE_SEGMENTS: usize = 64;

/// Builds the closed ring for a directional wedge.
///
/// The ring is `[center, rim_0, ..., rim_segments, center]` — that is,
/// `segments + 3` points — with rim bearings linearly interpolated
/// across `[center_bearing - sweep/2, center_bearing + sweep/2]`.
///
/// [`Direction::Overview`] has no centre bearing, so it yields an empty
/// ring; callers treat that as "no region to display", not an error.
#[must_use]
pub fn arc_ring(
    center: Coordinate,
    radius_km: f64,
    direction: Direction,
    sweep_deg: f64,
    segments: usize,
) -> Vec<Coordinate> {
    let Some(center_bearing) = direction.bearing_deg() else {
        log::debug!("no wedge for direction {direction}");
        return Vec::new();
    };

    let start_bearing = center_bearing - sweep_deg / 2.0;

    let mut ring = Vec::with_capacity(segments + 3);
    ring.push(center);

    #[allow(clippy::cast_precision_loss)]
    for i in 0..=segments {
        let bearing = start_bearing + (i as f64) * sweep_deg / (segments as f64);
        ring.push(destination_point(center, radius_km, bearing));
    }

    ring.push(center);
    ring
}

/// Builds a closed full-circle ring, used for the Overview radius
/// display around a pin.
#[must_use]
pub fn circle_ring(center: Coordinate, radius_km: f64, segments: usize) -> Vec<Coordinate> {
    let mut ring = Vec::with_capacity(segments + 1);

    #[allow(clippy::cast_precision_loss)]
    for i in 0..=segments {
        let bearing = (i as f64) * 360.0 / (segments as f64);
        ring.push(destination_point(center, radius_km, bearing));
    }

    ring
}
