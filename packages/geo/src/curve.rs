//! Bowed connector polyline between two linked pins.
//!
//! Coordinates are treated as locally planar, which is an acceptable
//! approximation at the zoom levels where pins get connected. The
//! curve is a quadratic Bézier bowed away from the straight segment.

use waypoint_geo_models::Coordinate;

/// Number of interpolation steps along the curve.
pub const DEFAULT_CURVE_SAMPLES: usize = 50;

/// Fraction of the perpendicular offset applied to the control point.
pub const DEFAULT_BEND: f64 = 0.2;

/// Builds the connector polyline between `a` and `b`.
///
/// Emits `samples + 1` points along a quadratic Bézier whose control
/// point sits at the segment midpoint offset along the perpendicular.
/// The perpendicular's sign is normalized so its latitude component is
/// non-negative (longitude component breaks the tie for vertical
/// segments), which makes the result independent of argument order:
/// `curved_line(a, b)` and `curved_line(b, a)` are identical.
#[must_use]
pub fn curved_line(a: Coordinate, b: Coordinate, samples: usize, bend: f64) -> Vec<Coordinate> {
    let mid_lng = (a.lng + b.lng) / 2.0;
    let mid_lat = (a.lat + b.lat) / 2.0;

    let dx = b.lng - a.lng;
    let dy = b.lat - a.lat;

    let mut perp_x = -dy;
    let mut perp_y = dx;

    // Bow upward, never downward, regardless of segment orientation.
    if perp_y < 0.0 || (perp_y == 0.0 && perp_x < 0.0) {
        perp_x = -perp_x;
        perp_y = -perp_y;
    }

    let control_lng = mid_lng + perp_x * bend;
    let control_lat = mid_lat + perp_y * bend;

    // Order-independent endpoints: always interpolate from the
    // lexicographically smaller point.
    let (start, end) = if (a.lng, a.lat) <= (b.lng, b.lat) {
        (a, b)
    } else {
        (b, a)
    };

    let mut points = Vec::with_capacity(samples + 1);

    #[allow(clippy::cast_precision_loss)]
    for i in 0..=samples {
        let t = (i as f64) / (samples as f64);
        let u = 1.0 - t;
        let lng = u * u * start.lng + 2.0 * u * t * control_lng + t * t * end.lng;
        let lat = u * u * start.lat + 2.0 * u * t * control_lat + t * t * end.lat;
        points.push(Coordinate::new(lng, lat));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_samples_plus_one_points() {
        let pts = curved_line(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 1.0),
            DEFAULT_CURVE_SAMPLES,
            DEFAULT_BEND,
        );
        assert_eq!(pts.len(), DEFAULT_CURVE_SAMPLES + 1);
    }

    #[test]
    fn order_independent() {
        let a = Coordinate::new(-0.1276, 51.5074);
        let b = Coordinate::new(2.3522, 48.8566);
        assert_eq!(
            curved_line(a, b, 50, 0.2),
            curved_line(b, a, 50, 0.2),
            "connecting A->B and B->A must render identically"
        );
    }

    #[test]
    fn order_independent_vertical_segment() {
        let a = Coordinate::new(1.0, 0.0);
        let b = Coordinate::new(1.0, 2.0);
        assert_eq!(curved_line(a, b, 10, 0.2), curved_line(b, a, 10, 0.2));
    }

    #[test]
    fn bows_upward() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(2.0, 0.0);
        let pts = curved_line(a, b, 50, 0.2);
        let mid = pts[25];
        assert!(mid.lat > 0.0, "curve should bow toward positive latitude");
    }

    #[test]
    fn degenerate_segment_stays_put() {
        let a = Coordinate::new(3.0, 4.0);
        let pts = curved_line(a, a, 10, 0.2);
        for p in pts {
            assert!((p.lng - 3.0).abs() < 1e-12);
            assert!((p.lat - 4.0).abs() < 1e-12);
        }
    }
}
