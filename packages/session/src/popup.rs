//! Popup anchor projection.
//!
//! The map surface owns rendering and projection; the core only
//! consumes an injected "project a coordinate to pixels" capability.
//! Anchors are always recomputed synchronously from the latest known
//! viewport — never interpolated or predicted between updates.

use waypoint_geo_models::{Coordinate, PixelPoint};

/// The projection capability owned by the map surface.
///
/// `project` returns `None` when the surface is temporarily
/// unavailable (e.g. during teardown or before the first render);
/// the popup is suppressed rather than anchored at a guess.
pub trait MapSurface {
    /// Projects a geographic coordinate to container pixels.
    fn project(&self, coordinate: Coordinate) -> Option<PixelPoint>;
}

/// Keeps the popup's pixel anchor synchronized with the viewport.
#[derive(Debug, Default)]
pub struct PopupProjector {
    anchor: Option<PixelPoint>,
}

impl PopupProjector {
    /// Creates a projector with no anchor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the anchor for the given target.
    ///
    /// Call on every viewport change (pan/zoom) and whenever the
    /// active context's target changes. A `None` target (no active
    /// context) or an unavailable surface clears the anchor, which
    /// suppresses rendering.
    pub fn reproject(
        &mut self,
        target: Option<Coordinate>,
        surface: &dyn MapSurface,
    ) -> Option<PixelPoint> {
        self.anchor = target.and_then(|coordinate| surface.project(coordinate));
        self.anchor
    }

    /// The most recently computed anchor, if any.
    #[must_use]
    pub const fn anchor(&self) -> Option<PixelPoint> {
        self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed linear projection for tests: 10 px per degree, origin at
    /// the container's top-left.
    struct FixedSurface {
        available: bool,
    }

    impl MapSurface for FixedSurface {
        fn project(&self, coordinate: Coordinate) -> Option<PixelPoint> {
            self.available.then(|| PixelPoint {
                x: coordinate.lng * 10.0,
                y: -coordinate.lat * 10.0,
            })
        }
    }

    #[test]
    fn reprojects_target() {
        let mut projector = PopupProjector::new();
        let surface = FixedSurface { available: true };

        let anchor = projector
            .reproject(Some(Coordinate::new(2.0, 3.0)), &surface)
            .unwrap();
        assert!((anchor.x - 20.0).abs() < 1e-12);
        assert!((anchor.y - -30.0).abs() < 1e-12);
    }

    #[test]
    fn unavailable_surface_suppresses_anchor() {
        let mut projector = PopupProjector::new();
        let surface = FixedSurface { available: false };

        assert!(
            projector
                .reproject(Some(Coordinate::new(2.0, 3.0)), &surface)
                .is_none()
        );
        assert!(projector.anchor().is_none());
    }

    #[test]
    fn no_target_clears_anchor() {
        let mut projector = PopupProjector::new();
        let surface = FixedSurface { available: true };

        projector.reproject(Some(Coordinate::new(1.0, 1.0)), &surface);
        assert!(projector.anchor().is_some());

        projector.reproject(None, &surface);
        assert!(projector.anchor().is_none());
    }
}
