#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared geographic primitive types.
//!
//! This crate defines the canonical coordinate, direction, and pixel
//! types used across the entire waypoint system. Everything that talks
//! about a position on the map speaks in these types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS-84 position in degrees. Longitude first, matching the
/// `[lng, lat]` ordering used by `GeoJSON` and the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate without validation.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Validates that both components are finite.
    ///
    /// Called at the boundaries (pin creation, query activation) so the
    /// geometry layer stays total over well-formed input.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if either component is NaN or
    /// infinite.
    pub fn validate(self) -> Result<Self, InvalidCoordinateError> {
        if self.lng.is_finite() && self.lat.is_finite() {
            Ok(self)
        } else {
            Err(InvalidCoordinateError {
                lng: self.lng,
                lat: self.lat,
            })
        }
    }
}

/// Error returned when a coordinate contains a non-finite component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinateError {
    /// The offending longitude.
    pub lng: f64,
    /// The offending latitude.
    pub lat: f64,
}

impl std::fmt::Display for InvalidCoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid coordinate ({}, {}): components must be finite",
            self.lng, self.lat
        )
    }
}

impl std::error::Error for InvalidCoordinateError {}

/// A query direction from a pin.
///
/// `Overview` covers the full surroundings of a pin; the four cardinal
/// variants select a directional wedge. This is the single source of
/// truth for direction tokens — the short codes the map controls emit
/// (`"N"`, `"S"`, ...) parse into the same variants as the full words.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Direction {
    /// Full surroundings of the pin, no bearing restriction.
    #[strum(serialize = "Overview", serialize = "O")]
    Overview,
    /// Bearing 0°.
    #[strum(serialize = "North", serialize = "N")]
    North,
    /// Bearing 180°.
    #[strum(serialize = "South", serialize = "S")]
    South,
    /// Bearing 90°.
    #[strum(serialize = "East", serialize = "E")]
    East,
    /// Bearing 270°.
    #[strum(serialize = "West", serialize = "W")]
    West,
}

impl Direction {
    /// The compass bearing at the centre of this direction's wedge, or
    /// `None` for [`Self::Overview`], which has no bearing restriction.
    #[must_use]
    pub const fn bearing_deg(self) -> Option<f64> {
        match self {
            Self::Overview => None,
            Self::North => Some(0.0),
            Self::East => Some(90.0),
            Self::South => Some(180.0),
            Self::West => Some(270.0),
        }
    }

    /// Human-readable label for UI display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Overview,
            Self::North,
            Self::South,
            Self::East,
            Self::West,
        ]
    }
}

/// A screen-space position in pixels, as produced by the map surface's
/// projection of a [`Coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal offset from the map container's left edge.
    pub x: f64,
    /// Vertical offset from the map container's top edge.
    pub y: f64,
}
