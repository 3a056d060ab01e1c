#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pin, connection, and suggestion cache-key types.
//!
//! A pin is a dropped marker with its per-query suggestion cache; a
//! connection is the drawn curve linking two pins. Cache keys are
//! structured composites rather than concatenated strings so that
//! delimiter characters inside filter names can never collide two
//! distinct queries onto the same slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use waypoint_geo_models::{Coordinate, Direction};

/// Opaque unique pin identifier (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    /// Generates a fresh unique id.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for PinId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque unique connection identifier (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generates a fresh unique id.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a pin came to exist.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PinOrigin {
    /// Dropped directly by the user on the map.
    UserPlaced,
    /// Materialized from an accepted AI suggestion.
    AiDerived,
}

/// A marker on the map with its per-query suggestion cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    /// Unique identifier.
    pub id: PinId,
    /// Position on the map.
    pub coordinate: Coordinate,
    /// How this pin came to exist.
    pub origin: PinOrigin,
    /// Optional short label (e.g. the resolved place name).
    pub label: Option<String>,
    /// Optional longer description.
    pub description: Option<String>,
    /// Sidebar filter tags active when this pin was created.
    pub filter_tags: Vec<String>,
    /// Cached suggestion content, keyed by query shape. Session-scoped
    /// only, so it is skipped when pins cross a serialization boundary.
    #[serde(skip)]
    pub suggestion_cache: BTreeMap<CacheKey, String>,
    /// Last radius used per direction, for restoring the radius control.
    pub last_radius_by_direction: BTreeMap<Direction, f64>,
    /// The direction most recently explored from this pin.
    pub last_explored_direction: Option<Direction>,
}

impl Pin {
    /// Creates a user-placed pin at the given coordinate.
    #[must_use]
    pub fn user_placed(coordinate: Coordinate) -> Self {
        Self::with_origin(coordinate, PinOrigin::UserPlaced)
    }

    /// Creates an AI-derived pin at the given coordinate.
    #[must_use]
    pub fn ai_derived(coordinate: Coordinate) -> Self {
        Self::with_origin(coordinate, PinOrigin::AiDerived)
    }

    fn with_origin(coordinate: Coordinate, origin: PinOrigin) -> Self {
        Self {
            id: PinId::new(),
            coordinate,
            origin,
            label: None,
            description: None,
            filter_tags: Vec::new(),
            suggestion_cache: BTreeMap::new(),
            last_radius_by_direction: BTreeMap::new(),
            last_explored_direction: None,
        }
    }

    /// Sets the label, builder-style.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A drawn curve linking two pins.
///
/// Destroyed when either endpoint pin is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Unique identifier.
    pub id: ConnectionId,
    /// Source pin.
    pub from_pin: PinId,
    /// Target pin.
    pub to_pin: PinId,
    /// The bowed polyline rendered between the two pins.
    pub curve: Vec<Coordinate>,
}

impl Connection {
    /// Returns true if this connection touches the given pin.
    #[must_use]
    pub fn touches(&self, pin: &PinId) -> bool {
        self.from_pin == *pin || self.to_pin == *pin
    }
}

/// Structured cache key for a pin's suggestion cache.
///
/// Two queries share a slot iff they agree on direction, radius bucket,
/// and the full (sorted, deduplicated) filter set. The radius is
/// bucketed to the nearest whole kilometre; Overview queries carry no
/// radius component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheKey {
    /// Query direction.
    pub direction: Direction,
    /// Radius rounded to whole kilometres, `None` for Overview.
    pub radius_bucket: Option<u32>,
    /// Sorted, deduplicated filter tags.
    pub filters: Vec<String>,
}

impl CacheKey {
    /// Builds a key from raw query parameters.
    ///
    /// Identical inputs always yield identical keys: filters are
    /// sorted and deduplicated, and the radius is bucketed so that
    /// float noise cannot split a slot.
    #[must_use]
    pub fn new(direction: Direction, radius_km: Option<f64>, filters: &[String]) -> Self {
        let mut filters: Vec<String> = filters.to_vec();
        filters.sort();
        filters.dedup();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let radius_bucket = match direction {
            Direction::Overview => None,
            _ => radius_km.map(|r| r.round().max(0.0) as u32),
        };

        Self {
            direction,
            radius_bucket,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_deterministic() {
        let a = CacheKey::new(
            Direction::East,
            Some(20.2),
            &["food".to_string(), "museums".to_string()],
        );
        let b = CacheKey::new(
            Direction::East,
            Some(19.8),
            &["museums".to_string(), "food".to_string(), "food".to_string()],
        );
        assert_eq!(a, b, "order, duplicates, and float noise must not split slots");
    }

    #[test]
    fn cache_key_distinguishes_radius_buckets() {
        let near = CacheKey::new(Direction::North, Some(10.0), &[]);
        let far = CacheKey::new(Direction::North, Some(50.0), &[]);
        assert_ne!(near, far);
    }

    #[test]
    fn cache_key_no_delimiter_collisions() {
        // Concatenation-based keys would collide these two.
        let a = CacheKey::new(Direction::West, Some(5.0), &["a,b".to_string()]);
        let b = CacheKey::new(
            Direction::West,
            Some(5.0),
            &["a".to_string(), "b".to_string()],
        );
        assert_ne!(a, b);
    }

    #[test]
    fn overview_ignores_radius() {
        let a = CacheKey::new(Direction::Overview, Some(10.0), &[]);
        let b = CacheKey::new(Direction::Overview, None, &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn connection_touches_either_endpoint() {
        let from = PinId::new();
        let to = PinId::new();
        let other = PinId::new();
        let conn = Connection {
            id: ConnectionId::new(),
            from_pin: from.clone(),
            to_pin: to.clone(),
            curve: Vec::new(),
        };
        assert!(conn.touches(&from));
        assert!(conn.touches(&to));
        assert!(!conn.touches(&other));
    }
}
