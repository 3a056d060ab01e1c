#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spherical geometry for the waypoint map core.
//!
//! Provides the direct geodesic problem, great-circle distance, and
//! initial bearing on a spherical earth ([`sphere`]), directional
//! search-wedge polygons ([`arc`]), point-in-wedge membership tests
//! ([`membership`]), and the bowed connector polyline drawn between two
//! linked pins ([`curve`]).
//!
//! All functions are pure and total over validated coordinates;
//! validation happens at the system boundary, not here.

pub mod arc;
pub mod curve;
pub mod membership;
pub mod sphere;
