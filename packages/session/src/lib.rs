#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session coordination for the waypoint map core.
//!
//! [`planner::PlannerSession`] is the single logical actor that owns
//! the pin store, the connect state machine, the at-most-one active
//! query context, and the popup projector. Every interaction handler
//! runs to completion; the only suspension points are the gateway and
//! geocoder calls, and their responses are gated by a monotonically
//! increasing request sequence number so a superseded fetch can never
//! overwrite a newer context's state.

pub mod context;
pub mod planner;
pub mod popup;

use thiserror::Error;
use waypoint_geo_models::InvalidCoordinateError;
use waypoint_pin_models::PinId;

/// Errors from session operations.
///
/// Gateway failures are *not* errors here: they convert the active
/// query context to `Errored` at the apply step and never propagate.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A coordinate with a non-finite component reached a boundary.
    #[error(transparent)]
    InvalidCoordinate(#[from] InvalidCoordinateError),

    /// The referenced pin does not exist (or no longer exists).
    #[error("unknown pin: {id}")]
    UnknownPin {
        /// The missing pin's id.
        id: PinId,
    },

    /// A directional query was activated with a missing, non-finite,
    /// or non-positive radius.
    #[error("invalid radius: {radius_km:?} km")]
    InvalidRadius {
        /// The offending radius, if one was supplied at all.
        radius_km: Option<f64>,
    },
}
