#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pin lifecycle and linking.
//!
//! [`store::PinStore`] owns the pin collection, each pin's suggestion
//! cache, and the connections between pins; removing a pin cascades to
//! every connection touching it. [`connect::ConnectionCoordinator`] is
//! the two-step "connect pins" state machine that builds the drawn
//! curve between a source and a target pin.

pub mod connect;
pub mod store;
