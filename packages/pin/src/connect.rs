//! Two-step "connect pins" state machine.
//!
//! The user begins a connection from a source pin, then clicks a
//! target. Clicking the source again cancels. A successful pairing
//! builds the bowed curve via [`waypoint_geo::curve`], appends the
//! connection to the store, and raises a transient success notice
//! that expires after [`NOTICE_TTL`] unless superseded earlier.

use std::time::{Duration, Instant};

use waypoint_geo::curve::{DEFAULT_BEND, DEFAULT_CURVE_SAMPLES, curved_line};
use waypoint_pin_models::{Connection, ConnectionId, PinId};

use crate::store::PinStore;

/// How long the success notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Message shown when two pins are linked.
pub const SUCCESS_MESSAGE: &str = "Pins connected";

/// Where the coordinator is in the two-step interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Not connecting.
    Idle,
    /// Waiting for the user to click a target pin.
    AwaitingTarget(PinId),
}

/// Result of a pin click routed through the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The coordinator was idle; the click belongs to someone else.
    NotConnecting,
    /// The user clicked the source again; the pairing was cancelled.
    Cancelled,
    /// A connection was created.
    Connected(ConnectionId),
    /// The clicked pin no longer exists; the pairing was abandoned.
    TargetMissing,
}

/// Two-step state machine linking two pins with a drawn curve.
#[derive(Debug, Default)]
pub struct ConnectionCoordinator {
    state: LinkState,
    notice_raised_at: Option<Instant>,
}

impl Default for LinkState {
    fn default() -> Self {
        Self::Idle
    }
}

impl ConnectionCoordinator {
    /// Creates an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &LinkState {
        &self.state
    }

    /// Begins a connection from `source`.
    ///
    /// No-op (returning false) if the pin doesn't exist. Any pending
    /// success notice is superseded.
    pub fn begin_connect(&mut self, store: &PinStore, source: &PinId) -> bool {
        if store.get(source).is_none() {
            log::warn!("begin_connect on unknown pin {source}");
            return false;
        }
        self.notice_raised_at = None;
        self.state = LinkState::AwaitingTarget(source.clone());
        true
    }

    /// Routes a pin click through the coordinator.
    ///
    /// From `AwaitingTarget(source)`: clicking `source` cancels;
    /// clicking a different live pin builds the curve, appends the
    /// connection, and raises the success notice. Either way the
    /// coordinator returns to `Idle`. Self-connections are impossible
    /// by construction (the source click is the cancel gesture).
    pub fn click_pin(&mut self, store: &mut PinStore, clicked: &PinId, now: Instant) -> ClickOutcome {
        let LinkState::AwaitingTarget(source) = self.state.clone() else {
            return ClickOutcome::NotConnecting;
        };

        self.state = LinkState::Idle;

        if *clicked == source {
            self.notice_raised_at = None;
            return ClickOutcome::Cancelled;
        }

        let (Some(from), Some(to)) = (store.get(&source), store.get(clicked)) else {
            log::warn!("connect target {clicked} or source {source} vanished");
            self.notice_raised_at = None;
            return ClickOutcome::TargetMissing;
        };

        let curve = curved_line(
            from.coordinate,
            to.coordinate,
            DEFAULT_CURVE_SAMPLES,
            DEFAULT_BEND,
        );
        let connection = Connection {
            id: ConnectionId::new(),
            from_pin: source,
            to_pin: clicked.clone(),
            curve,
        };
        let id = connection.id.clone();
        store.add_connection(connection);
        self.notice_raised_at = Some(now);

        ClickOutcome::Connected(id)
    }

    /// The success notice, if one is live at `now`.
    ///
    /// The notice self-clears once [`NOTICE_TTL`] has elapsed; any
    /// newer interaction clears it earlier.
    #[must_use]
    pub fn success_notice(&self, now: Instant) -> Option<&'static str> {
        let raised = self.notice_raised_at?;
        (now.duration_since(raised) < NOTICE_TTL).then_some(SUCCESS_MESSAGE)
    }

    /// Clears any pending interaction state and notice; used when a
    /// newer action supersedes the connect flow.
    pub fn reset(&mut self) {
        self.state = LinkState::Idle;
        self.notice_raised_at = None;
    }
}
