//! The at-most-one active query context.

use waypoint_geo_models::Direction;
use waypoint_pin_models::PinId;

/// Lifecycle of the active query's fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// Context is open but no fetch has started (e.g. the host is
    /// debouncing the radius slider).
    Idle,
    /// A fetch is in flight; the popup renders a placeholder.
    Loading,
    /// Suggestion content is available.
    Ready(String),
    /// The fetch failed; the popup renders the raw message. Nothing is
    /// retried automatically — the user must re-trigger the query.
    Errored(String),
}

/// The live query/popup context. At most one exists per session;
/// activating a new one supersedes the old.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQueryContext {
    /// Monotonic request sequence number. Async responses carrying a
    /// different number than the live context are discarded.
    pub seq: u64,
    /// The pin this query radiates from.
    pub target: PinId,
    /// Query direction.
    pub direction: Direction,
    /// Selected radius in kilometres. Required for cardinal
    /// directions; optional for Overview (display circle only).
    pub radius_km: Option<f64>,
    /// Snapshot of the sidebar filters at activation time.
    pub filters: Vec<String>,
    /// Fetch lifecycle state.
    pub state: QueryState,
    /// True once the sidebar filters have changed since the content
    /// was fetched; the popup shows a refresh affordance.
    pub stale: bool,
}

impl ActiveQueryContext {
    /// Marks the context stale. Called when the sidebar filter set
    /// changes while the popup is open.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }
}
