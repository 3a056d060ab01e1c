//! The single logical actor coordinating pins, queries, and links.
//!
//! All mutation funnels through [`PlannerSession`]. Fetches are split
//! into three steps so the host event loop can interleave them with
//! newer interactions: [`PlannerSession::activate_query`] opens the
//! context (serving straight from cache when the key hits),
//! [`PlannerSession::start_fetch`] hands out a ticket describing the
//! network call, and [`PlannerSession::apply_outcome`] applies the
//! result iff the ticket's sequence number still matches the live
//! context. [`run_query`] drives all three for hosts that don't need
//! to interleave.

use std::time::Instant;

use waypoint_gateway::geocode::Geocoder;
use waypoint_gateway::{GatewayError, SuggestionGateway, SuggestionRequest};
use waypoint_geo::arc::{DEFAULT_ARC_SEGMENTS, DEFAULT_CIRCLE_SEGMENTS, DEFAULT_SWEEP_DEG, arc_ring, circle_ring};
use waypoint_geo::membership::is_inside;
use waypoint_geo_models::{Coordinate, Direction, PixelPoint};
use waypoint_pin::connect::{ClickOutcome, ConnectionCoordinator, LinkState};
use waypoint_pin::store::PinStore;
use waypoint_pin_models::{CacheKey, Pin, PinId};

use crate::SessionError;
use crate::context::{ActiveQueryContext, QueryState};
use crate::popup::{MapSurface, PopupProjector};

/// How a query activation was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Served from the pin's suggestion cache; the context is already
    /// `Ready` and no fetch is needed.
    Cached {
        /// Sequence number of the new context.
        seq: u64,
    },
    /// No cache entry; the host should drive a fetch for this ticket.
    NeedsFetch {
        /// Sequence number of the new context.
        seq: u64,
    },
}

/// Everything the host needs to perform the network half of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    /// Sequence number guarding the eventual [`PlannerSession::apply_outcome`].
    pub seq: u64,
    /// Coordinate of the query's origin pin.
    pub origin: Coordinate,
    /// Query direction.
    pub direction: Direction,
    /// Selected radius, if any.
    pub radius_km: Option<f64>,
    /// Filter snapshot.
    pub filters: Vec<String>,
}

/// Whether an async outcome was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The outcome updated the live context.
    Applied,
    /// The context had been superseded or closed; the outcome was
    /// discarded without touching any state.
    Discarded,
}

/// The session-scoped coordinator: pin collection, connect state
/// machine, at-most-one query context, popup projector.
#[derive(Default)]
pub struct PlannerSession {
    pins: PinStore,
    connector: ConnectionCoordinator,
    projector: PopupProjector,
    context: Option<ActiveQueryContext>,
    next_seq: u64,
}

impl PlannerSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the pin collection.
    #[must_use]
    pub const fn pins(&self) -> &PinStore {
        &self.pins
    }

    /// The live query context, if any.
    #[must_use]
    pub const fn context(&self) -> Option<&ActiveQueryContext> {
        self.context.as_ref()
    }

    /// Drops a user-placed pin at the given coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCoordinate`] for non-finite
    /// input; nothing is mutated in that case.
    pub fn drop_pin(&mut self, coordinate: Coordinate) -> Result<PinId, SessionError> {
        let id = self.pins.add(Pin::user_placed(coordinate))?;
        log::debug!("dropped pin {id} at ({}, {})", coordinate.lng, coordinate.lat);
        Ok(id)
    }

    /// Removes a pin, cascading to its connections, the connect flow,
    /// and the query context if it targets this pin.
    ///
    /// Returns false if no such pin exists.
    pub fn remove_pin(&mut self, id: &PinId) -> bool {
        let Some((_, removed_connections)) = self.pins.remove(id) else {
            return false;
        };

        if !removed_connections.is_empty() {
            log::debug!(
                "pin {id} removal cascaded {} connection(s)",
                removed_connections.len()
            );
        }

        if self
            .context
            .as_ref()
            .is_some_and(|ctx| ctx.target == *id)
        {
            log::debug!("closing query context for removed pin {id}");
            self.context = None;
        }

        if matches!(self.connector.state(), LinkState::AwaitingTarget(source) if source == id) {
            self.connector.reset();
        }

        true
    }

    /// Activates a query context for `target`, superseding any prior
    /// context. Serves from the pin's suggestion cache when the
    /// structured key hits.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownPin`] if the pin doesn't exist,
    /// [`SessionError::InvalidCoordinate`] if its coordinate fails
    /// boundary validation, or [`SessionError::InvalidRadius`] if a
    /// cardinal direction is activated without a positive finite
    /// radius.
    pub fn activate_query(
        &mut self,
        target: &PinId,
        direction: Direction,
        radius_km: Option<f64>,
        filters: &[String],
    ) -> Result<Activation, SessionError> {
        let pin = self.pins.get(target).ok_or_else(|| SessionError::UnknownPin {
            id: target.clone(),
        })?;
        pin.coordinate.validate()?;
        validate_radius(direction, radius_km)?;

        if let Some(prev) = self.context.take() {
            log::debug!("superseding query context seq {}", prev.seq);
        }

        self.next_seq += 1;
        let seq = self.next_seq;

        let key = CacheKey::new(direction, radius_km, filters);
        let cached = self.pins.get_cached(target, &key).map(String::from);

        let (state, activation) = match cached {
            Some(content) => {
                log::debug!("cache hit for pin {target} ({direction})");
                (QueryState::Ready(content), Activation::Cached { seq })
            }
            None => {
                log::debug!("cache miss for pin {target} ({direction})");
                (QueryState::Idle, Activation::NeedsFetch { seq })
            }
        };

        self.context = Some(ActiveQueryContext {
            seq,
            target: target.clone(),
            direction,
            radius_km,
            filters: filters.to_vec(),
            state,
            stale: false,
        });

        Ok(activation)
    }

    /// Moves the context with the given sequence number from `Idle` to
    /// `Loading` and returns the fetch ticket.
    ///
    /// Returns `None` if the context has been superseded, closed, or
    /// is not idle (already fetching, or served from cache).
    pub fn start_fetch(&mut self, seq: u64) -> Option<FetchTicket> {
        let ctx = self.context.as_mut().filter(|ctx| ctx.seq == seq)?;
        if ctx.state != QueryState::Idle {
            return None;
        }

        let origin = self.pins.get(&ctx.target)?.coordinate;
        ctx.state = QueryState::Loading;

        Some(FetchTicket {
            seq,
            origin,
            direction: ctx.direction,
            radius_km: ctx.radius_km,
            filters: ctx.filters.clone(),
        })
    }

    /// Applies a finished fetch, gated by sequence number.
    ///
    /// A success writes the suggestion cache through the pin store and
    /// flips the context to `Ready`; a failure flips it to `Errored`
    /// with the user-facing message. An outcome whose sequence number
    /// no longer matches the live context is discarded untouched —
    /// this is the guard that makes in-flight fetches
    /// cancelled-by-supersession.
    pub fn apply_outcome(&mut self, seq: u64, outcome: Result<String, GatewayError>) -> Applied {
        let Some(ctx) = self.context.as_mut().filter(|ctx| ctx.seq == seq) else {
            log::warn!("discarding stale query response (seq {seq})");
            return Applied::Discarded;
        };

        match outcome {
            Ok(content) => {
                let key = CacheKey::new(ctx.direction, ctx.radius_km, &ctx.filters);
                let target = ctx.target.clone();
                let direction = ctx.direction;
                let radius_km = ctx.radius_km;

                ctx.state = QueryState::Ready(content.clone());
                self.pins.set_cached(&target, key, content);

                if let Some(pin) = self.pins.get_mut(&target) {
                    pin.last_explored_direction = Some(direction);
                    if direction != Direction::Overview
                        && let Some(radius) = radius_km
                    {
                        pin.last_radius_by_direction.insert(direction, radius);
                    }
                }
            }
            Err(error) => {
                log::error!("suggestion fetch failed (seq {seq}): {error}");
                ctx.state = QueryState::Errored(error.user_message());
            }
        }

        Applied::Applied
    }

    /// Runs a geocoded place candidate through the wedge-membership
    /// gate and materializes it as an AI-derived pin if it passes.
    ///
    /// Rejection (wrong bearing, out of radius, no live context) is
    /// not an error: the candidate is silently discarded and `None` is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCoordinate`] for a non-finite
    /// candidate coordinate.
    pub fn materialize_candidate(
        &mut self,
        place_name: &str,
        coordinate: Coordinate,
    ) -> Result<Option<PinId>, SessionError> {
        coordinate.validate()?;

        let Some(ctx) = self.context.as_ref() else {
            log::debug!("no live context; dropping candidate {place_name}");
            return Ok(None);
        };
        let Some(target) = self.pins.get(&ctx.target) else {
            return Ok(None);
        };

        let radius_km = ctx.radius_km.unwrap_or(0.0);
        if !is_inside(
            coordinate,
            target.coordinate,
            radius_km,
            ctx.direction,
            DEFAULT_SWEEP_DEG,
        ) {
            log::debug!(
                "candidate {place_name} rejected by {} wedge gate",
                ctx.direction
            );
            return Ok(None);
        }

        let mut pin = Pin::ai_derived(coordinate).with_label(place_name);
        pin.filter_tags = ctx.filters.clone();
        let id = self.pins.add(pin)?;
        log::debug!("materialized derived pin {id} for {place_name}");
        Ok(Some(id))
    }

    /// Closes the live query context, if any.
    pub fn close_query(&mut self) {
        if let Some(ctx) = self.context.take() {
            log::debug!("closed query context seq {}", ctx.seq);
        }
    }

    /// Marks the live context stale; called when the sidebar filter
    /// set changes while the popup is open.
    pub fn filters_changed(&mut self) {
        if let Some(ctx) = self.context.as_mut() {
            ctx.mark_stale();
        }
    }

    /// The closed ring to display for the live query: a wedge for
    /// cardinal directions, a circle for Overview (when a radius is
    /// selected), empty when there is nothing to draw.
    #[must_use]
    pub fn query_region(&self) -> Vec<Coordinate> {
        let Some(ctx) = self.context.as_ref() else {
            return Vec::new();
        };
        let Some(center) = self.pins.get(&ctx.target).map(|pin| pin.coordinate) else {
            return Vec::new();
        };

        match (ctx.direction, ctx.radius_km) {
            (Direction::Overview, Some(radius)) => {
                circle_ring(center, radius, DEFAULT_CIRCLE_SEGMENTS)
            }
            (Direction::Overview, None) => Vec::new(),
            (direction, radius) => arc_ring(
                center,
                radius.unwrap_or(0.0),
                direction,
                DEFAULT_SWEEP_DEG,
                DEFAULT_ARC_SEGMENTS,
            ),
        }
    }

    /// Begins the two-step connect flow from `source`.
    pub fn begin_connect(&mut self, source: &PinId) -> bool {
        self.connector.begin_connect(&self.pins, source)
    }

    /// Routes a pin click through the connect flow.
    pub fn click_pin(&mut self, clicked: &PinId, now: Instant) -> ClickOutcome {
        self.connector.click_pin(&mut self.pins, clicked, now)
    }

    /// The transient connect-success notice, if live at `now`.
    #[must_use]
    pub fn success_notice(&self, now: Instant) -> Option<&'static str> {
        self.connector.success_notice(now)
    }

    /// Current connect flow state.
    #[must_use]
    pub const fn connect_state(&self) -> &LinkState {
        self.connector.state()
    }

    /// Recomputes the popup anchor from the latest viewport. Call on
    /// every viewport change and after any context change.
    pub fn reproject_popup(&mut self, surface: &dyn MapSurface) -> Option<PixelPoint> {
        let target = self
            .context
            .as_ref()
            .and_then(|ctx| self.pins.get(&ctx.target))
            .map(|pin| pin.coordinate);
        self.projector.reproject(target, surface)
    }
}

/// Validates the radius for a query activation.
fn validate_radius(direction: Direction, radius_km: Option<f64>) -> Result<(), SessionError> {
    let valid = |r: f64| r.is_finite() && r > 0.0;
    match (direction, radius_km) {
        // Overview needs no radius, but a nonsense one is still rejected.
        (Direction::Overview, None) => Ok(()),
        (_, Some(r)) if valid(r) => Ok(()),
        (_, radius_km) => Err(SessionError::InvalidRadius { radius_km }),
    }
}

/// Drives a full query: reverse-geocodes the origin, calls the
/// suggestion gateway, and applies the outcome.
///
/// This convenience holds the session across the awaits, so it cannot
/// interleave with newer activations; hosts that need true
/// supersession drive [`PlannerSession::start_fetch`] and
/// [`PlannerSession::apply_outcome`] themselves from their event loop.
pub async fn run_query(
    session: &mut PlannerSession,
    gateway: &dyn SuggestionGateway,
    geocoder: &dyn Geocoder,
    seq: u64,
) -> Applied {
    let Some(ticket) = session.start_fetch(seq) else {
        return Applied::Discarded;
    };

    let place_name = geocoder.reverse(ticket.origin).await;
    let request = SuggestionRequest {
        place_name,
        direction: ticket.direction,
        lng: ticket.origin.lng,
        lat: ticket.origin.lat,
        radius: ticket.radius_km,
        filters: ticket.filters,
    };

    let outcome = gateway.generate_suggestion(&request).await;
    session.apply_outcome(seq, outcome)
}

#[cfg(test)]
mod tests {
    use waypoint_geo::sphere::destination_point;

    use super::*;

    const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

    fn session_with_pin() -> (PlannerSession, PinId) {
        let mut session = PlannerSession::new();
        let id = session.drop_pin(ORIGIN).unwrap();
        (session, id)
    }

    fn seq_of(activation: &Activation) -> u64 {
        match activation {
            Activation::Cached { seq } | Activation::NeedsFetch { seq } => *seq,
        }
    }

    #[test]
    fn cardinal_activation_requires_radius() {
        let (mut session, id) = session_with_pin();
        assert!(matches!(
            session.activate_query(&id, Direction::East, None, &[]),
            Err(SessionError::InvalidRadius { .. })
        ));
        assert!(matches!(
            session.activate_query(&id, Direction::East, Some(-3.0), &[]),
            Err(SessionError::InvalidRadius { .. })
        ));
        assert!(session.context().is_none());
    }

    #[test]
    fn fetch_then_cache_hit() {
        let (mut session, id) = session_with_pin();

        let activation = session
            .activate_query(&id, Direction::East, Some(20.0), &[])
            .unwrap();
        let Activation::NeedsFetch { seq } = activation else {
            panic!("first activation must miss the cache");
        };

        let ticket = session.start_fetch(seq).unwrap();
        assert_eq!(ticket.origin, ORIGIN);
        assert_eq!(session.context().unwrap().state, QueryState::Loading);

        assert_eq!(
            session.apply_outcome(seq, Ok("Go east.".to_string())),
            Applied::Applied
        );
        assert_eq!(
            session.context().unwrap().state,
            QueryState::Ready("Go east.".to_string())
        );

        // Same query shape again: served from cache, Ready immediately.
        session.close_query();
        let activation = session
            .activate_query(&id, Direction::East, Some(20.0), &[])
            .unwrap();
        assert!(matches!(activation, Activation::Cached { .. }));
        assert_eq!(
            session.context().unwrap().state,
            QueryState::Ready("Go east.".to_string())
        );

        let pin = session.pins().get(&id).unwrap();
        assert_eq!(pin.last_explored_direction, Some(Direction::East));
        assert_eq!(
            pin.last_radius_by_direction.get(&Direction::East),
            Some(&20.0)
        );
    }

    #[test]
    fn superseded_response_is_discarded() {
        let (mut session, id) = session_with_pin();

        let first = session
            .activate_query(&id, Direction::East, Some(20.0), &[])
            .unwrap();
        let first_seq = seq_of(&first);
        session.start_fetch(first_seq).unwrap();

        // User switches direction while the first fetch is in flight.
        let second = session
            .activate_query(&id, Direction::North, Some(10.0), &[])
            .unwrap();
        let second_seq = seq_of(&second);
        session.start_fetch(second_seq).unwrap();

        // The first response arrives late and must not overwrite the
        // newer context or write the cache.
        assert_eq!(
            session.apply_outcome(first_seq, Ok("stale".to_string())),
            Applied::Discarded
        );
        assert_eq!(session.context().unwrap().direction, Direction::North);
        assert_eq!(session.context().unwrap().state, QueryState::Loading);

        let east_key = CacheKey::new(Direction::East, Some(20.0), &[]);
        assert_eq!(session.pins().get_cached(&id, &east_key), None);

        assert_eq!(
            session.apply_outcome(second_seq, Ok("fresh".to_string())),
            Applied::Applied
        );
        assert_eq!(
            session.context().unwrap().state,
            QueryState::Ready("fresh".to_string())
        );
    }

    #[test]
    fn gateway_failure_becomes_errored_state() {
        let (mut session, id) = session_with_pin();

        let activation = session
            .activate_query(&id, Direction::West, Some(15.0), &[])
            .unwrap();
        let seq = seq_of(&activation);
        session.start_fetch(seq).unwrap();

        let outcome = Err(GatewayError::Api {
            error: "upstream".to_string(),
            details: Some("model unavailable".to_string()),
        });
        assert_eq!(session.apply_outcome(seq, outcome), Applied::Applied);
        assert_eq!(
            session.context().unwrap().state,
            QueryState::Errored("model unavailable".to_string())
        );
    }

    #[test]
    fn removing_target_pin_destroys_context() {
        let (mut session, id) = session_with_pin();
        session
            .activate_query(&id, Direction::Overview, None, &[])
            .unwrap();
        assert!(session.context().is_some());

        assert!(session.remove_pin(&id));
        assert!(session.context().is_none());
        assert!(session.pins().is_empty());
    }

    #[test]
    fn filters_changed_marks_context_stale() {
        let (mut session, id) = session_with_pin();
        session
            .activate_query(&id, Direction::Overview, None, &[])
            .unwrap();
        assert!(!session.context().unwrap().stale);

        session.filters_changed();
        assert!(session.context().unwrap().stale);
    }

    #[test]
    fn query_region_shapes() {
        let (mut session, id) = session_with_pin();

        session
            .activate_query(&id, Direction::East, Some(20.0), &[])
            .unwrap();
        assert_eq!(session.query_region().len(), DEFAULT_ARC_SEGMENTS + 3);

        session
            .activate_query(&id, Direction::Overview, Some(20.0), &[])
            .unwrap();
        assert_eq!(session.query_region().len(), DEFAULT_CIRCLE_SEGMENTS + 1);

        session
            .activate_query(&id, Direction::Overview, None, &[])
            .unwrap();
        assert!(session.query_region().is_empty());
    }

    #[test]
    fn materialize_gate_accepts_and_rejects() {
        let (mut session, id) = session_with_pin();
        session
            .activate_query(&id, Direction::East, Some(20.0), &[])
            .unwrap();

        // Bearing ~74°, just under the radius: inside the East wedge.
        let inside = destination_point(ORIGIN, 19.5, 74.0);
        let accepted = session.materialize_candidate("Alpha", inside).unwrap();
        let derived = accepted.expect("candidate inside the wedge must materialize");
        let pin = session.pins().get(&derived).unwrap();
        assert_eq!(pin.origin, waypoint_pin_models::PinOrigin::AiDerived);
        assert_eq!(pin.label.as_deref(), Some("Alpha"));

        // Due west: wrong wedge entirely.
        let west = destination_point(ORIGIN, 19.0, 270.0);
        assert_eq!(session.materialize_candidate("Beta", west).unwrap(), None);

        // Right bearing, out of radius.
        let far = destination_point(ORIGIN, 150.0, 90.0);
        assert_eq!(session.materialize_candidate("Gamma", far).unwrap(), None);

        assert_eq!(session.pins().len(), 2);
    }

    mod end_to_end {
        use std::collections::BTreeMap;

        use waypoint_gateway::geocode::Geocoder;

        use super::*;

        struct ScriptedGateway {
            suggestion: String,
        }

        #[async_trait::async_trait]
        impl SuggestionGateway for ScriptedGateway {
            async fn generate_suggestion(
                &self,
                request: &SuggestionRequest,
            ) -> Result<String, GatewayError> {
                assert_eq!(request.direction, Direction::East);
                assert_eq!(request.radius, Some(20.0));
                Ok(self.suggestion.clone())
            }
        }

        struct ScriptedGeocoder {
            places: BTreeMap<String, Coordinate>,
        }

        #[async_trait::async_trait]
        impl Geocoder for ScriptedGeocoder {
            async fn reverse(&self, _coordinate: Coordinate) -> String {
                "Origin Town".to_string()
            }

            async fn forward(
                &self,
                place_name: &str,
            ) -> Result<Option<Coordinate>, GatewayError> {
                Ok(self.places.get(place_name).copied())
            }
        }

        #[tokio::test]
        async fn directional_query_materializes_only_in_wedge() {
            let (mut session, id) = session_with_pin();

            let activation = session
                .activate_query(&id, Direction::East, Some(20.0), &[])
                .unwrap();
            let seq = seq_of(&activation);

            let gateway = ScriptedGateway {
                suggestion: "Try Alpha or Beta.".to_string(),
            };
            let geocoder = ScriptedGeocoder {
                places: BTreeMap::from([
                    // Bearing ~74°, ~20 km out: inside the East wedge.
                    ("Alpha".to_string(), destination_point(ORIGIN, 19.8, 74.0)),
                    // Due west: outside.
                    ("Beta".to_string(), destination_point(ORIGIN, 19.8, 270.0)),
                ]),
            };

            assert_eq!(
                run_query(&mut session, &gateway, &geocoder, seq).await,
                Applied::Applied
            );
            assert_eq!(
                session.context().unwrap().state,
                QueryState::Ready("Try Alpha or Beta.".to_string())
            );

            for name in ["Alpha", "Beta"] {
                if let Some(coordinate) = geocoder.forward(name).await.unwrap() {
                    session.materialize_candidate(name, coordinate).unwrap();
                }
            }

            assert_eq!(session.pins().len(), 2, "only Alpha materializes");
            let derived: Vec<_> = session
                .pins()
                .list()
                .filter(|pin| pin.origin == waypoint_pin_models::PinOrigin::AiDerived)
                .collect();
            assert_eq!(derived.len(), 1);
            assert_eq!(derived[0].label.as_deref(), Some("Alpha"));
        }
    }
}
