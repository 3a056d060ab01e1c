//! In-memory pin collection with per-pin suggestion caches and
//! cascade-deleted connections.

use std::collections::BTreeMap;

use waypoint_geo_models::InvalidCoordinateError;
use waypoint_pin_models::{CacheKey, Connection, ConnectionId, Pin, PinId};

/// Owns every pin and connection in the session.
///
/// All state is session-scoped and in memory; nothing here persists
/// across sessions.
#[derive(Debug, Default)]
pub struct PinStore {
    pins: BTreeMap<PinId, Pin>,
    connections: Vec<Connection>,
}

impl PinStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pin, validating its coordinate first so corrupt state
    /// never reaches the map surface.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCoordinateError`] if the coordinate has a
    /// non-finite component; the store is left untouched.
    pub fn add(&mut self, pin: Pin) -> Result<PinId, InvalidCoordinateError> {
        pin.coordinate.validate()?;
        let id = pin.id.clone();
        self.pins.insert(id.clone(), pin);
        Ok(id)
    }

    /// Removes a pin, cascading to every connection that touches it.
    ///
    /// Returns the removed pin and the ids of the removed connections,
    /// or `None` if no such pin exists.
    pub fn remove(&mut self, id: &PinId) -> Option<(Pin, Vec<ConnectionId>)> {
        let pin = self.pins.remove(id)?;

        let mut removed = Vec::new();
        self.connections.retain(|conn| {
            if conn.touches(id) {
                removed.push(conn.id.clone());
                false
            } else {
                true
            }
        });

        if !removed.is_empty() {
            log::debug!("removed pin {id} cascaded {} connection(s)", removed.len());
        }

        Some((pin, removed))
    }

    /// Looks up a pin by id.
    #[must_use]
    pub fn get(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    /// Looks up a pin mutably by id.
    pub fn get_mut(&mut self, id: &PinId) -> Option<&mut Pin> {
        self.pins.get_mut(id)
    }

    /// Iterates all pins in id order.
    pub fn list(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    /// Number of pins in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// True if the store holds no pins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Reads a cached suggestion for a pin, if present.
    #[must_use]
    pub fn get_cached(&self, id: &PinId, key: &CacheKey) -> Option<&str> {
        self.pins
            .get(id)?
            .suggestion_cache
            .get(key)
            .map(String::as_str)
    }

    /// Writes a cached suggestion for a pin.
    ///
    /// Idempotent for identical `(key, content)`; a distinct key always
    /// gets its own slot (the key is a structured composite, so slots
    /// cannot collide). Returns false if the pin no longer exists.
    pub fn set_cached(&mut self, id: &PinId, key: CacheKey, content: String) -> bool {
        let Some(pin) = self.pins.get_mut(id) else {
            log::warn!("dropping cache write for removed pin {id}");
            return false;
        };
        pin.suggestion_cache.insert(key, content);
        true
    }

    /// Appends a connection. Both endpoints must be live pins.
    pub fn add_connection(&mut self, connection: Connection) {
        debug_assert!(self.pins.contains_key(&connection.from_pin));
        debug_assert!(self.pins.contains_key(&connection.to_pin));
        self.connections.push(connection);
    }

    /// All live connections.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Connections touching the given pin.
    pub fn connections_for<'a>(
        &'a self,
        id: &'a PinId,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.touches(id))
    }
}
