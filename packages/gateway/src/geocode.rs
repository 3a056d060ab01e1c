//! Nominatim-style forward and reverse geocoding.
//!
//! Reverse geocoding is deliberately infallible at the trait boundary:
//! a failed lookup must never sink the directional query it serves, so
//! it degrades to a sentinel place name instead. Forward geocoding
//! locates AI-suggested places before the wedge-membership gate.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use waypoint_geo_models::Coordinate;

use crate::GatewayError;

/// Place name used when reverse geocoding finds no match.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Place name used when the reverse geocoding request itself fails.
pub const LOCATION_FETCH_FAILED: &str = "Error fetching location";

/// Default geocoder URL when `WAYPOINT_GEOCODER_URL` is not set.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Trait for place-name resolution in both directions.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a coordinate to a display place name.
    ///
    /// Never fails: returns [`UNKNOWN_LOCATION`] when nothing matches
    /// and [`LOCATION_FETCH_FAILED`] when the request errors.
    async fn reverse(&self, coordinate: Coordinate) -> String;

    /// Resolves a place name to a coordinate, or `None` if the
    /// geocoder has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request or response parsing
    /// fails.
    async fn forward(&self, place_name: &str) -> Result<Option<Coordinate>, GatewayError>;
}

/// Nominatim / OpenStreetMap geocoder client.
///
/// The public instance allows at most 1 request per second; the
/// single-actor session model keeps us comfortably under that.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a geocoder against the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a geocoder from `WAYPOINT_GEOCODER_URL`, falling back
    /// to the public Nominatim instance.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("WAYPOINT_GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.into());
        Self::new(base_url)
    }

    async fn reverse_inner(&self, coordinate: Coordinate) -> Result<Option<String>, GatewayError> {
        let resp = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", coordinate.lat.to_string()),
                ("lon", coordinate.lng.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;
        Ok(parse_reverse(&body))
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> String {
        match self.reverse_inner(coordinate).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_LOCATION.to_string(),
            Err(e) => {
                log::error!(
                    "reverse geocoding ({}, {}) failed: {e}",
                    coordinate.lng,
                    coordinate.lat
                );
                LOCATION_FETCH_FAILED.to_string()
            }
        }
    }

    async fn forward(&self, place_name: &str) -> Result<Option<Coordinate>, GatewayError> {
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", place_name), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;

        let body: serde_json::Value = resp.json().await?;
        parse_forward(&body)
    }
}

/// Extracts the display name from a Nominatim reverse response.
fn parse_reverse(body: &serde_json::Value) -> Option<String> {
    body["display_name"].as_str().map(String::from)
}

/// Parses a Nominatim search response into a coordinate.
fn parse_forward(body: &serde_json::Value) -> Result<Option<Coordinate>, GatewayError> {
    let results = body.as_array().ok_or_else(|| GatewayError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GatewayError::Parse {
            message: "Missing lat in Nominatim response".to_string(),
        })?;

    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GatewayError::Parse {
            message: "Missing lon in Nominatim response".to_string(),
        })?;

    Ok(Some(Coordinate::new(lon, lat)))
}
