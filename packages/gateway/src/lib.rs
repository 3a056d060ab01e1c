#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Network boundary of the waypoint core.
//!
//! Defines the request/response contract with the AI suggestion
//! backend (`POST /generate-suggestion`) and the forward/reverse
//! geocoding used to resolve place names. Both are exposed as traits
//! so the session layer can be driven with mocks in tests; the real
//! implementations live in [`http`] and [`geocode`].

pub mod geocode;
pub mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use waypoint_geo_models::Direction;

/// Errors from the suggestion gateway or geocoding services.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a structured error body.
    #[error("Gateway error: {error}")]
    Api {
        /// Short error code or message from the backend.
        error: String,
        /// Optional human-readable detail.
        details: Option<String>,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

impl GatewayError {
    /// The message to surface to the user: the backend's `details`
    /// field when present, otherwise its `error`, otherwise the
    /// transport error text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { error, details } => details.clone().unwrap_or_else(|| error.clone()),
            other => other.to_string(),
        }
    }
}

/// Request body for `POST /generate-suggestion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    /// Resolved place name of the query's origin pin.
    pub place_name: String,
    /// Query direction.
    pub direction: Direction,
    /// Origin longitude.
    pub lng: f64,
    /// Origin latitude.
    pub lat: f64,
    /// Search radius in kilometres; `null` for Overview queries.
    pub radius: Option<f64>,
    /// Active sidebar filters.
    pub filters: Vec<String>,
}

/// Trait for the AI suggestion backend.
#[async_trait::async_trait]
pub trait SuggestionGateway: Send + Sync {
    /// Requests suggestion content for a directional query.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on any non-success status or malformed
    /// response body.
    async fn generate_suggestion(
        &self,
        request: &SuggestionRequest,
    ) -> Result<String, GatewayError>;
}
