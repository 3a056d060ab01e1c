//! Reqwest implementation of the suggestion gateway contract.

use serde::Deserialize;

use crate::{GatewayError, SuggestionGateway, SuggestionRequest};

/// Default backend URL when `WAYPOINT_GATEWAY_URL` is not set.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3001";

/// HTTP client for the AI suggestion backend.
pub struct HttpSuggestionGateway {
    client: reqwest::Client,
    base_url: String,
}

/// Success body: `{"suggestion": "..."}`.
#[derive(Deserialize)]
struct SuggestionResponse {
    suggestion: String,
}

/// Failure body: `{"error": "...", "details": "..."}`.
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

impl HttpSuggestionGateway {
    /// Creates a gateway client against the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a gateway client from `WAYPOINT_GATEWAY_URL`, falling
    /// back to [`DEFAULT_GATEWAY_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("WAYPOINT_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.into());
        Self::new(base_url)
    }
}

#[async_trait::async_trait]
impl SuggestionGateway for HttpSuggestionGateway {
    async fn generate_suggestion(
        &self,
        request: &SuggestionRequest,
    ) -> Result<String, GatewayError> {
        let resp = self
            .client
            .post(format!("{}/generate-suggestion", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            parse_success(&body)
        } else {
            Err(parse_failure(status, &body))
        }
    }
}

/// Parses a success body into the suggestion content.
fn parse_success(body: &str) -> Result<String, GatewayError> {
    let parsed: SuggestionResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Parse {
            message: format!("malformed suggestion response: {e}"),
        })?;
    Ok(parsed.suggestion)
}

/// Converts a non-success response into a [`GatewayError::Api`].
///
/// A well-formed `{error, details}` body is carried through; anything
/// else degrades to the raw status line.
fn parse_failure(status: reqwest::StatusCode, body: &str) -> GatewayError {
    serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| GatewayError::Api {
            error: format!("HTTP {status}"),
            details: None,
        },
        |err| GatewayError::Api {
            error: err.error,
            details: err.details,
        },
    )
}
