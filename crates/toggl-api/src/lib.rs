//! Toggl Track API v9 client.
//!
//! Covers the endpoints the CLI needs:
//! - `/me` with related data (clients and projects)
//! - the currently running time entry
//! - starting and stopping time entries

mod models;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use toggl_core::rounding::format_api;

pub use models::{ApiClient, ApiProject, Me, NewTimeEntry, TimeEntry};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Toggl Track API v9 base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.track.toggl.com/api/v9";
/// Password paired with an API token in HTTP basic auth.
const TOKEN_PASSWORD: &str = "api_token";

/// Toggl API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Toggl API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ApiError> {
        let token = token.into();

        if token.is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "API token cannot be empty",
            });
        }
        if token.trim().is_empty() {
            return Err(ApiError::InvalidToken {
                reason: "API token cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            token,
            base_url,
        })
    }

    /// Fetches the user together with clients and projects.
    pub async fn me_with_related_data(&self) -> Result<Me, ApiError> {
        let endpoint = "/me?with_related_data=true";
        let body = self.execute(self.request(Method::GET, endpoint)).await?;
        let body =
            body.ok_or_else(|| ApiError::InvalidResponse(format!("empty body from {endpoint}")))?;
        decode(endpoint, &body)
    }

    /// Returns the running time entry, if any.
    pub async fn current_time_entry(&self) -> Result<Option<TimeEntry>, ApiError> {
        let endpoint = "/me/time_entries/current";
        match self.execute(self.request(Method::GET, endpoint)).await? {
            Some(body) => decode(endpoint, &body).map(Some),
            None => Ok(None),
        }
    }

    /// Creates a time entry and returns it as stored by Toggl.
    pub async fn start_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, ApiError> {
        let endpoint = format!("/workspaces/{}/time_entries", entry.workspace_id);
        let body = self
            .execute(self.request(Method::POST, &endpoint).json(entry))
            .await?
            .ok_or_else(|| ApiError::InvalidResponse(format!("empty body from {endpoint}")))?;
        decode(&endpoint, &body)
    }

    /// Stops a running time entry at `stop`.
    ///
    /// Toggl may answer with an empty body; that is still a success and
    /// yields `None`.
    pub async fn stop_time_entry(
        &self,
        workspace_id: u64,
        entry_id: u64,
        stop: DateTime<Utc>,
    ) -> Result<Option<TimeEntry>, ApiError> {
        let endpoint = format!("/workspaces/{workspace_id}/time_entries/{entry_id}/stop");
        let payload = serde_json::json!({ "stop": format_api(stop) });
        match self
            .execute(self.request(Method::PATCH, &endpoint).json(&payload))
            .await?
        {
            Some(body) => decode(&endpoint, &body).map(Some),
            None => Ok(None),
        }
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{endpoint}", self.base_url);
        tracing::debug!(%method, %url, "toggl request");
        self.http
            .request(method, url)
            .basic_auth(&self.token, Some(TOKEN_PASSWORD))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Sends a request and returns its body, or `None` when the body is
    /// empty or a JSON `null`.
    async fn execute(&self, request: RequestBuilder) -> Result<Option<String>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "toggl response");

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: parse_api_error(&body),
            });
        }

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        Ok(Some(body))
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|err| ApiError::InvalidResponse(format!("{endpoint}: {err}")))
}

/// Extracts a readable message from an error body.
///
/// Toggl answers errors with a JSON string, a JSON object carrying
/// `message` or `error`, or plain text.
fn parse_api_error(body: &str) -> String {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorPayload {
        Text(String),
        Object {
            #[serde(alias = "error")]
            message: String,
        },
    }

    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(ErrorPayload::Text(message) | ErrorPayload::Object { message }) => message,
        Err(_) if body.trim().is_empty() => "empty error response".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
