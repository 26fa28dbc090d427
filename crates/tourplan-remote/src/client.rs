//! HTTP client for the safety API's itinerary routes.
//!
//! | Operation | Request                                   |
//! |-----------|-------------------------------------------|
//! | fetch     | `GET  {base}/api/itinerary/{user_id}`     |
//! | save      | `POST {base}/api/itinerary/save`          |
//! | clear     | `POST {base}/api/itinerary/clear?user_id=` |
//!
//! Requests are sent once. Retrying a failed save is the caller's decision.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tourplan_core::AppConfig;

use crate::error::RemoteError;
use crate::types::{RemoteItinerary, SavePayload};
use crate::ItineraryRemote;

const ITINERARY_PATH: [&str; 2] = ["api", "itinerary"];

/// Client for the safety API's itinerary endpoints.
pub struct SafetyApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl SafetyApiClient {
    /// Creates a client for the safety API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RemoteError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(base_url).map_err(|e| RemoteError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "expected an absolute http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            token: None,
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`SafetyApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, RemoteError> {
        let client = Self::new(
            &config.safety_api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        Ok(client.with_token(config.safety_api_token.clone()))
    }

    /// Attaches a bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Appends `segments` to the base URL path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(ITINERARY_PATH).extend(segments);
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Maps any non-2xx status to [`RemoteError::UnexpectedStatus`].
    fn ensure_success(status: StatusCode, url: &Url) -> Result<(), RemoteError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }
}

#[async_trait]
impl ItineraryRemote for SafetyApiClient {
    /// # Errors
    ///
    /// - [`RemoteError::NotFound`] on HTTP 404.
    /// - [`RemoteError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`RemoteError::Http`] on network failure.
    /// - [`RemoteError::Deserialize`] if the body is not an itinerary.
    async fn fetch(&self, user_id: &str) -> Result<RemoteItinerary, RemoteError> {
        let url = self.endpoint(&[user_id]);
        let response = self.authorize(self.client.get(url.clone())).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound {
                user_id: user_id.to_owned(),
            });
        }
        Self::ensure_success(status, &url)?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Deserialize {
            context: format!("fetch itinerary(user_id={user_id})"),
            source: e,
        })
    }

    /// # Errors
    ///
    /// - [`RemoteError::UnexpectedStatus`] on a non-2xx status.
    /// - [`RemoteError::Http`] on network failure.
    async fn save(&self, payload: &SavePayload) -> Result<(), RemoteError> {
        let url = self.endpoint(&["save"]);
        let response = self
            .authorize(self.client.post(url.clone()).json(payload))
            .send()
            .await?;
        Self::ensure_success(response.status(), &url)?;
        tracing::debug!(
            user_id = %payload.user_id,
            items = payload.items.len(),
            "itinerary saved"
        );
        Ok(())
    }

    /// # Errors
    ///
    /// - [`RemoteError::UnexpectedStatus`] on a non-2xx status.
    /// - [`RemoteError::Http`] on network failure.
    async fn clear(&self, user_id: &str) -> Result<(), RemoteError> {
        let mut url = self.endpoint(&["clear"]);
        url.query_pairs_mut().append_pair("user_id", user_id);
        let response = self.authorize(self.client.post(url.clone())).send().await?;
        Self::ensure_success(response.status(), &url)?;
        tracing::debug!(user_id, "remote itinerary cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> SafetyApiClient {
        SafetyApiClient::new(base_url, 30, "tourplan-test/0.1")
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_appends_itinerary_path() {
        let client = test_client("http://localhost:8000");
        assert_eq!(
            client.endpoint(&["save"]).as_str(),
            "http://localhost:8000/api/itinerary/save"
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = test_client("https://safety.example.in/v2/");
        assert_eq!(
            client.endpoint(&["clear"]).as_str(),
            "https://safety.example.in/v2/api/itinerary/clear"
        );
    }

    #[test]
    fn endpoint_encodes_user_id_segment() {
        let client = test_client("http://localhost:8000");
        let url = client.endpoint(&["user/../1 2"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/itinerary/user%2F..%2F1%202"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let result = SafetyApiClient::new("mailto:ops@example.in", 30, "tourplan-test/0.1");
        assert!(matches!(result, Err(RemoteError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = SafetyApiClient::new("not a url", 30, "tourplan-test/0.1");
        assert!(matches!(result, Err(RemoteError::InvalidBaseUrl { .. })));
    }
}
