//! Slack Lists API client implementation

use crate::{
    error::ApiError,
    requests::{CreateItemRequest, ListItemsRequest},
    types::{CreateItemResponse, Item, ListItemsResponse},
};
use reqwest::{Client, RequestBuilder, StatusCode, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Default Slack Web API base URL
pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("slack-lists-mcp/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`SlackListsClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// Bot token (`xoxb-...`) with `lists:read` and `lists:write`
    pub token: String,
    /// API base URL
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for `token` against the public Slack API
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder: Set API base URL
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Builder: Set request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Slack Lists API client
#[derive(Clone)]
pub struct SlackListsClient {
    client: Client,
    token: String,
    api_url: String,
}

impl fmt::Debug for SlackListsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackListsClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl SlackListsClient {
    /// Create a client from explicit settings
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingToken` if the token is blank, or
    /// `ApiError::RequestFailed` if the HTTP client cannot be built
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        if config.token.trim().is_empty() {
            return Err(ApiError::MissingToken);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            token: config.token.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// API base URL this client talks to
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Create an item (`slackLists.items.create`)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, Slack error codes, or parsing failures
    #[tracing::instrument(skip(self, request), fields(list_id = %request.list_id, fields = request.initial_fields.len()))]
    pub async fn create_item(&self, request: &CreateItemRequest) -> Result<Item, ApiError> {
        let builder = self
            .client
            .post(self.endpoint("slackLists.items.create"))
            .json(request);

        let response: CreateItemResponse = self.call(builder).await?;
        debug!(item_id = %response.item.id, "Item created");
        Ok(response.item)
    }

    /// Fetch one page of items (`slackLists.items.list`)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, Slack error codes, or parsing failures
    #[tracing::instrument(skip(self, request), fields(list_id = %request.list_id, limit = request.limit))]
    pub async fn list_items(&self, request: &ListItemsRequest) -> Result<ListItemsResponse, ApiError> {
        let builder = self
            .client
            .get(self.endpoint("slackLists.items.list"))
            .query(request);

        self.call(builder).await
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url)
    }

    async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.trim().parse().ok());
                warn!(?retry_after_secs, "Slack rate limit hit");
                return Err(ApiError::RateLimited { retry_after_secs });
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ApiError::Unauthorized(format!(
                    "HTTP {}",
                    response.status().as_u16()
                )));
            }
            StatusCode::NOT_FOUND => {
                return Err(ApiError::NotFound(format!(
                    "HTTP 404 for {}",
                    response.url().path()
                )));
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::ApiError {
                    status: status.as_u16(),
                    message: body,
                });
            }
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))?;

        if !body.get("ok").and_then(serde_json::Value::as_bool).unwrap_or(false) {
            let code = body
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown_error");
            return Err(ApiError::from_slack_code(code));
        }

        serde_json::from_value(body).map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SlackListsClient::from_config(&ClientConfig::new("xoxb-test"))
            .expect("client should build");
        assert_eq!(client.token, "xoxb-test");
        assert_eq!(client.api_url, "https://slack.com/api");
    }

    #[test]
    fn test_blank_token_rejected() {
        let result = SlackListsClient::from_config(&ClientConfig::new("  "));
        assert!(matches!(result, Err(ApiError::MissingToken)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::new("xoxb-test").with_api_url("http://localhost:1234/api/");
        let client = SlackListsClient::from_config(&config).expect("client should build");
        assert_eq!(
            client.endpoint("slackLists.items.list"),
            "http://localhost:1234/api/slackLists.items.list"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("xoxb-secret");
        assert!(!format!("{config:?}").contains("xoxb-secret"));

        let client = SlackListsClient::from_config(&config).expect("client should build");
        assert!(!format!("{client:?}").contains("xoxb-secret"));
    }
}
