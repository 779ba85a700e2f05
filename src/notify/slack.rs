use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::render::Message;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

/// Errors from delivering a message through the Slack Web API.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Request timed out")]
    Timeout,
    #[error("Unreadable API response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Slack answered 200 with `"ok": false`
    #[error("Slack API error: {0}")]
    Api(String),
}

/// Where notifications go.
///
/// The command pipeline only talks to this trait, so tests can record
/// messages instead of calling Slack.
pub trait Dispatcher: Send + Sync {
    /// Posts a message visible to the whole channel.
    fn post_message(
        &self,
        channel: &str,
        message: &Message,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;

    /// Posts plain text visible only to `user` in `channel`.
    fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Sends messages with the Slack Web API (`chat.postMessage` / `chat.postEphemeral`).
#[derive(Debug, Clone)]
pub struct SlackDispatcher {
    client: reqwest::Client,
    token: SecretString,
    api_base: String,
}

impl SlackDispatcher {
    /// `api_base` is normally [`DEFAULT_API_BASE`]; tests point it at a mock server.
    pub fn with_api_base(
        client: reqwest::Client,
        token: SecretString,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<(), DispatchError> {
        let url = format!("{}/{}", self.api_base, method);

        tracing::debug!(method = %method, "Calling Slack API");
        let request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
            .bearer_auth(self.token.expose_secret())
            .body(payload.to_string());

        let response = tokio::time::timeout(REQUEST_TIMEOUT, request.send())
            .await
            .map_err(|_| DispatchError::Timeout)?
            .map_err(DispatchError::Network)?;

        if !response.status().is_success() {
            return Err(DispatchError::HttpStatus(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: ApiResponse = serde_json::from_slice(&body)?;
        if !parsed.ok {
            return Err(DispatchError::Api(
                parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        Ok(())
    }
}

impl Dispatcher for SlackDispatcher {
    fn post_message(
        &self,
        channel: &str,
        message: &Message,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        let payload = json!({
            "channel": channel,
            "text": message.text,
            "blocks": message.blocks,
            "unfurl_links": false,
            "unfurl_media": false,
        });
        self.call("chat.postMessage", payload)
    }

    fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send {
        let payload = json!({
            "channel": channel,
            "user": user,
            "text": text,
        });
        self.call("chat.postEphemeral", payload)
    }
}
