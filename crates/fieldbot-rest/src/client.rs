//! Discord REST client
//!
//! Thin wrapper over `reqwest` authenticated with the bot token. No retries
//! and no client-side rate limiting; each call either succeeds or reports a
//! single terminal error.

use crate::{CreateMessage, DiscordApi, GatewayInfo, MemberPatch, RestError};
use async_trait::async_trait;
use reqwest::Response;
use tracing::debug;

/// Stateless REST client
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestClient {
    /// Create a client for the given API base URL and bot token
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Resolve the current gateway WebSocket URL
    pub async fn get_gateway(&self) -> Result<GatewayInfo, RestError> {
        let response = self
            .http
            .get(format!("{}/gateway", self.base_url))
            .send()
            .await?;

        let info: GatewayInfo = Self::check(response).await?.json().await?;
        debug!(url = %info.url, "Resolved gateway URL");
        Ok(info)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn check(response: Response) -> Result<Response, RestError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RestError::Api { status, body })
        }
    }
}

#[async_trait]
impl DiscordApi for RestClient {
    async fn create_message(&self, channel_id: &str, content: &str) -> Result<(), RestError> {
        let response = self
            .http
            .post(format!("{}/channels/{channel_id}/messages", self.base_url))
            .header("Authorization", self.auth_header())
            .json(&CreateMessage::new(content))
            .send()
            .await?;

        Self::check(response).await?;
        debug!(channel_id, "Message sent");
        Ok(())
    }

    async fn modify_member(
        &self,
        guild_id: &str,
        user_id: &str,
        patch: MemberPatch,
    ) -> Result<(), RestError> {
        let body = patch.into_body();
        if body.is_empty() {
            return Ok(());
        }

        let response = self
            .http
            .patch(format!(
                "{}/guilds/{guild_id}/members/{user_id}",
                self.base_url
            ))
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        debug!(guild_id, user_id, "Member patched");
        Ok(())
    }
}
