//! REST payload definitions
//!
//! Request and response bodies for the REST calls the bot issues.

use serde::{Deserialize, Serialize};

/// Response body of `GET /gateway`
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayInfo {
    /// WebSocket URL to connect to (version/encoding query not included)
    pub url: String,
}

/// Request body of `POST /channels/{id}/messages`
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessage {
    pub content: String,
    pub tts: bool,
}

impl CreateMessage {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tts: false,
        }
    }
}

/// Request body of `PATCH /guilds/{guild}/members/{user}`
///
/// Nickname and roles are mutually exclusive per call: when a nickname is
/// present the role list is not sent, even if both were supplied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}

impl MemberPatch {
    /// Patch that sets a nickname
    #[must_use]
    pub fn nickname(nick: impl Into<String>) -> Self {
        Self {
            nick: Some(nick.into()),
            roles: None,
        }
    }

    /// Patch that replaces the role list
    #[must_use]
    pub fn role_list(roles: Vec<String>) -> Self {
        Self {
            nick: None,
            roles: Some(roles),
        }
    }

    /// True if the patch carries nothing to send
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nick.is_none() && self.roles.is_none()
    }

    /// Apply the nick-over-roles exclusivity rule to the wire form
    #[must_use]
    pub fn into_body(mut self) -> Self {
        if self.nick.is_some() {
            self.roles = None;
        }
        self
    }
}
