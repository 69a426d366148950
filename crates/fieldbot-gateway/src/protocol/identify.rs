//! Identify and Hello payloads
//!
//! Sent once per socket lifetime, right after the server's Hello.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Gateway intent bitmask
    ///
    /// Declared at identify time; the server only delivers events in the
    /// requested categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u64 {
        /// Member join/update/leave events
        const GUILD_MEMBERS  = 1 << 1;
        /// Messages in guild channels
        const GUILD_MESSAGES = 1 << 9;
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u64::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// Payload for op 2 (Identify)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Bot token
    pub token: String,

    /// Client metadata
    pub properties: ClientProperties,

    /// Payload compression (not used)
    pub compress: bool,

    /// Member-list threshold for large guilds
    pub large_threshold: u32,

    /// Initial presence
    pub presence: PresencePayload,

    /// Requested intent bitmask
    pub intents: Intents,
}

impl IdentifyPayload {
    /// Build the bot's identify payload for the given token
    ///
    /// Requests guild membership and guild message events (bitmask 514).
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            properties: ClientProperties::default(),
            compress: false,
            large_threshold: 250,
            presence: PresencePayload::default(),
            intents: Intents::GUILD_MEMBERS | Intents::GUILD_MESSAGES,
        }
    }
}

/// Client metadata triple sent at identify time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProperties {
    #[serde(rename = "$os")]
    pub os: String,
    #[serde(rename = "$browser")]
    pub browser: String,
    #[serde(rename = "$device")]
    pub device: String,
}

impl Default for ClientProperties {
    fn default() -> Self {
        Self {
            os: "linux".to_string(),
            browser: "fieldbot".to_string(),
            device: "fieldbot".to_string(),
        }
    }
}

/// Presence status block inside identify
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresencePayload {
    pub status: String,
    /// Idle-since timestamp; null means not idle
    pub since: Option<u64>,
    pub afk: bool,
}

impl Default for PresencePayload {
    fn default() -> Self {
        Self {
            status: "online".to_string(),
            since: None,
            afk: false,
        }
    }
}

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}
