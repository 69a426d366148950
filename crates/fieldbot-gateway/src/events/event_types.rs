//! Gateway event types
//!
//! Names carried in the `t` field of dispatch frames. Only the events the
//! bot reacts to are modeled; everything else is ignored by the router.

use std::fmt;

/// Dispatch event types the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Sent after successful Identify
    Ready,
    /// New message in a guild channel
    MessageCreate,
    /// User joined the guild
    GuildMemberAdd,
}

impl EventType {
    /// Get the string representation of the event type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
        }
    }

    /// Parse an event type from a dispatch `t` field
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "READY" => Some(Self::Ready),
            "MESSAGE_CREATE" => Some(Self::MessageCreate),
            "GUILD_MEMBER_ADD" => Some(Self::GuildMemberAdd),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
