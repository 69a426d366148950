//! Event payload definitions
//!
//! Data structures for the dispatch events the bot consumes. Fields the bot
//! does not read are left unmodeled; serde ignores them.

use serde::{Deserialize, Serialize};

/// User data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// Guild member data attached to a message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberInfo {
    /// Per-guild nickname, if set
    #[serde(default)]
    pub nick: Option<String>,
    /// Role ids currently held
    #[serde(default)]
    pub roles: Vec<String>,
}

/// MESSAGE_CREATE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreateEvent {
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: UserPayload,
    #[serde(default)]
    pub member: Option<MemberInfo>,
}

impl MessageCreateEvent {
    /// Derive the transient member snapshot for this message
    ///
    /// Display name is the guild nickname when present, else the username.
    /// The role list is always a fresh vector, empty when the payload carried
    /// no member object.
    #[must_use]
    pub fn member_snapshot(&self) -> MemberSnapshot {
        let member = self.member.clone().unwrap_or_default();
        MemberSnapshot {
            user_id: self.author.id.clone(),
            display_name: member
                .nick
                .unwrap_or_else(|| self.author.username.clone()),
            roles: member.roles,
        }
    }
}

/// GUILD_MEMBER_ADD payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberAddEvent {
    pub user: UserPayload,
}

/// Transient view of a member, recomputed from each event payload
#[derive(Debug, Clone)]
pub struct MemberSnapshot {
    pub user_id: String,
    pub display_name: String,
    pub roles: Vec<String>,
}
