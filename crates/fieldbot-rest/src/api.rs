//! REST mutation trait
//!
//! The command layer calls the API through this trait so tests can substitute
//! a recording implementation.

use crate::{MemberPatch, RestError};
use async_trait::async_trait;

/// The two REST mutations the bot issues
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Post a message to a channel
    async fn create_message(&self, channel_id: &str, content: &str) -> Result<(), RestError>;

    /// Patch a guild member (nickname or role list)
    async fn modify_member(
        &self,
        guild_id: &str,
        user_id: &str,
        patch: MemberPatch,
    ) -> Result<(), RestError>;
}
