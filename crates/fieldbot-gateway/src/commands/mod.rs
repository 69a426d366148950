//! Command interpreter
//!
//! Classifies qualifying message text into commands and issues the
//! corresponding REST mutations. Per invocation the side effects are at most
//! one member patch and at most one channel message.

mod roles;

pub use roles::RoleTable;

use crate::events::MemberSnapshot;
use fieldbot_rest::{DiscordApi, MemberPatch, RestError};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Interprets command text and drives the REST mutations
pub struct CommandInterpreter<A> {
    api: Arc<A>,
    roles: RoleTable,
    guild_id: String,
    channel_id: String,
}

impl<A: DiscordApi> CommandInterpreter<A> {
    /// Create an interpreter targeting the given guild and channel
    pub fn new(api: Arc<A>, guild_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            api,
            roles: RoleTable::new(),
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Handle the text of a qualifying message
    ///
    /// Text that is not a recognized command, or a bare `!field`/`!name`
    /// without an argument, is silently ignored.
    pub async fn handle_message(
        &self,
        content: &str,
        member: MemberSnapshot,
    ) -> Result<(), RestError> {
        if matches!(content, "!help" | "!field" | "!name") {
            return self.send_help(&member.user_id).await;
        }

        let mut tokens = content.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some("!field"), Some(keyword)) => {
                self.assign_field_role(member, keyword).await
            }
            (Some("!name"), Some(first)) => {
                // Remaining tokens rejoined with single spaces
                let nickname = std::iter::once(first)
                    .chain(tokens)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.set_nickname(member, &nickname).await
            }
            _ => Ok(()),
        }
    }

    /// Welcome a newly joined member with the instructional message
    pub async fn welcome(&self, user_id: &str) -> Result<(), RestError> {
        info!(user_id, "Welcoming new member");
        self.send_help(user_id).await
    }

    async fn send_help(&self, user_id: &str) -> Result<(), RestError> {
        self.api
            .create_message(&self.channel_id, &help_text(user_id))
            .await
    }

    /// Replace the member's study-field role, keeping other roles untouched
    ///
    /// Field roles are mutually exclusive: any id from the role table's value
    /// set is stripped before the new one is appended. Assigning a role the
    /// member already holds is a no-op.
    async fn assign_field_role(
        &self,
        member: MemberSnapshot,
        keyword: &str,
    ) -> Result<(), RestError> {
        let Some(role_id) = self.roles.resolve(keyword) else {
            warn!(keyword, "Invalid role");
            return Ok(());
        };

        if member.roles.iter().any(|held| held == role_id) {
            debug!(user_id = %member.user_id, role_id, "Role already assigned");
            return Ok(());
        }

        let mut roles: Vec<String> = member
            .roles
            .into_iter()
            .filter(|held| !self.roles.is_field_role(held))
            .collect();
        roles.push(role_id.to_string());

        self.api
            .modify_member(&self.guild_id, &member.user_id, MemberPatch::role_list(roles))
            .await?;

        info!(user_id = %member.user_id, role_id, keyword, "Field role assigned");
        self.api
            .create_message(
                &self.channel_id,
                &format!("Set {}'s role to {keyword}.", member.display_name),
            )
            .await
    }

    /// Change the member's guild nickname
    ///
    /// A request equal to the current display name is a no-op. Patch failures
    /// are logged locally; the channel is only told about successes.
    async fn set_nickname(&self, member: MemberSnapshot, nickname: &str) -> Result<(), RestError> {
        if member.display_name == nickname {
            return Ok(());
        }

        match self
            .api
            .modify_member(
                &self.guild_id,
                &member.user_id,
                MemberPatch::nickname(nickname),
            )
            .await
        {
            Ok(()) => {
                info!(user_id = %member.user_id, nickname, "Nickname changed");
                self.api
                    .create_message(
                        &self.channel_id,
                        &format!("Hello {nickname}! Your name change was successful."),
                    )
                    .await
            }
            Err(e) => {
                error!(
                    error = %e,
                    from = %member.display_name,
                    to = %nickname,
                    "Nickname change failed"
                );
                Ok(())
            }
        }
    }
}

/// The fixed instructional message, mentioning the addressed user
fn help_text(user_id: &str) -> String {
    format!(
        "Hello <@{user_id}>! Assign yourself a role based on your field of study. \
         Type one of the following and hit Enter:\n\
         ```!field ComSci\n!field SecRes\n!field SofEng\n!field GamEng```\n\
         To set your name for this server, use the following format:\n\
         ```!name Myname```\n\
         To display this message again, send `!help`."
    )
}
