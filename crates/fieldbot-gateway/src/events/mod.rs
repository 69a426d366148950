//! Dispatch events
//!
//! Event names and payloads the bot consumes.

mod event_types;
mod payloads;

pub use event_types::EventType;
pub use payloads::{GuildMemberAddEvent, MemberInfo, MemberSnapshot, MessageCreateEvent, UserPayload};
