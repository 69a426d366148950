//! # fieldbot-rest
//!
//! Stateless Discord REST client: gateway discovery, channel messages, and
//! guild member patches.

mod api;
mod client;
mod error;
mod types;

pub use api::DiscordApi;
pub use client::RestClient;
pub use error::RestError;
pub use types::{CreateMessage, GatewayInfo, MemberPatch};
