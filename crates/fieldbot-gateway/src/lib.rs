//! # fieldbot-gateway
//!
//! The gateway session: protocol types, heartbeat scheduling, event routing,
//! and the chat command interpreter.

pub mod client;
pub mod commands;
pub mod events;
pub mod protocol;
pub mod router;
pub mod session;

mod error;

pub use client::run;
pub use error::GatewayError;
