//! Gateway wire protocol
//!
//! Frame format, op codes, and the payloads the client sends or receives.

mod frame;
mod identify;
mod opcodes;

pub use frame::GatewayFrame;
pub use identify::{ClientProperties, HelloPayload, IdentifyPayload, Intents, PresencePayload};
pub use opcodes::OpCode;
