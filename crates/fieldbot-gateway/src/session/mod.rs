//! Gateway session state
//!
//! One session per process: sequence bookkeeping, heartbeat scheduling, and
//! the outbound frame channel.

mod heartbeat;
mod session;

pub use session::{Session, SessionState};
