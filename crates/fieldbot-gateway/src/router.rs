//! Event router
//!
//! The single entry point for every inbound frame. Records the sequence
//! number first, then branches on op code and, for dispatches, on event type.
//! Frames that do not parse, unknown op codes, and unmodeled event types are
//! logged and dropped; the session keeps running.

use crate::commands::CommandInterpreter;
use crate::events::{EventType, GuildMemberAddEvent, MessageCreateEvent};
use crate::protocol::{GatewayFrame, IdentifyPayload, OpCode};
use crate::session::{Session, SessionState};
use crate::GatewayError;
use fieldbot_rest::DiscordApi;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Routes inbound frames through the session state machine
pub struct EventRouter<A> {
    session: Arc<Session>,
    interpreter: CommandInterpreter<A>,
    identify: IdentifyPayload,
    channel_id: String,
}

impl<A: DiscordApi> EventRouter<A> {
    /// Create a router for the given session and command interpreter
    pub fn new(
        session: Arc<Session>,
        interpreter: CommandInterpreter<A>,
        identify: IdentifyPayload,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            session,
            interpreter,
            identify,
            channel_id: channel_id.into(),
        }
    }

    /// Handle one inbound frame
    ///
    /// Only a closed outbound channel is fatal; every other failure is local
    /// to the frame being handled.
    pub async fn handle_frame(&self, frame: GatewayFrame) -> Result<(), GatewayError> {
        // Sequence bookkeeping happens before any branching: heartbeats read
        // this value concurrently.
        if let Some(seq) = frame.s {
            self.session.record_sequence(seq);
        }

        match frame.op {
            OpCode::Hello => self.handle_hello(&frame).await,
            OpCode::Heartbeat => {
                // Server asked for an immediate beat, independent of the timer
                debug!("Heartbeat requested by server");
                self.session
                    .send(GatewayFrame::heartbeat(self.session.sequence()))
                    .await
            }
            OpCode::HeartbeatAck => {
                self.session.ack_heartbeat();
                Ok(())
            }
            OpCode::Dispatch => self.handle_dispatch(frame).await,
            other => {
                debug!(op = %other, "Ignoring frame");
                Ok(())
            }
        }
    }

    async fn handle_hello(&self, frame: &GatewayFrame) -> Result<(), GatewayError> {
        let Some(hello) = frame.hello_payload() else {
            warn!("Dropping Hello frame with malformed payload");
            return Ok(());
        };

        if self.session.state().await != SessionState::AwaitingHello {
            // Identify goes out exactly once per socket lifetime
            warn!("Duplicate Hello; identify not re-sent");
            return Ok(());
        }

        let interval = Duration::from_millis(hello.heartbeat_interval);
        info!(heartbeat_interval_ms = hello.heartbeat_interval, "Hello received");

        self.session.start_heartbeat(interval).await;
        self.session
            .send(GatewayFrame::identify(&self.identify))
            .await?;
        self.session.set_state(SessionState::Identified).await;

        Ok(())
    }

    async fn handle_dispatch(&self, frame: GatewayFrame) -> Result<(), GatewayError> {
        if self.session.state().await == SessionState::Identified {
            self.session.set_state(SessionState::Steady).await;
        }

        let Some(event_name) = frame.t.as_deref() else {
            warn!("Dropping dispatch frame without event type");
            return Ok(());
        };

        match EventType::parse(event_name) {
            Some(EventType::MessageCreate) => self.handle_message_create(frame.d.as_ref()).await,
            Some(EventType::GuildMemberAdd) => self.handle_member_add(frame.d.as_ref()).await,
            Some(EventType::Ready) => {
                info!("Session ready");
                Ok(())
            }
            None => {
                debug!(event = event_name, "Ignoring dispatch event");
                Ok(())
            }
        }
    }

    async fn handle_message_create(
        &self,
        payload: Option<&serde_json::Value>,
    ) -> Result<(), GatewayError> {
        let event: MessageCreateEvent = match Self::parse_payload(payload) {
            Some(event) => event,
            None => {
                warn!("Dropping malformed MESSAGE_CREATE payload");
                return Ok(());
            }
        };

        // Only the configured channel, and only non-empty content
        if event.channel_id != self.channel_id || event.content.is_empty() {
            return Ok(());
        }

        let snapshot = event.member_snapshot();
        if let Err(e) = self
            .interpreter
            .handle_message(&event.content, snapshot)
            .await
        {
            // A failed mutation is terminal for this command only
            error!(error = %e, "Command handling failed");
        }

        Ok(())
    }

    async fn handle_member_add(
        &self,
        payload: Option<&serde_json::Value>,
    ) -> Result<(), GatewayError> {
        let event: GuildMemberAddEvent = match Self::parse_payload(payload) {
            Some(event) => event,
            None => {
                warn!("Dropping malformed GUILD_MEMBER_ADD payload");
                return Ok(());
            }
        };

        if let Err(e) = self.interpreter.welcome(&event.user.id).await {
            error!(error = %e, user_id = %event.user.id, "Welcome message failed");
        }

        Ok(())
    }

    fn parse_payload<T: serde::de::DeserializeOwned>(
        payload: Option<&serde_json::Value>,
    ) -> Option<T> {
        payload.and_then(|d| serde_json::from_value(d.clone()).ok())
    }
}
