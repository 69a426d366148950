//! Heartbeat scheduler
//!
//! Sends one heartbeat immediately, then one per interval, forever. Each
//! send re-reads the session's last-seen sequence number so the frame always
//! carries the value current at send time. A missed acknowledgement is
//! logged but never stops the timer.

use crate::protocol::GatewayFrame;
use crate::session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

/// Heartbeat loop body, run as a task owned by the session
pub(crate) async fn run(session: Arc<Session>, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately
        ticker.tick().await;

        if !session.is_heartbeat_acked() {
            warn!("Previous heartbeat was not acknowledged");
        }

        let sequence = session.sequence();
        session.mark_heartbeat_sent();

        if session.send(GatewayFrame::heartbeat(sequence)).await.is_err() {
            debug!("Outbound channel closed; heartbeat loop ending");
            break;
        }

        trace!(sequence = ?sequence, "Heartbeat sent");
    }
}
