//! The gateway session
//!
//! Holds the state shared between the read loop and the heartbeat task. The
//! last-seen sequence number is the only value both touch concurrently; it is
//! a single atomic field so neither side can observe a torn value.

use crate::protocol::GatewayFrame;
use crate::session::heartbeat;
use crate::GatewayError;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Sentinel for "no sequence seen yet"
const NO_SEQUENCE: i64 = -1;

/// Session state machine
///
/// `AwaitingHello → Identified → Steady`; no terminal state, the machine runs
/// until the socket closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Socket open, waiting for the server's Hello
    AwaitingHello,
    /// Hello handled, identify sent
    Identified,
    /// First dispatch received
    Steady,
}

/// The single gateway session
pub struct Session {
    /// Last-seen sequence number (`NO_SEQUENCE` until the first frame
    /// carrying one)
    sequence: AtomicI64,

    /// Heartbeat interval from Hello, in milliseconds (0 until Hello)
    heartbeat_interval_ms: AtomicU64,

    /// Whether the last heartbeat was acknowledged
    heartbeat_acked: AtomicBool,

    /// Current state machine position
    state: RwLock<SessionState>,

    /// Channel to the socket writer task
    sender: mpsc::Sender<GatewayFrame>,

    /// Handle of the running heartbeat task, if any
    heartbeat_task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Create a new session writing outbound frames to `sender`
    pub fn new(sender: mpsc::Sender<GatewayFrame>) -> Arc<Self> {
        Arc::new(Self {
            sequence: AtomicI64::new(NO_SEQUENCE),
            heartbeat_interval_ms: AtomicU64::new(0),
            heartbeat_acked: AtomicBool::new(true),
            state: RwLock::new(SessionState::AwaitingHello),
            sender,
            heartbeat_task: Mutex::new(None),
        })
    }

    /// Get the last-seen sequence number
    pub fn sequence(&self) -> Option<u64> {
        let value = self.sequence.load(Ordering::SeqCst);
        u64::try_from(value).ok()
    }

    /// Record a sequence number from an inbound frame
    pub fn record_sequence(&self, seq: u64) {
        self.sequence
            .store(i64::try_from(seq).unwrap_or(i64::MAX), Ordering::SeqCst);
    }

    /// Heartbeat interval from Hello, if received
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        let ms = self.heartbeat_interval_ms.load(Ordering::SeqCst);
        (ms > 0).then(|| Duration::from_millis(ms))
    }

    /// Whether the last heartbeat was acknowledged
    pub fn is_heartbeat_acked(&self) -> bool {
        self.heartbeat_acked.load(Ordering::SeqCst)
    }

    /// Mark the last heartbeat as acknowledged (op 11 received)
    pub fn ack_heartbeat(&self) {
        self.heartbeat_acked.store(true, Ordering::SeqCst);
    }

    /// Mark a heartbeat as sent and awaiting acknowledgement
    pub fn mark_heartbeat_sent(&self) {
        self.heartbeat_acked.store(false, Ordering::SeqCst);
    }

    /// Get the current state
    pub async fn state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Set the session state
    pub async fn set_state(&self, state: SessionState) {
        *self.state.write().await = state;
    }

    /// Send a frame to the socket writer
    pub async fn send(&self, frame: GatewayFrame) -> Result<(), GatewayError> {
        self.sender
            .send(frame)
            .await
            .map_err(|_| GatewayError::ChannelClosed)
    }

    /// Start the heartbeat task on the given interval
    ///
    /// At most one heartbeat task runs per session: a previous task, if any,
    /// is aborted before the new one starts.
    pub async fn start_heartbeat(self: &Arc<Self>, interval: Duration) {
        self.heartbeat_interval_ms
            .store(interval.as_millis().try_into().unwrap_or(u64::MAX), Ordering::SeqCst);

        let task = tokio::spawn(heartbeat::run(Arc::clone(self), interval));

        let mut slot = self.heartbeat_task.lock().await;
        if let Some(previous) = slot.replace(task) {
            previous.abort();
        }
    }

    /// Stop the heartbeat task, if running
    pub async fn stop_heartbeat(&self) {
        if let Some(task) = self.heartbeat_task.lock().await.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field(
                "heartbeat_interval_ms",
                &self.heartbeat_interval_ms.load(Ordering::SeqCst),
            )
            .finish()
    }
}
