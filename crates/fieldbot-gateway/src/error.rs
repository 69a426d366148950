//! Gateway error types

use fieldbot_rest::RestError;

/// Errors that end the gateway session
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// REST call failed (discovery or a mutation surfaced by the router)
    #[error(transparent)]
    Rest(#[from] RestError),

    /// WebSocket transport failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The outbound frame channel closed (writer task gone)
    #[error("Outbound frame channel closed")]
    ChannelClosed,
}
