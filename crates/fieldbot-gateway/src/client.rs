//! Gateway socket lifecycle
//!
//! Resolves the gateway URL, opens the WebSocket, and drives every inbound
//! frame through the router, one at a time, in arrival order. Outbound frames
//! go through a channel and a dedicated writer task so the heartbeat task
//! never contends with the read loop for the socket sink.

use crate::commands::CommandInterpreter;
use crate::protocol::{GatewayFrame, IdentifyPayload};
use crate::router::EventRouter;
use crate::session::Session;
use crate::GatewayError;
use fieldbot_common::BotConfig;
use fieldbot_rest::RestClient;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Gateway protocol version and encoding appended to the discovered URL
const GATEWAY_QUERY: &str = "/?v=6&encoding=json";

/// Outbound frame channel depth
const OUTBOUND_BUFFER: usize = 64;

/// Run one gateway session until the socket closes
///
/// There is no automatic reconnect: when the connection ends, so does the
/// session, and the caller decides what happens next (currently: process
/// exit).
pub async fn run(config: BotConfig) -> Result<(), GatewayError> {
    let rest = Arc::new(RestClient::new(
        &config.discord.api_base,
        &config.discord.bot_token,
    ));

    let info = rest.get_gateway().await?;
    let url = format!("{}{GATEWAY_QUERY}", info.url);
    info!(url = %url, "Connecting to gateway");

    let (socket, _response) = connect_async(&url).await?;
    info!("Gateway connection established");

    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<GatewayFrame>(OUTBOUND_BUFFER);

    // Writer task: the only holder of the socket sink
    let writer = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            let text = match frame.to_json() {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize outbound frame");
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(text)).await {
                error!(error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    let session = Session::new(outbound_tx);
    let interpreter = CommandInterpreter::new(
        rest,
        config.discord.guild_id.clone(),
        config.discord.channel_id.clone(),
    );
    let router = EventRouter::new(
        Arc::clone(&session),
        interpreter,
        IdentifyPayload::new(&config.discord.bot_token),
        config.discord.channel_id.clone(),
    );

    // Inbound frames are processed strictly one at a time, in arrival order
    let result = read_loop(&router, &mut stream).await;

    session.stop_heartbeat().await;
    writer.abort();
    info!("Gateway session ended");

    result
}

async fn read_loop<S>(
    router: &EventRouter<RestClient>,
    stream: &mut S,
) -> Result<(), GatewayError>
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match GatewayFrame::from_json(&text) {
                Ok(frame) => router.handle_frame(frame).await?,
                Err(e) => warn!(error = %e, "Dropping unparseable frame"),
            },
            Ok(Message::Close(close)) => {
                info!(frame = ?close, "Gateway closed the connection");
                break;
            }
            // Ping/pong are answered by the transport; anything else is noise
            Ok(other) => debug!(kind = ?other, "Ignoring non-text message"),
            Err(e) => {
                error!(error = %e, "WebSocket error");
                return Err(GatewayError::WebSocket(e));
            }
        }
    }

    Ok(())
}
