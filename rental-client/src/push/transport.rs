//! Socket.IO over WebSocket transport
//!
//! 1. Open `{push}/socket.io/?EIO=4&transport=websocket`
//! 2. On the Engine.IO handshake, join with the session token
//! 3. Answer pings, decode events, hand them to the dispatcher
//! 4. Reconnect with exponential backoff until shut down or the server
//!    refuses the token

use futures::{SinkExt, StreamExt};
use shared::message::PushEvent;
use std::sync::Arc;
use tokio::time::Duration;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::codec::{self, Frame};
use super::{PushConnector, PushDispatcher};
use crate::ClientResult;

/// Initial reconnect delay
const INITIAL_RECONNECT_DELAY_MS: u64 = 1000;
/// Max reconnect delay
const MAX_RECONNECT_DELAY_SECS: u64 = 30;

/// How a session ended
enum SessionEnd {
    Shutdown,
    Dropped,
    /// Server refused the token (`connect_error`)
    Rejected(String),
}

/// Real push transport
#[derive(Debug, Clone)]
pub struct SocketIoConnector {
    push_url: String,
}

impl SocketIoConnector {
    pub fn new(push_url: impl Into<String>) -> Self {
        Self {
            push_url: push_url.into(),
        }
    }

    /// WebSocket endpoint for the configured origin
    pub fn endpoint(&self) -> String {
        let ws_url = self
            .push_url
            .trim_end_matches('/')
            .replace("https://", "wss://")
            .replace("http://", "ws://");
        format!("{ws_url}/socket.io/?EIO=4&transport=websocket")
    }

    /// Run a single WebSocket session until disconnect or shutdown
    async fn run_session(
        &self,
        token: &str,
        dispatcher: &PushDispatcher,
        shutdown: &CancellationToken,
    ) -> ClientResult<SessionEnd> {
        let (ws, _) = tokio_tungstenite::connect_async(self.endpoint()).await?;
        let (mut ws_sink, mut ws_stream) = ws.split();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    let _ = ws_sink.send(Message::Text(codec::DISCONNECT.to_string().into())).await;
                    let _ = ws_sink.close().await;
                    return Ok(SessionEnd::Shutdown);
                }

                msg = ws_stream.next() => {
                    let text = match msg {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Ping(data))) => {
                            let _ = ws_sink.send(Message::Pong(data)).await;
                            continue;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Push socket closed by server");
                            return Ok(SessionEnd::Dropped);
                        }
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            tracing::info!("Push socket stream ended");
                            return Ok(SessionEnd::Dropped);
                        }
                        _ => continue, // Binary, Pong
                    };

                    let frame = match codec::decode(text.as_str()) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!("Dropped push frame: {e}");
                            continue;
                        }
                    };

                    match frame {
                        Frame::Open(handshake) => {
                            tracing::debug!(sid = %handshake.sid, ping_interval = handshake.ping_interval, "Engine.IO open");
                            ws_sink.send(Message::Text(codec::encode_connect(token).into())).await?;
                        }
                        Frame::Ping => {
                            ws_sink.send(Message::Text(codec::PONG.to_string().into())).await?;
                        }
                        Frame::Connect => tracing::info!("Push channel connected"),
                        Frame::ConnectError(message) => {
                            let _ = ws_sink.close().await;
                            return Ok(SessionEnd::Rejected(message));
                        }
                        Frame::Disconnect | Frame::Close => {
                            tracing::info!("Push channel disconnected by server");
                            return Ok(SessionEnd::Dropped);
                        }
                        Frame::Event { name, payload } => match PushEvent::decode(&name, payload) {
                            Some(event) => dispatcher.dispatch(event),
                            None => tracing::debug!(event = %name, "Ignoring unknown push event"),
                        },
                        Frame::Pong | Frame::Ignored => {}
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl PushConnector for SocketIoConnector {
    async fn serve(&self, token: String, dispatcher: Arc<PushDispatcher>, shutdown: CancellationToken) {
        let mut reconnect_delay = Duration::from_millis(INITIAL_RECONNECT_DELAY_MS);

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            match self.run_session(&token, &dispatcher, &shutdown).await {
                Ok(SessionEnd::Shutdown) => break,
                // Retrying with the same token cannot succeed
                Ok(SessionEnd::Rejected(message)) => {
                    tracing::warn!("Push channel refused the session token: {message}");
                    break;
                }
                Ok(SessionEnd::Dropped) => {
                    reconnect_delay = Duration::from_millis(INITIAL_RECONNECT_DELAY_MS);
                }
                Err(e) => {
                    tracing::warn!(
                        delay_ms = reconnect_delay.as_millis() as u64,
                        "Push session failed, retrying: {e}"
                    );
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {},
            }
            reconnect_delay =
                (reconnect_delay * 2).min(Duration::from_secs(MAX_RECONNECT_DELAY_SECS));
        }

        tracing::debug!("Push connector stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let c = SocketIoConnector::new("https://rent.example.com/");
        assert_eq!(
            c.endpoint(),
            "wss://rent.example.com/socket.io/?EIO=4&transport=websocket"
        );
        let c = SocketIoConnector::new("http://localhost:5000");
        assert_eq!(
            c.endpoint(),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
    }
}
