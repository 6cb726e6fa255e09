//! WebSocket transport over tokio-tungstenite.
//!
//! Frames are JSON text messages. The bearer token travels in the
//! `Authorization` header of the upgrade request.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use sitelink_core::{AppError, AppResult};

use crate::event::ServerEvent;

use super::{ClientFrame, Transport, TransportLink, TransportSink};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production WebSocket transport.
#[derive(Debug, Clone)]
pub struct WsTransport {
    url: String,
    /// Inbound channel depth before the reader applies backpressure.
    event_buffer: usize,
}

impl WsTransport {
    /// Create a transport dialing the given `ws://` or `wss://` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            event_buffer: 256,
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn dial(&self, token: &str) -> AppResult<TransportLink> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| AppError::with_source(
                sitelink_core::error::ErrorKind::Transport,
                format!("Invalid WebSocket URL '{}': {e}", self.url),
                e,
            ))?;

        let header = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AppError::transport("Bearer token contains invalid characters"))?;
        request.headers_mut().insert(AUTHORIZATION, header);

        let (stream, _response) = connect_async(request).await.map_err(|e| {
            AppError::with_source(
                sitelink_core::error::ErrorKind::Transport,
                format!("WebSocket dial failed: {e}"),
                e,
            )
        })?;

        let (write, read) = stream.split();
        let (tx, rx) = mpsc::channel(self.event_buffer);
        tokio::spawn(read_pump(read, tx));

        Ok(TransportLink {
            sink: Box::new(WsSink {
                write: Mutex::new(write),
            }),
            events: rx,
        })
    }
}

/// Decodes inbound text frames into [`ServerEvent`]s until the socket ends.
async fn read_pump(mut read: SplitStream<WsStream>, tx: mpsc::Sender<ServerEvent>) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ServerEvent>(&text) {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    // Unknown event names are tolerated; the backend may be newer.
                    debug!(error = %e, "Dropping unparseable server event");
                }
            },
            Ok(Message::Close(frame)) => {
                debug!(?frame, "Server closed the WebSocket");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "WebSocket read error");
                break;
            }
        }
    }
    // tx drops here; the manager observes the closed channel as link loss.
}

struct WsSink {
    write: Mutex<SplitSink<WsStream, Message>>,
}

#[async_trait]
impl TransportSink for WsSink {
    async fn send(&self, frame: ClientFrame) -> AppResult<()> {
        let json = serde_json::to_string(&frame)?;
        let mut write = self.write.lock().await;
        write
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| AppError::with_source(
                sitelink_core::error::ErrorKind::Send,
                format!("WebSocket send failed: {e}"),
                e,
            ))
    }

    async fn close(&self) {
        let mut write = self.write.lock().await;
        let _ = write.send(Message::Close(None)).await;
    }
}
