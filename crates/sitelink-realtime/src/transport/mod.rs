//! Transport abstraction.
//!
//! The engine talks to the backend through the [`Transport`] trait: one
//! `dial` per connection cycle yielding a [`TransportLink`] (an outbound
//! sink plus an inbound event stream). The production implementation is
//! [`ws::WsTransport`]; [`memory::MemoryTransport`] provides a loopback
//! pair for tests.

pub mod memory;
pub mod ws;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use sitelink_core::events::OutgoingMessage;
use sitelink_core::types::id::ConversationId;
use sitelink_core::AppResult;

use crate::event::ServerEvent;

/// Frames published by this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Join a room.
    Join {
        /// Room channel name (`project:<id>` or `conversation:<id>`).
        room: String,
    },
    /// Leave a room.
    Leave {
        /// Room channel name.
        room: String,
    },
    /// Publish a chat message.
    Message {
        /// The message payload.
        payload: OutgoingMessage,
    },
    /// Advisory typing signal.
    Typing {
        /// The conversation the signal applies to.
        conversation_id: ConversationId,
        /// Whether the local user is typing.
        is_typing: bool,
    },
}

/// A live connection produced by [`Transport::dial`].
pub struct TransportLink {
    /// Outbound frame sink.
    pub sink: Box<dyn TransportSink>,
    /// Inbound event stream. The channel closing signals link loss.
    pub events: mpsc::Receiver<ServerEvent>,
}

impl fmt::Debug for TransportLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportLink").finish_non_exhaustive()
    }
}

/// Dials new links. One transport instance serves every connection cycle
/// of a manager, including reconnects.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Establish a link using the given bearer token.
    async fn dial(&self, token: &str) -> AppResult<TransportLink>;
}

/// Outbound half of a link.
#[async_trait]
pub trait TransportSink: Send + Sync {
    /// Send a frame. Resolves once the transport acknowledges delivery;
    /// application-level processing is not awaited.
    async fn send(&self, frame: ClientFrame) -> AppResult<()>;

    /// Close the link.
    async fn close(&self);
}
