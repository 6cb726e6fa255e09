//! Conversation-scoped events and outbound message payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ConversationId, MessageId, UserId};

/// A chat message delivered to a conversation room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned message ID.
    pub id: MessageId,
    /// The conversation the message belongs to.
    pub conversation_id: ConversationId,
    /// The sending user.
    pub sender_id: UserId,
    /// Sender display name (cached for rendering).
    pub sender_name: String,
    /// Message body.
    pub body: String,
    /// When the server accepted the message.
    pub sent_at: DateTime<Utc>,
}

/// An outbound message published by this client.
///
/// `client_ref` is generated locally so the sender can correlate the echo
/// the server broadcasts back to the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// The target conversation.
    pub conversation_id: ConversationId,
    /// Message body.
    pub body: String,
    /// Client-side correlation ID.
    pub client_ref: MessageId,
}

impl OutgoingMessage {
    /// Create an outbound message with a fresh correlation ID.
    pub fn new(conversation_id: ConversationId, body: impl Into<String>) -> Self {
        Self {
            conversation_id,
            body: body.into(),
            client_ref: MessageId::new(),
        }
    }
}

/// A typing indicator signal for a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypingSignal {
    /// The conversation the signal applies to.
    pub conversation_id: ConversationId,
    /// The user who is (or stopped) typing.
    pub user_id: UserId,
    /// Whether the user is currently typing.
    pub is_typing: bool,
}
