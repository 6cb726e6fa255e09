//! Conversation room stream.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sitelink_core::events::OutgoingMessage;
use sitelink_core::events::ChatMessage;
use sitelink_core::types::id::{ConversationId, UserId};
use sitelink_core::AppResult;

use crate::bus::Subscription;
use crate::connection::manager::ConnectionManager;
use crate::event::{EventKind, ServerEvent};

use super::buffer::EventBuffer;
use super::typing::TypingTracker;

/// Observes one conversation: a bounded message history plus the set of
/// currently-typing users.
///
/// Opening joins the conversation room; dropping leaves it.
#[derive(Debug)]
pub struct ConversationStream {
    manager: ConnectionManager,
    conversation_id: ConversationId,
    messages: Arc<Mutex<EventBuffer<ChatMessage>>>,
    typing: Arc<TypingTracker>,
    _subscriptions: Vec<Subscription>,
}

impl ConversationStream {
    /// Open a stream for one conversation.
    pub fn open(manager: &ConnectionManager, conversation_id: ConversationId) -> Self {
        let config = manager.config();
        let messages = Arc::new(Mutex::new(EventBuffer::new(config.room_buffer_capacity)));
        let typing = Arc::new(TypingTracker::new(Duration::from_secs(
            config.typing_expiry_seconds,
        )));

        manager.join_conversation(conversation_id);

        let message_sub = {
            let messages = messages.clone();
            manager.on(EventKind::Message, move |event| {
                if let ServerEvent::Message(message) = event {
                    if message.conversation_id == conversation_id {
                        messages
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .push(message.clone());
                    }
                }
            })
        };
        let typing_sub = {
            let typing = typing.clone();
            manager.on(EventKind::Typing, move |event| {
                if let ServerEvent::Typing(signal) = event {
                    if signal.conversation_id == conversation_id {
                        typing.set_typing(signal.user_id, signal.is_typing);
                    }
                }
            })
        };

        Self {
            manager: manager.clone(),
            conversation_id,
            messages,
            typing,
            _subscriptions: vec![message_sub, typing_sub],
        }
    }

    /// The conversation this stream observes.
    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Publish a message to this conversation.
    ///
    /// Delegates to the connection manager; delivery rejection surfaces to
    /// the caller.
    pub async fn send_message(&self, body: impl Into<String>) -> AppResult<()> {
        self.manager
            .send_message(OutgoingMessage::new(self.conversation_id, body))
            .await
    }

    /// Signal that the local user started typing.
    pub fn start_typing(&self) {
        self.manager.start_typing(self.conversation_id);
    }

    /// Signal that the local user stopped typing.
    pub fn stop_typing(&self) {
        self.manager.stop_typing(self.conversation_id);
    }

    /// Snapshot of buffered messages, newest first.
    pub fn recent_messages(&self) -> Vec<ChatMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .to_vec()
    }

    /// Users currently typing in this conversation.
    pub fn typing_users(&self) -> Vec<UserId> {
        self.typing.typing_users()
    }

    /// Whether a specific user is currently typing.
    pub fn is_typing(&self, user_id: UserId) -> bool {
        self.typing.is_typing(user_id)
    }
}

impl Drop for ConversationStream {
    fn drop(&mut self) {
        self.manager.leave_conversation(self.conversation_id);
    }
}
