//! Real-time event types pushed to connected clients

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tether_core::{
    connection::ConnectionStatus,
    id::{ConnectionId, ConversationId, MessageId, StoryId, UserId},
    message::{DeliveryState, MessageKind},
    reaction::{ReactionKind, ReactionTarget},
    story::StoryAudience,
};

/// Socket event types
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TetherEvent {
    /// Someone asked to connect
    ConnectionRequested {
        connection_id: ConnectionId,
        from: UserId,
        to: UserId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A pending connection was answered (or blocked)
    ConnectionResponded {
        connection_id: ConnectionId,
        by: UserId,
        status: ConnectionStatus,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// New direct message in one of the recipient's threads
    DirectMessageReceived {
        message_id: MessageId,
        conversation: ConversationId,
        sender: UserId,
        kind: MessageKind,
        body: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A message moved to delivered or read
    DeliveryAdvanced {
        message_id: MessageId,
        conversation: ConversationId,
        state: DeliveryState,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A story went up
    StoryPosted {
        story_id: StoryId,
        author: UserId,
        audience: StoryAudience,
        expires_at: chrono::DateTime<chrono::Utc>,
    },

    /// Someone reacted to a message or story
    ReactionAdded {
        by: UserId,
        target: ReactionTarget,
        kind: ReactionKind,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}
